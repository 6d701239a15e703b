//! Top-level compilation pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use crate::binder;
use crate::emitter::{self, ExcludeAttrs};
use crate::entry::Entry;
use crate::error::Result;
use crate::loader;
use crate::resolver::Resolver;

/// Compile a data directory: load, bind, resolve.
///
/// All pipeline state is scoped to this call; the intermediate bound-list
/// map is dropped once resolution finishes.
pub fn compile(data_dir: &Path) -> Result<CompiledLists> {
    let raw_lists = loader::load_dir(data_dir)?;
    log::info!(
        "loaded {} list files from {}",
        raw_lists.len(),
        data_dir.display()
    );

    let bound = binder::bind(raw_lists);
    let finals = Resolver::new(&bound).resolve_all()?;
    log::info!("resolved {} lists", finals.len());

    Ok(CompiledLists { finals })
}

/// The finalized lists of one compilation, ready for emission.
///
/// Immutable once produced; every accessor and export reads the same
/// sorted final-list map.
#[derive(Debug)]
pub struct CompiledLists {
    finals: BTreeMap<String, Vec<Entry>>,
}

impl CompiledLists {
    /// Look up a finalized list (name is upper-cased first).
    pub fn get(&self, name: &str) -> Option<&[Entry]> {
        self.finals
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Iterate list names in emission (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.finals.keys().map(String::as_str)
    }

    /// Number of finalized lists.
    pub fn len(&self) -> usize {
        self.finals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finals.is_empty()
    }

    /// Assemble the artifact message.
    pub fn to_site_list(&self, exclude: Option<&ExcludeAttrs>) -> crate::proto::GeoSiteList {
        emitter::build_site_list(&self.finals, exclude)
    }

    /// Serialize the artifact to `path`.
    pub fn write_binary(&self, path: &Path, exclude: Option<&ExcludeAttrs>) -> Result<()> {
        emitter::write_binary(&self.finals, path, exclude)
    }

    /// Export the requested lists as plaintext into `outdir`.
    pub fn export_plaintext(&self, names: &[String], outdir: &Path) -> Result<()> {
        emitter::export_plaintext(&self.finals, names, outdir)
    }

    /// Export one list in AutoProxy format into `outdir`.
    pub fn export_autoproxy(&self, name: &str, outdir: &Path) -> Result<()> {
        emitter::export_autoproxy(&self.finals, name, outdir)
    }
}
