//! Artifact emission: the binary list file plus optional text exports.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use prost::Message;

use crate::entry::{Entry, RuleKind};
use crate::error::{Error, Result};
use crate::proto;

/// Per-list attribute keys to drop from the binary artifact.
pub type ExcludeAttrs = AHashMap<String, AHashSet<String>>;

/// Assemble the artifact message from the final-list map.
///
/// The map iterates in name order, which fixes the outer record order; the
/// polisher already fixed the inner order. With `exclude` set, entries
/// carrying any excluded attribute for their list are dropped from that
/// list's record only.
pub fn build_site_list(
    finals: &BTreeMap<String, Vec<Entry>>,
    exclude: Option<&ExcludeAttrs>,
) -> proto::GeoSiteList {
    let mut site_list = proto::GeoSiteList::default();

    for (name, entries) in finals {
        let excluded = exclude.and_then(|m| m.get(name));
        let mut site = proto::GeoSite {
            country_code: name.clone(),
            domain: Vec::with_capacity(entries.len()),
        };

        for entry in entries {
            if let Some(excluded) = excluded {
                if entry.attrs.iter().any(|a| excluded.contains(a)) {
                    continue;
                }
            }
            let kind = match entry.kind {
                RuleKind::Domain => proto::domain::Type::RootDomain,
                RuleKind::Regexp => proto::domain::Type::Regex,
                RuleKind::Keyword => proto::domain::Type::Plain,
                RuleKind::Full => proto::domain::Type::Full,
                // Includes were consumed by the binder; none survive into a
                // finalized list.
                RuleKind::Include => continue,
            };
            site.domain.push(proto::Domain {
                r#type: kind as i32,
                value: entry.value.clone(),
                attribute: entry
                    .attrs
                    .iter()
                    .map(|key| proto::Attribute {
                        key: key.clone(),
                        typed_value: Some(proto::attribute::TypedValue::BoolValue(true)),
                    })
                    .collect(),
            });
        }

        site_list.entry.push(site);
    }

    site_list
}

/// Serialize the artifact and write it to `path`.
pub fn write_binary(
    finals: &BTreeMap<String, Vec<Entry>>,
    path: &Path,
    exclude: Option<&ExcludeAttrs>,
) -> Result<()> {
    let site_list = build_site_list(finals, exclude);
    let bytes = site_list.encode_to_vec();
    fs::write(path, &bytes)?;
    log::info!(
        "wrote {} lists ({} bytes) to {}",
        site_list.entry.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Write one plain form per line for each requested list.
///
/// Lookup is by upper-cased name; the output file is the lower-cased name
/// plus `.txt`. A missing or empty list is reported and skipped, never
/// fatal.
pub fn export_plaintext(
    finals: &BTreeMap<String, Vec<Entry>>,
    names: &[String],
    outdir: &Path,
) -> Result<()> {
    for name in names {
        let upper = name.trim().to_ascii_uppercase();
        if upper.is_empty() {
            continue;
        }
        match finals.get(&upper) {
            Some(entries) if !entries.is_empty() => {
                let mut text = String::with_capacity(entries.len() * 24);
                for entry in entries {
                    text.push_str(&entry.plain);
                    text.push('\n');
                }
                let path = outdir.join(format!("{}.txt", upper.to_ascii_lowercase()));
                fs::write(&path, text)?;
                log::info!("exported {} rules to {}", entries.len(), path.display());
            }
            Some(_) => log::warn!("{upper}: list is empty, skipped"),
            None => log::warn!("{upper}: no such list, skipped"),
        }
    }
    Ok(())
}

/// Render one list in AutoProxy 0.2.9 format.
///
/// Unlike plaintext export, a missing list here is fatal. The header
/// carries the generation time; the rule body below it is deterministic.
pub fn export_autoproxy(
    finals: &BTreeMap<String, Vec<Entry>>,
    name: &str,
    outdir: &Path,
) -> Result<()> {
    let upper = name.trim().to_ascii_uppercase();
    let entries = finals
        .get(&upper)
        .ok_or_else(|| Error::Reference(upper.clone()))?;

    let mut text = String::with_capacity(entries.len() * 32);
    text.push_str("[AutoProxy 0.2.9]\n");
    text.push_str(&format!(
        "! Last Modified: {}\n",
        chrono::Utc::now().to_rfc2822()
    ));
    text.push_str("! Expires: 24h\n\n");

    for entry in entries {
        match entry.kind {
            RuleKind::Full => {
                text.push_str(&format!("|http://{}\n", entry.value));
                text.push_str(&format!("|https://{}\n", entry.value));
            }
            RuleKind::Domain => text.push_str(&format!("||{}\n", entry.value)),
            RuleKind::Keyword => text.push_str(&format!("{}\n", entry.value)),
            RuleKind::Regexp => text.push_str(&format!("/{}/\n", entry.value)),
            RuleKind::Include => {}
        }
    }

    let path = outdir.join(format!("{}.pac.txt", upper.to_ascii_lowercase()));
    fs::write(&path, text)?;
    log::info!("exported AutoProxy list to {}", path.display());
    Ok(())
}
