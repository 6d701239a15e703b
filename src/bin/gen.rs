//! geosite-gen: CLI tool for compiling site list data directories.

use clap::Parser;
use geosite_compiler::{compile, ExcludeAttrs};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geosite-gen")]
#[command(version = "0.1.0")]
#[command(about = "Compile domain site lists into a binary artifact", long_about = None)]
struct Cli {
    /// Directory containing the site list source files
    #[arg(long, default_value = "./data")]
    datapath: PathBuf,

    /// Directory to write output artifacts into
    #[arg(long, default_value = "./")]
    outputdir: PathBuf,

    /// File name of the binary artifact
    #[arg(long, default_value = "geosite.dat")]
    outputname: String,

    /// List names to export as plaintext
    #[arg(long, value_delimiter = ',')]
    exportlists: Vec<String>,

    /// Render one list in AutoProxy format
    #[arg(long)]
    togfwlist: Option<String>,

    /// Attribute exclusions for the binary artifact, e.g. MYLIST@ads@cn
    #[arg(long, value_delimiter = ',')]
    excludeattrs: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> geosite_compiler::Result<()> {
    let compiled = compile(&cli.datapath)?;

    fs::create_dir_all(&cli.outputdir)?;

    let exclude = parse_exclude_attrs(&cli.excludeattrs);
    compiled.write_binary(&cli.outputdir.join(&cli.outputname), exclude.as_ref())?;

    if !cli.exportlists.is_empty() {
        compiled.export_plaintext(&cli.exportlists, &cli.outputdir)?;
    }
    if let Some(name) = &cli.togfwlist {
        compiled.export_autoproxy(name, &cli.outputdir)?;
    }

    Ok(())
}

/// Parse `LIST@attr1@attr2` exclusion specs. Malformed specs are reported
/// and skipped; exclusion is an output refinement, not part of the build.
fn parse_exclude_attrs(specs: &[String]) -> Option<ExcludeAttrs> {
    let mut exclude = ExcludeAttrs::default();
    for spec in specs {
        let spec = spec.trim();
        if spec.is_empty() {
            continue;
        }
        let mut parts = spec.split('@');
        let name = parts.next().unwrap_or_default().trim().to_ascii_uppercase();
        let attrs: ahash::AHashSet<String> = parts
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.trim().to_ascii_lowercase())
            .collect();
        if name.is_empty() || attrs.is_empty() {
            log::warn!("ignoring malformed exclusion spec: {spec}");
            continue;
        }
        exclude.entry(name).or_default().extend(attrs);
    }
    if exclude.is_empty() {
        None
    } else {
        Some(exclude)
    }
}
