//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "veripack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show passing findings as well as problems
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify packages against their manifests
    Verify(VerifyArgs),
    /// List a manifest's file entries without verifying content
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Package locations: directories, .zip, or .tar containers
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<PathBuf>,

    /// Literal manifest file name at the package root
    #[arg(long, default_value = "mets.xml", conflicts_with = "manifest_pattern")]
    pub manifest: String,

    /// Regular expression for the manifest file name; must match
    /// exactly one root-level file
    #[arg(long, value_name = "REGEX")]
    pub manifest_pattern: Option<String>,

    /// Skip the manifest schema validity check
    #[arg(long)]
    pub skip_validity: bool,

    /// Skip the completeness check
    #[arg(long)]
    pub skip_completeness: bool,

    /// Skip the fixity check
    #[arg(long)]
    pub skip_fixity: bool,

    /// Skip the orphan detection check
    #[arg(long)]
    pub skip_orphans: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Package location: a directory, .zip, or .tar container
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Literal manifest file name at the package root
    #[arg(long, default_value = "mets.xml", conflicts_with = "manifest_pattern")]
    pub manifest: String,

    /// Regular expression for the manifest file name
    #[arg(long, value_name = "REGEX")]
    pub manifest_pattern: Option<String>,
}

/// Builds the core locator from the name/pattern argument pair.
pub fn locator_from(manifest: &str, pattern: Option<&str>) -> veripack_core::ManifestLocator {
    pattern.map_or_else(
        || veripack_core::ManifestLocator::Name(manifest.to_owned()),
        |p| veripack_core::ManifestLocator::Pattern(p.to_owned()),
    )
}
