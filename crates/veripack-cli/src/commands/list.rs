//! List command implementation

use anyhow::Result;
use veripack_core::manifest;
use veripack_core::open_package;

use crate::cli::ListArgs;
use crate::cli::locator_from;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let locator = locator_from(&args.manifest, args.manifest_pattern.as_deref());

    let accessor =
        open_package(&args.package).map_err(|e| convert_verify_error(&e, &args.package))?;
    let listing = accessor
        .list_files()
        .map_err(|e| convert_verify_error(&e, &args.package))?;
    let parsed = manifest::parse(&*accessor, &listing, &locator)
        .map_err(|e| convert_verify_error(&e, &args.package))?;

    formatter.format_entries(&parsed)
}
