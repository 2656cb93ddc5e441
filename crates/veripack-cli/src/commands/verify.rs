//! Verify command implementation

use anyhow::Result;
use veripack_core::CheckConfig;
use veripack_core::VerificationReport;
use veripack_core::verify_batch;

use crate::cli::VerifyArgs;
use crate::cli::locator_from;
use crate::output::OutputFormatter;

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let locator = locator_from(&args.manifest, args.manifest_pattern.as_deref());
    let config = CheckConfig {
        validity: !args.skip_validity,
        completeness: !args.skip_completeness,
        fixity: !args.skip_fixity,
        orphans: !args.skip_orphans,
    };

    let outcomes = verify_batch(&args.packages, &locator, &config);
    formatter.format_batch(&outcomes)?;

    let all_passed = outcomes
        .iter()
        .all(|o| o.result.as_ref().is_ok_and(VerificationReport::passed));
    if all_passed {
        Ok(())
    } else {
        // Every finding has already been reported by the formatter;
        // only the exit code is left to signal.
        std::process::exit(1);
    }
}
