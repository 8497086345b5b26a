use crate::core::environment::Environment;
use crate::core::resources::ResourceReport;
use crate::errors::AppResult;
use crate::utils::date::today;

/// Handle `--check-resources`
///
/// Scans the same locations the running pet would use and prints what is
/// found. Missing optional assets are reported, never treated as errors.
pub fn handle(env: &Environment) -> AppResult<()> {
    let report = ResourceReport::collect(env, today());
    report.print(env);
    Ok(())
}
