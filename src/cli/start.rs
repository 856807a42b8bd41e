use super::{commands, dispatch};
use crate::telemetry;
use anyhow::Result;

/// Main orchestrator - Pure orchestration with no business logic
///
/// Four-step data flow:
/// 1. Parse: Extract CLI arguments
/// 2. Initialize Telemetry: log to stderr and the optional log file
/// 3. Dispatch: Convert `ArgMatches` into typed Action enum
/// 4. Execute: Run the action's business logic
///
/// # Errors
///
/// Returns an error if any step in the flow fails
pub async fn start() -> Result<()> {
    // 1. Parse: Extract CLI arguments
    let matches = commands::new().get_matches();

    // 2. Initialize Telemetry
    telemetry::init(&dispatch::telemetry_options(&matches))?;

    // 3. Dispatch: Convert ArgMatches into typed Action enum
    let action = dispatch::dispatch(&matches)?;

    // 4. Execute: Run the action's business logic
    action.execute().await?;

    Ok(())
}
