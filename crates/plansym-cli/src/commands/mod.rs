pub mod automorphisms;
pub mod detect;
pub mod encode;

use std::error::Error;
use std::path::Path;

use plansym_aut::serde_io::read_json;
use plansym_core::{ErrorInfo, PartialPlan, SymError};

/// Reads a plan from JSON and re-runs its structural validation.
pub fn load_plan(path: &Path) -> Result<PartialPlan, Box<dyn Error>> {
    let text = read_json(path)?;
    let plan: PartialPlan = serde_json::from_str(&text).map_err(|err| {
        SymError::Serde(
            ErrorInfo::new("plan-deserialize", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    plan.validate()?;
    Ok(plan)
}
