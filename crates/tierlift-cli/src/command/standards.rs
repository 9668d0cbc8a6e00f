use std::path::PathBuf;

use tierlift_core::Tier;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct StandardsArg {
    /// Tier standards JSON file
    #[arg(long)]
    standards: PathBuf,
    /// Tier to look up
    #[arg(long)]
    tier: String,
}

/// Prints the tier's standard, or an empty object when there is none.
pub(crate) fn run(arg: &StandardsArg) -> anyhow::Result<()> {
    let StandardsArg { standards, tier } = arg;
    let standards = util::read_standards_file(standards)?;

    let standard = match tier.parse::<Tier>() {
        Ok(tier) => standards.get(tier).copied(),
        Err(e) => {
            log::info!("{e}");
            None
        }
    };
    match standard {
        Some(standard) => Output::save_json(&standard, None),
        None => Output::save_json(&serde_json::json!({}), None),
    }
}
