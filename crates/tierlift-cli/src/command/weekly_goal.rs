use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use tierlift_advisor::{ArtifactStore, Artifacts, Engine, history::JsonFileHistory};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WeeklyGoalArg {
    /// Player whose history is analyzed
    #[arg(long)]
    username: String,
    /// Tier standards JSON file
    #[arg(long)]
    standards: PathBuf,
    /// Directory of the profile history store
    #[arg(long, default_value = "history")]
    history_dir: PathBuf,
    /// End of the analysis window (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

pub(crate) fn run(arg: &WeeklyGoalArg) -> anyhow::Result<()> {
    let WeeklyGoalArg {
        username,
        standards,
        history_dir,
        now,
    } = arg;

    let artifacts = Artifacts::new(Some(util::read_standards_file(standards)?), None);
    let engine = Engine::new(
        Arc::new(ArtifactStore::new(artifacts)),
        JsonFileHistory::new(history_dir),
    );
    let goal = engine
        .weekly_goal(username, now.unwrap_or_else(Utc::now))
        .with_context(|| format!("Failed to compute weekly goal for {username}"))?;
    Output::save_json(&goal, None)
}
