use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use tierlift_advisor::{ArtifactStore, Artifacts, Engine, history::JsonFileHistory};
use tierlift_core::{PlayerSubmission, TierParsing};

use crate::{
    data::{self, PopulationRow},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SubmitArg {
    /// Player submission JSON file; read from stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Tier standards JSON file
    #[arg(long)]
    standards: PathBuf,
    /// Classifier JSON file
    #[arg(long)]
    classifier: PathBuf,
    /// Directory of the profile history store
    #[arg(long, default_value = "history")]
    history_dir: PathBuf,
    /// Historical population CSV file to record the assessed submission in
    #[arg(long)]
    population: Option<PathBuf>,
    /// Reject unknown tiers instead of treating them as Bronze
    #[arg(long)]
    strict_tiers: bool,
    /// Submission time (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

pub(crate) fn run(arg: &SubmitArg) -> anyhow::Result<()> {
    let SubmitArg {
        input,
        standards,
        classifier,
        history_dir,
        population,
        strict_tiers,
        now,
    } = arg;

    let submission: PlayerSubmission = match input {
        Some(path) => util::read_json_file("submission", path)?,
        None => serde_json::from_reader(io::stdin().lock())
            .context("Failed to parse submission JSON from stdin")?,
    };
    let artifacts = Artifacts::new(
        Some(util::read_standards_file(standards)?),
        Some(util::read_classifier_file(classifier)?),
    );
    let engine = Engine::new(
        Arc::new(ArtifactStore::new(artifacts)),
        JsonFileHistory::new(history_dir),
    )
    .with_tier_parsing(if *strict_tiers {
        TierParsing::Strict
    } else {
        TierParsing::Lenient
    });

    let now = now.unwrap_or_else(Utc::now);
    let assessment = engine
        .submit(&submission, now)
        .context("Failed to assess submission")?;
    if let Some(population) = population {
        data::append_population(population, PopulationRow::from_assessment(&assessment, now))
            .with_context(|| format!("Failed to record submission in {}", population.display()))?;
    }
    Output::save_json(&assessment, None)
}
