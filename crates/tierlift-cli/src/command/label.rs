use std::path::PathBuf;

use anyhow::Context as _;
use tierlift_core::TierParsing;
use tierlift_training::labels;
use uuid::Uuid;

use crate::{
    data,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LabelArg {
    /// Historical population CSV file
    #[arg(long)]
    population: PathBuf,
    /// Tier standards JSON file
    #[arg(long)]
    standards: PathBuf,
    /// Output file path for the labeled CSV
    #[arg(long)]
    output: Option<PathBuf>,
    /// Reject rows with an unknown tier instead of treating them as Bronze
    #[arg(long)]
    strict_tiers: bool,
}

pub(crate) fn run(arg: &LabelArg) -> anyhow::Result<()> {
    let LabelArg {
        population,
        standards,
        output,
        strict_tiers,
    } = arg;
    let tier_parsing = if *strict_tiers {
        TierParsing::Strict
    } else {
        TierParsing::Lenient
    };

    let standards = util::read_standards_file(standards)?;
    let mut rows = data::read_population(population)?;
    let records = data::to_records(&rows, tier_parsing)?;

    let labels = labels::label_population(&records, &standards)
        .context("Failed to label population")?;

    let mut ready = 0;
    let mut unlabeled = 0;
    for (row, label) in rows.iter_mut().zip(labels) {
        if row.player_id.as_deref().is_none_or(str::is_empty) {
            row.player_id = Some(Uuid::new_v4().to_string());
        }
        row.promotion_ready = label.map(u8::from);
        match label {
            Some(true) => ready += 1,
            Some(false) => {}
            None => unlabeled += 1,
        }
    }
    eprintln!(
        "Labeled {} rows: {ready} ready, {unlabeled} without valid stats",
        rows.len()
    );

    let mut output = Output::from_output_path(output.clone())?;
    data::write_population(&mut output, &rows).with_context(|| {
        format!(
            "Failed to write labeled population to {}",
            output.display_path()
        )
    })?;
    output.commit()
}
