use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context as _;
use tierlift_core::{Stat, TierParsing};
use tierlift_stats::descriptive::DescriptiveStats;
use tierlift_training::{kmeans::KMeansParams, standards::TierStandardBuilder};

use crate::{data, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BuildStandardsArg {
    /// Historical population CSV file
    #[arg(long)]
    population: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Seed for k-means initialization
    #[arg(long, default_value_t = KMeansParams::default().seed)]
    seed: u64,
    /// Number of k-means restarts per tier
    #[arg(long, default_value_t = KMeansParams::default().restarts)]
    restarts: usize,
    /// Reject rows with an unknown tier instead of treating them as Bronze
    #[arg(long)]
    strict_tiers: bool,
}

pub(crate) fn run(arg: &BuildStandardsArg) -> anyhow::Result<()> {
    let BuildStandardsArg {
        population,
        output,
        seed,
        restarts,
        strict_tiers,
    } = arg;
    let tier_parsing = if *strict_tiers {
        TierParsing::Strict
    } else {
        TierParsing::Lenient
    };

    eprintln!("Loading population from {}...", population.display());
    let rows = data::read_population(population)?;
    let records = data::to_records(&rows, tier_parsing)?;
    eprintln!("Loaded {} rows", records.len());

    let mut kd_by_tier = BTreeMap::<_, Vec<f64>>::new();
    for record in &records {
        if let Some(features) = record.valid_features() {
            kd_by_tier
                .entry(record.tier)
                .or_default()
                .push(features.get(Stat::KdRatio));
        }
    }
    for (tier, kd) in kd_by_tier {
        if let Some(stats) = DescriptiveStats::new(kd) {
            eprintln!(
                "  {tier:<12} n={:<5} K/D mean={:.3} median={:.3} max={:.3}",
                stats.count, stats.mean, stats.median, stats.max
            );
        }
    }

    let params = KMeansParams {
        seed: *seed,
        restarts: *restarts,
        ..KMeansParams::default()
    };
    let standards = TierStandardBuilder::new(params)
        .build(&records)
        .context("Failed to build tier standards")?;
    eprintln!("Built standards for {} tiers", standards.len());

    Output::save_json(&standards, output.clone())
}
