use std::path::PathBuf;

use anyhow::Context as _;
use tierlift_core::TierParsing;
use tierlift_training::{
    classifier::{ClassifierParams, PromotionClassifier},
    forest::ForestParams,
    labels,
};

use crate::{data, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainClassifierArg {
    /// Labeled population CSV file (see the `label` command)
    #[arg(long)]
    population: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Seed for the train/test split and the forest
    #[arg(long, default_value_t = ForestParams::default().seed)]
    seed: u64,
    /// Number of trees in the forest
    #[arg(long, default_value_t = ForestParams::default().trees)]
    trees: usize,
    /// Fraction of samples held out for evaluation
    #[arg(long, default_value_t = ClassifierParams::default().test_fraction)]
    test_fraction: f64,
    /// Reject rows with an unknown tier instead of treating them as Bronze
    #[arg(long)]
    strict_tiers: bool,
}

pub(crate) fn run(arg: &TrainClassifierArg) -> anyhow::Result<()> {
    let TrainClassifierArg {
        population,
        output,
        seed,
        trees,
        test_fraction,
        strict_tiers,
    } = arg;
    anyhow::ensure!(
        (0.0..1.0).contains(test_fraction),
        "test fraction must be within 0.0..1.0, got {test_fraction}"
    );
    let tier_parsing = if *strict_tiers {
        TierParsing::Strict
    } else {
        TierParsing::Lenient
    };

    let rows = data::read_population(population)?;
    let records = data::to_records(&rows, tier_parsing)?;
    let samples = labels::labeled_samples(&records);
    eprintln!(
        "Loaded {} rows, {} usable labeled samples",
        records.len(),
        samples.len()
    );

    let params = ClassifierParams {
        forest: ForestParams {
            trees: *trees,
            seed: *seed,
            ..ForestParams::default()
        },
        test_fraction: *test_fraction,
    };
    let classifier = PromotionClassifier::new(params)
        .train(&samples)
        .context("Failed to train classifier")?;

    let eval = &classifier.evaluation;
    eprintln!("Held-out evaluation ({} samples):", eval.total());
    match eval.accuracy() {
        Some(accuracy) => eprintln!("  Accuracy:  {accuracy:.3}"),
        None => eprintln!("  Accuracy:  n/a"),
    }
    if let Some(precision) = eval.precision() {
        eprintln!("  Precision: {precision:.3}");
    }
    if let Some(recall) = eval.recall() {
        eprintln!("  Recall:    {recall:.3}");
    }
    eprintln!(
        "  Confusion: TP={} FP={} TN={} FN={}",
        eval.true_positives, eval.false_positives, eval.true_negatives, eval.false_negatives
    );

    Output::save_json(&classifier, output.clone())
}
