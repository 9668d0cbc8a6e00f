use clap::{Parser, Subcommand};

use self::{
    build_standards::BuildStandardsArg, label::LabelArg, standards::StandardsArg,
    submit::SubmitArg, train_classifier::TrainClassifierArg, weekly_goal::WeeklyGoalArg,
};

mod build_standards;
mod label;
mod standards;
mod submit;
mod train_classifier;
mod weekly_goal;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Derive per-tier standards from a historical population
    BuildStandards(#[clap(flatten)] BuildStandardsArg),
    /// Label a historical population with promotion readiness
    Label(#[clap(flatten)] LabelArg),
    /// Train the promotion-readiness classifier on a labeled population
    TrainClassifier(#[clap(flatten)] TrainClassifierArg),
    /// Print the standard of one tier
    Standards(#[clap(flatten)] StandardsArg),
    /// Assess a player submission
    Submit(#[clap(flatten)] SubmitArg),
    /// Compute a player's weekly goal from their recent history
    WeeklyGoal(#[clap(flatten)] WeeklyGoalArg),
}

pub fn run() -> anyhow::Result<()> {
    run_with(CommandArgs::parse())
}

fn run_with(args: CommandArgs) -> anyhow::Result<()> {
    match args.mode {
        Mode::BuildStandards(arg) => build_standards::run(&arg)?,
        Mode::Label(arg) => label::run(&arg)?,
        Mode::TrainClassifier(arg) => train_classifier::run(&arg)?,
        Mode::Standards(arg) => standards::run(&arg)?,
        Mode::Submit(arg) => submit::run(&arg)?,
        Mode::WeeklyGoal(arg) => weekly_goal::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fmt::Write as _, fs, path::Path};

    use tierlift_core::{Tier, TierStandards};
    use tierlift_training::classifier::TrainedClassifier;

    use super::*;
    use crate::{data, util};

    fn run_args(args: &[&str]) -> anyhow::Result<()> {
        run_with(CommandArgs::try_parse_from(
            std::iter::once("tierlift").chain(args.iter().copied()),
        )?)
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    fn write_population(path: &Path) {
        let mut csv = String::from(concat!(
            "Player_ID,Player_Name,K/D_Ratio,Avg_Damage,Survival_Time,Tier,",
            "Win_Rate (%),Headshot_Rate (%),Drills,Opinions,Promotion_Ready,Date\n",
        ));
        for i in 0..40 {
            let tier = if i % 2 == 0 { "Gold" } else { "Silver" };
            let kd = 0.5 + f64::from(i % 20) * 0.15;
            let id = if i == 0 { String::new() } else { format!("P{i}") };
            writeln!(
                csv,
                "{id},Player{i},{kd:.2},{:.1},{:.1},{tier},{:.1},{:.1},,,,",
                100.0 + 80.0 * kd,
                3.0 + 2.0 * kd,
                4.0 + 6.0 * kd,
                5.0 + 5.0 * kd,
            )
            .unwrap();
        }
        fs::write(path, csv).unwrap();
    }

    #[test]
    fn test_training_pipeline_and_requests() {
        let dir = tempfile::tempdir().unwrap();
        let population = dir.path().join("population.csv");
        let standards = dir.path().join("standards.json");
        let labeled = dir.path().join("labeled.csv");
        let classifier = dir.path().join("classifier.json");
        let history = dir.path().join("history");
        write_population(&population);

        run_args(&[
            "build-standards",
            "--population",
            path_str(&population),
            "--output",
            path_str(&standards),
        ])
        .unwrap();
        let built: TierStandards = util::read_standards_file(&standards).unwrap();
        assert_eq!(built.len(), 2);
        assert!(built.get(Tier::Gold).is_some());

        run_args(&[
            "label",
            "--population",
            path_str(&population),
            "--standards",
            path_str(&standards),
            "--output",
            path_str(&labeled),
        ])
        .unwrap();
        let rows = data::read_population(&labeled).unwrap();
        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|row| row.promotion_ready.is_some()));
        assert!(rows.iter().any(|row| row.promotion_ready == Some(1)));
        assert!(rows[0].player_id.as_deref().is_some_and(|id| !id.is_empty()));

        run_args(&[
            "train-classifier",
            "--population",
            path_str(&labeled),
            "--output",
            path_str(&classifier),
            "--trees",
            "10",
        ])
        .unwrap();
        let trained: TrainedClassifier = util::read_classifier_file(&classifier).unwrap();
        assert_eq!(trained.forest.trees().len(), 10);
        assert_eq!(trained.evaluation.total(), 8);

        let submission = dir.path().join("submission.json");
        fs::write(
            &submission,
            concat!(
                r#"{"username":"ace","kdRatio":2.0,"avgDamage":260,"avgSurvivalTime":7,"#,
                r#""tier":"Gold","winRatio":16,"headshotPercentage":4}"#,
            ),
        )
        .unwrap();
        run_args(&[
            "submit",
            "--input",
            path_str(&submission),
            "--standards",
            path_str(&standards),
            "--classifier",
            path_str(&classifier),
            "--history-dir",
            path_str(&history),
            "--population",
            path_str(&labeled),
            "--now",
            "2024-06-01T12:00:00Z",
        ])
        .unwrap();
        assert!(history.join("ace.json").exists());

        let rows = data::read_population(&labeled).unwrap();
        assert_eq!(rows.len(), 41);
        let recorded = &rows[40];
        assert_eq!(recorded.player_name.as_deref(), Some("ace"));
        assert_eq!(recorded.tier, "Gold");
        assert_eq!(recorded.kd_ratio, Some(2.0));
        assert!(recorded.promotion_ready.is_some());
        assert!(recorded.drills.as_deref().is_some_and(|d| !d.is_empty()));
        assert_eq!(recorded.date.as_deref(), Some("2024-06-01 12:00:00"));
        assert!(recorded.player_id.as_deref().is_some_and(|id| !id.is_empty()));

        run_args(&[
            "weekly-goal",
            "--username",
            "ace",
            "--standards",
            path_str(&standards),
            "--history-dir",
            path_str(&history),
            "--now",
            "2024-06-03T12:00:00Z",
        ])
        .unwrap();

        let err = run_args(&[
            "weekly-goal",
            "--username",
            "ace",
            "--standards",
            path_str(&standards),
            "--history-dir",
            path_str(&history),
            "--now",
            "2024-07-01T12:00:00Z",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("ace"));

        run_args(&[
            "standards",
            "--standards",
            path_str(&standards),
            "--tier",
            "Legend",
        ])
        .unwrap();
    }

    #[test]
    fn test_build_fails_without_writing_on_sparse_tier() {
        let dir = tempfile::tempdir().unwrap();
        let population = dir.path().join("population.csv");
        let standards = dir.path().join("standards.json");
        fs::write(
            &population,
            concat!(
                "K/D_Ratio,Avg_Damage,Survival_Time,Tier,Win_Rate (%),Headshot_Rate (%)\n",
                "1.0,200,5,Gold,10,10\n",
                "1.2,220,6,Gold,12,11\n",
            ),
        )
        .unwrap();

        let err = run_args(&[
            "build-standards",
            "--population",
            path_str(&population),
            "--output",
            path_str(&standards),
        ])
        .unwrap_err();
        assert!(format!("{err:#}").contains("Gold"));
        assert!(!standards.exists());
    }
}
