//! Weekly improvement goals.
//!
//! A goal targets the stat where the player's recent average falls furthest
//! below their tier's standard:
//!
//! 1. Average each stat over the recent records
//! 2. Take the tier of the newest record
//! 3. Compute `gap = average - standard` for every stat
//! 4. Pick the smallest gap; equal gaps resolve in [`Stat::ALL`] order
//! 5. Set the target to the standard raised by 10%, rounded to one decimal

use std::cmp::Reverse;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tierlift_core::{FeatureVector, Stat, StatRecord, Tier, TierStandards};
use tierlift_stats::descriptive;

/// Length of the recent-history window in days.
pub const WINDOW_DAYS: i64 = 7;

/// Factor applied to the standard to form the target.
pub const STRETCH_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GoalError {
    #[display("no stats recorded in the last {WINDOW_DAYS} days")]
    NoRecentData,
    #[display("no standard available for tier {tier}")]
    StandardNotFound { tier: Tier },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoal {
    pub stat: Stat,
    pub target: f64,
    pub message: String,
    pub tier: Tier,
    /// Recent average minus standard for the chosen stat
    pub gap: f64,
    pub average: FeatureVector,
}

/// Records no older than [`WINDOW_DAYS`] before `now`.
#[must_use]
pub fn recent_window(history: &[StatRecord], now: DateTime<Utc>) -> Vec<StatRecord> {
    let cutoff = now - TimeDelta::days(WINDOW_DAYS);
    history
        .iter()
        .filter(|record| record.timestamp >= cutoff)
        .copied()
        .collect()
}

/// Computes the weekly goal for a player's recent records.
///
/// `recent` may be in any order. Among records sharing the newest
/// timestamp, the first one listed provides the tier.
pub fn analyze(
    recent: &[StatRecord],
    standards: &TierStandards,
) -> Result<WeeklyGoal, GoalError> {
    let newest = recent
        .iter()
        .min_by_key(|record| Reverse(record.timestamp))
        .ok_or(GoalError::NoRecentData)?;
    let tier = newest.tier;

    let average = FeatureVector::from_fn(|stat| {
        descriptive::mean(recent.iter().map(|record| record.features.get(stat))).unwrap_or_default()
    });
    let standard = standards
        .get(tier)
        .ok_or(GoalError::StandardNotFound { tier })?;

    let gap_of = |stat: Stat| average.get(stat) - standard.get(stat);
    let first = Stat::ALL[0];
    let (stat, gap) = Stat::ALL[1..]
        .iter()
        .map(|&stat| (stat, gap_of(stat)))
        .fold((first, gap_of(first)), |weakest, candidate| {
            if candidate.1 < weakest.1 {
                candidate
            } else {
                weakest
            }
        });

    let target = round_to_tenth(standard.get(stat) * STRETCH_FACTOR);
    Ok(WeeklyGoal {
        stat,
        target,
        message: format!("Focus on your {stat}! Try to reach {target:.1}+ this week."),
        tier,
        gap,
        average,
    })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use tierlift_core::TierStandard;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn record(features: FeatureVector, tier: Tier, day: u32) -> StatRecord {
        StatRecord::new(features, tier, at(day))
    }

    fn stats(kd: f64, damage: f64, survival: f64, win: f64, headshot: f64) -> FeatureVector {
        FeatureVector {
            kd_ratio: kd,
            avg_damage: damage,
            avg_survival_time: survival,
            win_ratio: win,
            headshot_percentage: headshot,
        }
    }

    fn silver_standards() -> TierStandards {
        [(
            Tier::Silver,
            TierStandard::from(stats(1.5, 175.0, 4.0, 9.0, 12.0)),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_silver_history_targets_largest_shortfall() {
        let history = [
            record(stats(1.4, 180.0, 4.5, 10.0, 8.0), Tier::Silver, 10),
            record(stats(1.6, 190.0, 5.5, 12.0, 10.0), Tier::Silver, 11),
        ];
        let standards = silver_standards();
        let goal = analyze(&history, &standards).unwrap();

        // averages: kd 1.5, dmg 185, surv 5, win 11, hs 9
        let silver = standards.get(Tier::Silver).unwrap();
        let gaps = Stat::ALL.map(|stat| goal.average.get(stat) - silver.get(stat));
        assert!(gaps[Stat::HeadshotPercentage.index()] < gaps[Stat::KdRatio.index()]);
        assert!(gaps[Stat::HeadshotPercentage.index()] < gaps[Stat::AvgSurvivalTime.index()]);
        assert!(gaps[Stat::HeadshotPercentage.index()] < gaps[Stat::WinRatio.index()]);
        assert!(gaps[Stat::HeadshotPercentage.index()] < gaps[Stat::AvgDamage.index()]);

        assert_eq!(goal.stat, Stat::HeadshotPercentage);
        assert_eq!(goal.tier, Tier::Silver);
        assert!((goal.gap - -3.0).abs() < 1e-9);
        assert_eq!(goal.target, 13.2);
        assert_eq!(
            goal.message,
            "Focus on your Headshot Percentage! Try to reach 13.2+ this week."
        );
    }

    #[test]
    fn test_kd_shortfall_can_be_weakest() {
        let history = [record(stats(0.2, 180.0, 4.5, 10.0, 12.5), Tier::Silver, 10)];
        let goal = analyze(&history, &silver_standards()).unwrap();
        assert_eq!(goal.stat, Stat::KdRatio);
        assert_eq!(goal.target, 1.7);
        assert_eq!(
            goal.message,
            "Focus on your K/D Ratio! Try to reach 1.7+ this week."
        );
    }

    #[test]
    fn test_equal_gaps_follow_priority_order() {
        // every stat exactly one below its standard
        let standard = stats(3.0, 200.0, 8.0, 20.0, 15.0);
        let standards: TierStandards = [(Tier::Gold, TierStandard::from(standard))]
            .into_iter()
            .collect();
        let history = [record(
            FeatureVector::from_fn(|stat| standard.get(stat) - 1.0),
            Tier::Gold,
            3,
        )];
        let goal = analyze(&history, &standards).unwrap();
        assert_eq!(goal.stat, Stat::KdRatio);

        // tie between damage and survival only
        let history = [record(
            FeatureVector::from_fn(|stat| match stat {
                Stat::AvgDamage | Stat::AvgSurvivalTime => standard.get(stat) - 2.0,
                _ => standard.get(stat),
            }),
            Tier::Gold,
            3,
        )];
        let goal = analyze(&history, &standards).unwrap();
        assert_eq!(goal.stat, Stat::AvgDamage);
        assert_eq!(goal.target, 220.0);
        assert_eq!(
            goal.message,
            "Focus on your Average Damage! Try to reach 220.0+ this week."
        );
    }

    #[test]
    fn test_tier_comes_from_newest_record_regardless_of_order() {
        let standards: TierStandards = [
            (Tier::Silver, TierStandard::from(stats(1.5, 175.0, 4.0, 9.0, 12.0))),
            (Tier::Gold, TierStandard::from(stats(2.5, 300.0, 8.0, 15.0, 20.0))),
        ]
        .into_iter()
        .collect();
        let history = [
            record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Silver, 9),
            record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Gold, 12),
            record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Silver, 10),
        ];
        assert_eq!(analyze(&history, &standards).unwrap().tier, Tier::Gold);
    }

    #[test]
    fn test_same_second_records_take_tier_from_first_listed() {
        let standards: TierStandards = [
            (Tier::Silver, TierStandard::from(stats(1.5, 175.0, 4.0, 9.0, 12.0))),
            (Tier::Gold, TierStandard::from(stats(2.5, 300.0, 8.0, 15.0, 20.0))),
        ]
        .into_iter()
        .collect();
        // newest first, both within the same second
        let history = [
            record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Gold, 12),
            record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Silver, 12),
        ];
        assert_eq!(analyze(&history, &standards).unwrap().tier, Tier::Gold);
    }

    #[test]
    fn test_empty_history_is_distinct_from_missing_standard() {
        assert_eq!(
            analyze(&[], &silver_standards()).unwrap_err(),
            GoalError::NoRecentData
        );

        let history = [record(stats(1.0, 150.0, 4.0, 9.0, 12.0), Tier::Diamond, 9)];
        assert_eq!(
            analyze(&history, &silver_standards()).unwrap_err(),
            GoalError::StandardNotFound {
                tier: Tier::Diamond
            }
        );
    }

    #[test]
    fn test_recent_window_cutoff_is_inclusive() {
        let now = at(20);
        let history = [
            record(FeatureVector::default(), Tier::Bronze, 12),
            record(FeatureVector::default(), Tier::Bronze, 13),
            record(FeatureVector::default(), Tier::Bronze, 19),
        ];
        let recent = recent_window(&history, now);
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r.timestamp >= at(13)));
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(13.2000001), 13.2);
        assert_eq!(round_to_tenth(1.65), 1.7);
        assert_eq!(round_to_tenth(192.5), 192.5);
    }
}
