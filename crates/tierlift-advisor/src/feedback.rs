//! Rule-based practice feedback.
//!
//! Each rule inspects one stat and, when its condition holds, contributes
//! drills and tips. A fixed baseline of drills and tips is always included.
//! Results are sets, so overlapping rules never produce duplicates and the
//! output order is stable.

use std::collections::BTreeSet;

use serde::Serialize;
use tierlift_core::{FeatureVector, Stat};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Condition {
    Below(f64),
    /// Lower bound inclusive, upper bound exclusive
    Within(f64, f64),
    Above(f64),
}

impl Condition {
    fn holds(self, value: f64) -> bool {
        match self {
            Self::Below(max) => value < max,
            Self::Within(min, max) => min <= value && value < max,
            Self::Above(min) => value > min,
        }
    }
}

struct Rule {
    stat: Stat,
    condition: Condition,
    drills: &'static [&'static str],
    tips: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        stat: Stat::HeadshotPercentage,
        condition: Condition::Below(10.0),
        drills: &[
            "1v1 M416 Headshot only (000-010-529)",
            "Aim Lab - Headshot drills",
        ],
        tips: &[
            "Focus on crosshair placement around upper chest/neck",
            "Use ADS + gyroscope for sharper adjustments",
        ],
    },
    Rule {
        stat: Stat::HeadshotPercentage,
        condition: Condition::Within(10.0, 20.0),
        drills: &[],
        tips: &["You\u{2019}re improving. Focus on fast flicks in close-range battles"],
    },
    Rule {
        stat: Stat::AvgDamage,
        condition: Condition::Below(250.0),
        drills: &[
            "Training Map \u{2013} Mid-range recoil control with M416",
            "M4 vs UMP 2v2 (000-010-525)",
        ],
        tips: &["Focus on 5-finger claw grip to handle recoil better"],
    },
    Rule {
        stat: Stat::AvgDamage,
        condition: Condition::Above(500.0),
        drills: &[],
        tips: &["Excellent damage output \u{2013} maintain your distance awareness"],
    },
    Rule {
        stat: Stat::AvgSurvivalTime,
        condition: Condition::Below(6.0),
        drills: &[
            "Erangel Hill Survival (000-010-329)",
            "Zone survival custom rooms",
        ],
        tips: &[
            "Land on edge zones to loot peacefully",
            "Avoid hot drops unless needed",
        ],
    },
    Rule {
        stat: Stat::AvgSurvivalTime,
        condition: Condition::Within(6.0, 10.0),
        drills: &[],
        tips: &["Good survival instincts \u{2013} work on final zone positioning"],
    },
    Rule {
        stat: Stat::WinRatio,
        condition: Condition::Below(20.0),
        drills: &["Sanhok Classic mode with squad coordination"],
        tips: &["Play with mic to enhance real-time team coordination"],
    },
];

/// Drills included in every feedback.
pub const BASELINE_DRILLS: &[&str] = &[
    "Gun Game \u{2013} Weapon switching speed test",
    "Training Map \u{2013} SMG vs AR recoil battle",
    "Cheer Park sniper duels",
];

/// Tips included in every feedback.
pub const BASELINE_TIPS: &[&str] = &[
    "Participate in weekly training challenges",
    "Master one long-range weapon and one short-range",
    "Join scrims/customs to experience competitive fights",
];

/// Drills and tips selected for one set of stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub drills: BTreeSet<&'static str>,
    pub tips: BTreeSet<&'static str>,
}

impl Feedback {
    /// Evaluates the rule table against `features`.
    #[must_use]
    pub fn evaluate(features: &FeatureVector) -> Self {
        let mut feedback = Self {
            drills: BASELINE_DRILLS.iter().copied().collect(),
            tips: BASELINE_TIPS.iter().copied().collect(),
        };
        for rule in RULES {
            if rule.condition.holds(features.get(rule.stat)) {
                feedback.drills.extend(rule.drills);
                feedback.tips.extend(rule.tips);
            }
        }
        feedback
    }

    /// The first `n` drills in output order.
    pub fn top_drills(&self, n: usize) -> impl Iterator<Item = &'static str> + '_ {
        self.drills.iter().copied().take(n)
    }

    /// The first `n` tips in output order.
    pub fn top_tips(&self, n: usize) -> impl Iterator<Item = &'static str> + '_ {
        self.tips.iter().copied().take(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(headshot: f64, damage: f64, survival: f64, win: f64) -> FeatureVector {
        FeatureVector {
            kd_ratio: 1.0,
            avg_damage: damage,
            avg_survival_time: survival,
            win_ratio: win,
            headshot_percentage: headshot,
        }
    }

    fn assert_has_baseline(feedback: &Feedback) {
        for drill in BASELINE_DRILLS {
            assert!(feedback.drills.contains(drill), "missing {drill}");
        }
        for tip in BASELINE_TIPS {
            assert!(feedback.tips.contains(tip), "missing {tip}");
        }
    }

    #[test]
    fn test_strong_player_gets_baseline_and_praise() {
        let feedback = Feedback::evaluate(&features(5.0, 600.0, 12.0, 50.0));

        assert_has_baseline(&feedback);
        assert!(feedback.drills.contains("1v1 M416 Headshot only (000-010-529)"));
        assert!(feedback.drills.contains("Aim Lab - Headshot drills"));
        assert!(!feedback.drills.contains("M4 vs UMP 2v2 (000-010-525)"));
        assert!(
            feedback
                .tips
                .contains("Excellent damage output \u{2013} maintain your distance awareness")
        );
        assert_eq!(feedback.drills.len(), BASELINE_DRILLS.len() + 2);
        assert_eq!(feedback.tips.len(), BASELINE_TIPS.len() + 3);
    }

    #[test]
    fn test_baseline_only_when_no_rule_fires() {
        let feedback = Feedback::evaluate(&features(25.0, 300.0, 12.0, 30.0));
        assert_has_baseline(&feedback);
        assert_eq!(feedback.drills.len(), BASELINE_DRILLS.len());
        assert_eq!(feedback.tips.len(), BASELINE_TIPS.len());
    }

    #[test]
    fn test_thresholds_are_exact() {
        // lower bounds of the "within" bands are inclusive
        let at_bounds = Feedback::evaluate(&features(10.0, 250.0, 6.0, 20.0));
        assert!(
            at_bounds
                .tips
                .contains("You\u{2019}re improving. Focus on fast flicks in close-range battles")
        );
        assert!(
            at_bounds
                .tips
                .contains("Good survival instincts \u{2013} work on final zone positioning")
        );
        assert!(!at_bounds.drills.contains("Aim Lab - Headshot drills"));
        assert!(!at_bounds.drills.contains("M4 vs UMP 2v2 (000-010-525)"));
        assert!(!at_bounds.drills.contains("Erangel Hill Survival (000-010-329)"));
        assert!(!at_bounds.drills.contains("Sanhok Classic mode with squad coordination"));

        // upper bounds are exclusive
        let above = Feedback::evaluate(&features(20.0, 500.0, 10.0, 19.9));
        assert_eq!(above.tips.len(), BASELINE_TIPS.len() + 1);
        assert!(above.drills.contains("Sanhok Classic mode with squad coordination"));
    }

    #[test]
    fn test_weak_player_gets_every_remedial_rule() {
        let feedback = Feedback::evaluate(&features(2.0, 120.0, 3.0, 4.0));
        assert_has_baseline(&feedback);
        assert_eq!(feedback.drills.len(), BASELINE_DRILLS.len() + 7);
        assert_eq!(feedback.tips.len(), BASELINE_TIPS.len() + 6);
    }

    #[test]
    fn test_top_items_follow_sorted_order() {
        let feedback = Feedback::evaluate(&features(5.0, 600.0, 12.0, 50.0));
        let drills = feedback.top_drills(2).collect::<Vec<_>>();
        assert_eq!(
            drills,
            vec!["1v1 M416 Headshot only (000-010-529)", "Aim Lab - Headshot drills"]
        );
        assert_eq!(feedback.top_tips(10).count(), feedback.tips.len());
    }
}
