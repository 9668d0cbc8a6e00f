//! Request-time entry point.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tierlift_core::{FeatureVector, PlayerSubmission, StatRecord, Tier, TierParsing, TierStandard};
use tierlift_training::{population::HistoricalRecord, standards::TierStandardBuilder};

use crate::{
    error::EngineError,
    feedback::Feedback,
    goal::{self, WeeklyGoal},
    history::{HistoryEntry, ProfileHistory},
    store::{ArtifactStore, Artifacts},
};

/// Number of tips and drills forwarded to the profile history.
pub const FORWARDED_ITEMS: usize = 2;

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub username: Option<String>,
    pub stats: FeatureVector,
    pub tier: Tier,
    pub promotion_ready: bool,
    pub drills: Vec<&'static str>,
    pub tips: Vec<&'static str>,
}

/// Serves assessments, standards and weekly goals from the current
/// artifacts, forwarding named assessments to a [`ProfileHistory`].
#[derive(Debug)]
pub struct Engine<H> {
    store: Arc<ArtifactStore>,
    history: H,
    tier_parsing: TierParsing,
}

impl<H> Engine<H>
where
    H: ProfileHistory,
{
    #[must_use]
    pub fn new(store: Arc<ArtifactStore>, history: H) -> Self {
        Self {
            store,
            history,
            tier_parsing: TierParsing::default(),
        }
    }

    #[must_use]
    pub fn with_tier_parsing(self, tier_parsing: TierParsing) -> Self {
        Self {
            tier_parsing,
            ..self
        }
    }

    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Validates a submission, selects feedback and predicts readiness.
    ///
    /// Named players get the assessment forwarded to the profile history;
    /// forwarding failures are logged and do not fail the request.
    pub fn submit(
        &self,
        submission: &PlayerSubmission,
        now: DateTime<Utc>,
    ) -> Result<Assessment, EngineError> {
        let submission = submission.validate(self.tier_parsing)?;
        let promotion_ready = self.predict(&submission.features, submission.tier)?;
        let feedback = Feedback::evaluate(&submission.features);

        if let Some(username) = &submission.username {
            let entry = HistoryEntry {
                stats: submission.features,
                tier: submission.tier,
                tips: feedback.top_tips(FORWARDED_ITEMS).map(str::to_owned).collect(),
                drills: feedback.top_drills(FORWARDED_ITEMS).map(str::to_owned).collect(),
                promotion_ready,
                timestamp: now,
            };
            if let Err(e) = self.history.append(username, entry) {
                log::warn!("failed to forward assessment of {username}: {e}");
            }
        }

        Ok(Assessment {
            username: submission.username,
            stats: submission.features,
            tier: submission.tier,
            promotion_ready,
            drills: feedback.drills.into_iter().collect(),
            tips: feedback.tips.into_iter().collect(),
        })
    }

    /// Predicts promotion readiness with the loaded classifier.
    pub fn predict(&self, features: &FeatureVector, tier: Tier) -> Result<bool, EngineError> {
        let artifacts = self.store.snapshot();
        let classifier = artifacts
            .classifier
            .as_ref()
            .ok_or(EngineError::ModelUnavailable {
                artifact: "classifier",
            })?;
        Ok(classifier.predict(features, tier))
    }

    /// The standard of `tier`, or `None` when the tier has none.
    pub fn standard_for(&self, tier: Tier) -> Result<Option<TierStandard>, EngineError> {
        let artifacts = self.store.snapshot();
        let standards = artifacts
            .standards
            .as_ref()
            .ok_or(EngineError::ModelUnavailable {
                artifact: "tier standards",
            })?;
        Ok(standards.get(tier).copied())
    }

    /// Weekly goal from the player's recorded history within the trailing
    /// window ending at `now`.
    pub fn weekly_goal(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<WeeklyGoal, EngineError> {
        let artifacts = self.store.snapshot();
        let standards = artifacts
            .standards
            .as_ref()
            .ok_or(EngineError::ModelUnavailable {
                artifact: "tier standards",
            })?;

        let history = self
            .history
            .recent(username)?
            .iter()
            .map(HistoryEntry::to_record)
            .collect::<Vec<StatRecord>>();
        let recent = goal::recent_window(&history, now);
        log::debug!(
            "{username}: {} of {} history entries within the window",
            recent.len(),
            history.len()
        );
        Ok(goal::analyze(&recent, standards)?)
    }

    /// Recomputes the tier standards and publishes them, keeping the current
    /// classifier. Nothing is published when the build fails.
    pub fn rebuild_standards(&self, population: &[HistoricalRecord]) -> Result<(), EngineError> {
        let standards = Arc::new(TierStandardBuilder::default().build(population)?);
        self.store.update(|current| Artifacts {
            standards: Some(standards),
            classifier: current.classifier.clone(),
        });
        Ok(())
    }
}
