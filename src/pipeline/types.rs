use serde::{Deserialize, Serialize};

use crate::anchors::{AnchorSet, ResolutionTier};
use crate::calibration::LabeledCase;
use crate::scoring::ScoreResult;

/// A response scored against its scale's anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedResponse {
    pub score: ScoreResult,
    pub anchors: AnchorSet,
    pub tier: ResolutionTier,
    /// Raw cosine similarity to each anchor.
    pub similarities: Vec<f64>,
}

impl RatedResponse {
    pub fn rating(&self) -> i32 {
        self.score.rating
    }

    pub fn confidence(&self) -> f64 {
        self.score.confidence
    }

    /// Labeled calibration case built from this response's similarities.
    pub fn to_labeled_case(
        &self,
        id: impl Into<String>,
        domain: impl Into<String>,
        gold: i32,
    ) -> LabeledCase {
        LabeledCase::new(id, domain, gold, self.similarities.clone())
            .with_scale_min(self.anchors.min)
            .with_resolution_tier(self.tier)
    }
}
