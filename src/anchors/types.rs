use serde::{Deserialize, Serialize};

use super::error::ScaleError;

/// Largest number of points a scale may have.
pub const MAX_SCALE_POINTS: usize = 101;

/// Bounds of the fixed recommendation scale.
pub const RECOMMENDATION_MIN: i32 = 0;
pub const RECOMMENDATION_MAX: i32 = 10;

/// Kind of ordinal scale a survey question uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleKind {
    /// Bounded agreement-style scale (e.g. 1-5, 1-7).
    #[default]
    Likert,
    /// Generic bounded numeric rating (e.g. 1-10 stars).
    Rating,
    /// Fixed 0-10 "how likely are you to recommend" scale.
    Recommendation,
}

/// Immutable description of an ordinal response scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScaleDefinition")]
pub struct ScaleDefinition {
    kind: ScaleKind,
    min: i32,
    max: i32,
    low_label: Option<String>,
    high_label: Option<String>,
    question_text: Option<String>,
}

#[derive(Deserialize)]
struct RawScaleDefinition {
    #[serde(default)]
    kind: ScaleKind,
    min: Option<i32>,
    max: Option<i32>,
    low_label: Option<String>,
    high_label: Option<String>,
    question_text: Option<String>,
}

impl TryFrom<RawScaleDefinition> for ScaleDefinition {
    type Error = ScaleError;

    fn try_from(raw: RawScaleDefinition) -> Result<Self, Self::Error> {
        let base = match raw.kind {
            ScaleKind::Recommendation => {
                let min = raw.min.unwrap_or(RECOMMENDATION_MIN);
                let max = raw.max.unwrap_or(RECOMMENDATION_MAX);
                if min != RECOMMENDATION_MIN || max != RECOMMENDATION_MAX {
                    return Err(ScaleError::FixedScaleMismatch { min, max });
                }
                Self::recommendation()
            }
            kind => Self::bounded(kind, raw.min.unwrap_or(1), raw.max.unwrap_or(5))?,
        };

        Ok(Self {
            low_label: clean_label(raw.low_label),
            high_label: clean_label(raw.high_label),
            question_text: clean_label(raw.question_text),
            ..base
        })
    }
}

fn clean_label(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

impl ScaleDefinition {
    /// Bounded Likert scale `[min, max]`.
    pub fn likert(min: i32, max: i32) -> Result<Self, ScaleError> {
        Self::bounded(ScaleKind::Likert, min, max)
    }

    /// Bounded numeric rating scale `[min, max]`.
    pub fn rating(min: i32, max: i32) -> Result<Self, ScaleError> {
        Self::bounded(ScaleKind::Rating, min, max)
    }

    /// The fixed 0-10 recommendation scale.
    pub fn recommendation() -> Self {
        Self {
            kind: ScaleKind::Recommendation,
            min: RECOMMENDATION_MIN,
            max: RECOMMENDATION_MAX,
            low_label: None,
            high_label: None,
            question_text: None,
        }
    }

    fn bounded(kind: ScaleKind, min: i32, max: i32) -> Result<Self, ScaleError> {
        if max <= min {
            return Err(ScaleError::InvalidBounds { min, max });
        }
        let points = max as i64 - min as i64 + 1;
        if points > MAX_SCALE_POINTS as i64 {
            return Err(ScaleError::TooManyPoints {
                points,
                limit: MAX_SCALE_POINTS,
            });
        }
        Ok(Self {
            kind,
            min,
            max,
            low_label: None,
            high_label: None,
            question_text: None,
        })
    }

    /// Attaches pole labels (blank labels are dropped).
    pub fn with_labels(mut self, low: impl Into<String>, high: impl Into<String>) -> Self {
        self.low_label = clean_label(Some(low.into()));
        self.high_label = clean_label(Some(high.into()));
        self
    }

    /// Attaches the source question text.
    pub fn with_question(mut self, text: impl Into<String>) -> Self {
        self.question_text = clean_label(Some(text.into()));
        self
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Number of scale points, `max - min + 1`.
    pub fn points(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    pub fn low_label(&self) -> Option<&str> {
        self.low_label.as_deref()
    }

    pub fn high_label(&self) -> Option<&str> {
        self.high_label.as_deref()
    }

    pub fn question_text(&self) -> Option<&str> {
        self.question_text.as_deref()
    }

    /// Returns `true` if both pole labels are present.
    pub fn has_label_pair(&self) -> bool {
        self.low_label.is_some() && self.high_label.is_some()
    }

    /// Returns `true` if either pole label is present.
    pub fn has_any_label(&self) -> bool {
        self.low_label.is_some() || self.high_label.is_some()
    }
}

/// Named cluster of question types sharing one anchor template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticFamily {
    Satisfaction,
    Agreement,
    Likelihood,
    Quality,
    Importance,
    Frequency,
    Trust,
    Value,
    Ease,
    Expectation,
    Recommendation,
    Sentiment,
    Interest,
    Concern,
    Familiarity,
    /// Anchors synthesized from the scale's own labels.
    Custom,
}

impl SemanticFamily {
    /// Every family backed by a template (excludes [`SemanticFamily::Custom`]).
    pub const TEMPLATED: [SemanticFamily; 15] = [
        SemanticFamily::Satisfaction,
        SemanticFamily::Agreement,
        SemanticFamily::Likelihood,
        SemanticFamily::Quality,
        SemanticFamily::Importance,
        SemanticFamily::Frequency,
        SemanticFamily::Trust,
        SemanticFamily::Value,
        SemanticFamily::Ease,
        SemanticFamily::Expectation,
        SemanticFamily::Recommendation,
        SemanticFamily::Sentiment,
        SemanticFamily::Interest,
        SemanticFamily::Concern,
        SemanticFamily::Familiarity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticFamily::Satisfaction => "satisfaction",
            SemanticFamily::Agreement => "agreement",
            SemanticFamily::Likelihood => "likelihood",
            SemanticFamily::Quality => "quality",
            SemanticFamily::Importance => "importance",
            SemanticFamily::Frequency => "frequency",
            SemanticFamily::Trust => "trust",
            SemanticFamily::Value => "value",
            SemanticFamily::Ease => "ease",
            SemanticFamily::Expectation => "expectation",
            SemanticFamily::Recommendation => "recommendation",
            SemanticFamily::Sentiment => "sentiment",
            SemanticFamily::Interest => "interest",
            SemanticFamily::Concern => "concern",
            SemanticFamily::Familiarity => "familiarity",
            SemanticFamily::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SemanticFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolution tier produced an [`AnchorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionTier {
    /// Recommendation kind → dedicated 11-point template.
    FixedScale,
    /// Pole labels matched a known family.
    LabelMatch,
    /// Question text matched a family keyword.
    TextInference,
    /// Anchors interpolated from unmatched pole labels.
    CustomInterpolation,
    /// Nothing matched; agreement family used.
    Default,
    /// A caller-registered tier.
    Extension,
}

impl ResolutionTier {
    /// Returns `true` for the degraded tiers (custom interpolation and default).
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ResolutionTier::CustomInterpolation | ResolutionTier::Default
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::FixedScale => "fixed-scale",
            ResolutionTier::LabelMatch => "label-match",
            ResolutionTier::TextInference => "text-inference",
            ResolutionTier::CustomInterpolation => "custom-interpolation",
            ResolutionTier::Default => "default",
            ResolutionTier::Extension => "extension",
        }
    }
}

impl std::fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered anchor statements resolved for one scale.
///
/// Index 0 expresses the pole associated with `min`; the last index the pole
/// associated with `max`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorSet {
    pub family: SemanticFamily,
    pub anchors: Vec<String>,
    pub min: i32,
    pub max: i32,
}

impl AnchorSet {
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Scale value for anchor `index`.
    pub fn value_at(&self, index: usize) -> i32 {
        self.min + index as i32
    }

    /// Cache key for this set's embeddings.
    ///
    /// Template families are keyed by family and length; custom sets also carry
    /// a BLAKE3 fingerprint of their statements so equal-length custom scales
    /// never share vectors.
    pub fn key(&self) -> AnchorKey {
        let fingerprint = match self.family {
            SemanticFamily::Custom => Some(fingerprint(&self.anchors)),
            _ => None,
        };
        AnchorKey {
            family: self.family,
            len: self.anchors.len(),
            fingerprint,
        }
    }
}

/// Key under which an anchor set's embeddings are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorKey {
    pub family: SemanticFamily,
    pub len: usize,
    pub fingerprint: Option<[u8; 32]>,
}

fn fingerprint(anchors: &[String]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for anchor in anchors {
        hasher.update(anchor.as_bytes());
        hasher.update(b"\x1f");
    }
    *hasher.finalize().as_bytes()
}

/// An anchor set plus the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub anchors: AnchorSet,
    pub tier: ResolutionTier,
}
