use tracing::debug;

use super::templates::{TemplateStore, project_index};
use super::types::{AnchorSet, Resolution, ResolutionTier, ScaleDefinition, ScaleKind, SemanticFamily};

/// One step of the resolution fallthrough.
///
/// Tiers are evaluated in order; the first to return `Some` wins.
pub trait TierStrategy: Send + Sync {
    /// Category reported for sets this tier produces.
    fn tier(&self) -> ResolutionTier;

    /// Attempts to resolve `scale`.
    fn resolve(&self, scale: &ScaleDefinition, store: &TemplateStore) -> Option<AnchorSet>;
}

fn from_template(
    store: &TemplateStore,
    family: SemanticFamily,
    scale: &ScaleDefinition,
) -> Option<AnchorSet> {
    store.anchors(family, scale.points()).map(|anchors| AnchorSet {
        family,
        anchors,
        min: scale.min(),
        max: scale.max(),
    })
}

/// Recommendation scales always use the dedicated 11-point ladder.
#[derive(Debug, Default)]
pub struct FixedScaleTier;

impl TierStrategy for FixedScaleTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::FixedScale
    }

    fn resolve(&self, scale: &ScaleDefinition, store: &TemplateStore) -> Option<AnchorSet> {
        if scale.kind() != ScaleKind::Recommendation {
            return None;
        }
        from_template(store, SemanticFamily::Recommendation, scale)
    }
}

/// Looks the pole labels up in the label table (high label first).
#[derive(Debug, Default)]
pub struct LabelMatchTier;

impl TierStrategy for LabelMatchTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::LabelMatch
    }

    fn resolve(&self, scale: &ScaleDefinition, store: &TemplateStore) -> Option<AnchorSet> {
        let family = [scale.high_label(), scale.low_label()]
            .into_iter()
            .flatten()
            .find_map(|label| store.family_for_label(label))?;
        from_template(store, family, scale)
    }
}

/// Infers the family from question-text keywords when no label pair is given.
#[derive(Debug, Default)]
pub struct TextInferenceTier;

impl TierStrategy for TextInferenceTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::TextInference
    }

    fn resolve(&self, scale: &ScaleDefinition, store: &TemplateStore) -> Option<AnchorSet> {
        if scale.has_label_pair() {
            return None;
        }
        let family = store.family_for_text(scale.question_text()?)?;
        from_template(store, family, scale)
    }
}

/// Intensity bucket a scale position falls into for custom interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBucket {
    VeryLow,
    Low,
    Neutral,
    High,
    VeryHigh,
}

impl IntensityBucket {
    const ORDER: [IntensityBucket; 5] = [
        IntensityBucket::VeryLow,
        IntensityBucket::Low,
        IntensityBucket::Neutral,
        IntensityBucket::High,
        IntensityBucket::VeryHigh,
    ];

    /// Bucket for point `index` of a `points`-point scale.
    pub fn for_position(index: usize, points: usize) -> Self {
        Self::ORDER[project_index(index, points, Self::ORDER.len())]
    }

    fn statement(&self, low: &str, high: &str) -> String {
        match self {
            IntensityBucket::VeryLow => format!("My answer is firmly \"{}\".", low),
            IntensityBucket::Low => format!("My answer leans toward \"{}\".", low),
            IntensityBucket::Neutral => {
                format!("My answer is halfway between \"{}\" and \"{}\".", low, high)
            }
            IntensityBucket::High => format!("My answer leans toward \"{}\".", high),
            IntensityBucket::VeryHigh => format!("My answer is firmly \"{}\".", high),
        }
    }
}

/// Synthesizes anchors from an unmatched label pair.
#[derive(Debug, Default)]
pub struct CustomInterpolationTier;

impl TierStrategy for CustomInterpolationTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::CustomInterpolation
    }

    fn resolve(&self, scale: &ScaleDefinition, _store: &TemplateStore) -> Option<AnchorSet> {
        let (low, high) = (scale.low_label()?, scale.high_label()?);
        let points = scale.points();
        let anchors = (0..points)
            .map(|i| IntensityBucket::for_position(i, points).statement(low, high))
            .collect();
        Some(AnchorSet {
            family: SemanticFamily::Custom,
            anchors,
            min: scale.min(),
            max: scale.max(),
        })
    }
}

/// Agreement family at the requested size.
#[derive(Debug, Default)]
pub struct DefaultTier;

impl TierStrategy for DefaultTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Default
    }

    fn resolve(&self, scale: &ScaleDefinition, store: &TemplateStore) -> Option<AnchorSet> {
        from_template(store, SemanticFamily::Agreement, scale)
    }
}

/// Resolves a [`ScaleDefinition`] into an [`AnchorSet`] through an ordered tier list.
///
/// Resolution is total: if every tier declines, the agreement family is used.
pub struct AnchorResolver {
    store: TemplateStore,
    tiers: Vec<Box<dyn TierStrategy>>,
}

impl std::fmt::Debug for AnchorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorResolver")
            .field(
                "tiers",
                &self.tiers.iter().map(|t| t.tier()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for AnchorResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorResolver {
    /// Resolver with the five standard tiers.
    pub fn new() -> Self {
        Self::with_store(TemplateStore::new())
    }

    pub fn with_store(store: TemplateStore) -> Self {
        Self {
            store,
            tiers: vec![
                Box::new(FixedScaleTier),
                Box::new(LabelMatchTier),
                Box::new(TextInferenceTier),
                Box::new(CustomInterpolationTier),
                Box::new(DefaultTier),
            ],
        }
    }

    /// Inserts a tier at `position` (clamped to the list length).
    pub fn insert_tier(mut self, position: usize, tier: Box<dyn TierStrategy>) -> Self {
        let position = position.min(self.tiers.len());
        self.tiers.insert(position, tier);
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Tier categories in evaluation order.
    pub fn tiers(&self) -> Vec<ResolutionTier> {
        self.tiers.iter().map(|t| t.tier()).collect()
    }

    /// Resolves a scale to its anchor set.
    pub fn resolve(&self, scale: &ScaleDefinition) -> AnchorSet {
        self.resolve_with_tier(scale).anchors
    }

    /// Resolves a scale and reports which tier produced the result.
    pub fn resolve_with_tier(&self, scale: &ScaleDefinition) -> Resolution {
        let points = scale.points();

        for strategy in &self.tiers {
            let Some(anchors) = strategy.resolve(scale, &self.store) else {
                continue;
            };
            if anchors.len() != points {
                debug!(
                    tier = %strategy.tier(),
                    expected = points,
                    actual = anchors.len(),
                    "Tier returned wrong anchor count, skipping"
                );
                continue;
            }

            let tier = strategy.tier();
            if tier.is_fallback() {
                debug!(
                    tier = %tier,
                    family = %anchors.family,
                    points,
                    "Scale resolved through fallback tier"
                );
            } else {
                debug!(tier = %tier, family = %anchors.family, points, "Scale resolved");
            }
            return Resolution { anchors, tier };
        }

        debug!(points, "No tier resolved scale, using agreement family");
        Resolution {
            anchors: AnchorSet {
                family: SemanticFamily::Agreement,
                anchors: self
                    .store
                    .anchors(SemanticFamily::Agreement, points)
                    .unwrap_or_default(),
                min: scale.min(),
                max: scale.max(),
            },
            tier: ResolutionTier::Default,
        }
    }
}
