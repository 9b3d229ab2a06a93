//! Static catalog of hand-authored anchor statements.
//!
//! Each family stores one or more canonical ladders (5, 7 or 11 points), ordered
//! from the low pole to the high pole. Requests for other sizes are served by
//! nearest-index resampling of the family's canonical ladder.

use super::types::SemanticFamily;

/// Anchor ladders for one semantic family.
#[derive(Debug, Clone, Copy)]
pub struct AnchorTemplate {
    pub family: SemanticFamily,
    /// Ladders keyed by their point count; the first entry is canonical.
    pub ladders: &'static [&'static [&'static str]],
}

impl AnchorTemplate {
    /// The ladder resampling starts from.
    pub fn canonical(&self) -> &'static [&'static str] {
        self.ladders[0]
    }

    /// Point counts authored directly for this family.
    pub fn authored_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.ladders.iter().map(|l| l.len())
    }

    /// Returns `true` if a ladder of exactly `points` statements exists.
    pub fn has_exact(&self, points: usize) -> bool {
        self.ladders.iter().any(|l| l.len() == points)
    }

    /// Anchors for a scale of `points` points.
    pub fn anchors_for(&self, points: usize) -> Vec<String> {
        if let Some(exact) = self.ladders.iter().find(|l| l.len() == points) {
            return exact.iter().map(|s| s.to_string()).collect();
        }
        resample(self.canonical(), points)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Canonical index that target point `index` of a `points`-point scale maps to.
///
/// `round(index / (points - 1) * (source_len - 1))`; a single-point target maps
/// to the middle of the source.
pub fn project_index(index: usize, points: usize, source_len: usize) -> usize {
    if source_len <= 1 {
        return 0;
    }
    if points <= 1 {
        return (source_len - 1) / 2;
    }
    let position = index as f64 / (points - 1) as f64;
    let projected = (position * (source_len - 1) as f64).round() as usize;
    projected.min(source_len - 1)
}

/// Nearest-index resampling of `source` to `points` entries.
pub fn resample<T: Copy>(source: &[T], points: usize) -> Vec<T> {
    if source.is_empty() {
        return Vec::new();
    }
    (0..points)
        .map(|i| source[project_index(i, points, source.len())])
        .collect()
}

/// Lookup table over the static catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateStore;

impl TemplateStore {
    pub fn new() -> Self {
        Self
    }

    /// Template for a family; `None` for [`SemanticFamily::Custom`].
    pub fn template(&self, family: SemanticFamily) -> Option<&'static AnchorTemplate> {
        TEMPLATES.iter().find(|t| t.family == family)
    }

    /// Anchors for a family at `points` points.
    pub fn anchors(&self, family: SemanticFamily, points: usize) -> Option<Vec<String>> {
        self.template(family).map(|t| t.anchors_for(points))
    }

    /// Family whose pole label matches `label` (lowercased, trimmed, whitespace collapsed).
    pub fn family_for_label(&self, label: &str) -> Option<SemanticFamily> {
        let normalized = normalize_label(label);
        LABEL_FAMILIES
            .iter()
            .find(|(l, _)| *l == normalized)
            .map(|(_, family)| *family)
    }

    /// First keyword rule matching the question text.
    pub fn family_for_text(&self, text: &str) -> Option<SemanticFamily> {
        let lowered = text.to_lowercase();
        KEYWORD_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(_, family)| *family)
    }

    pub fn templates(&self) -> &'static [AnchorTemplate] {
        TEMPLATES
    }
}

pub(crate) fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

const SATISFACTION_5: &[&str] = &[
    "I am very dissatisfied with this; it has been a really disappointing experience.",
    "I am somewhat dissatisfied; it fell short in several ways.",
    "I am neither satisfied nor dissatisfied; it was just okay.",
    "I am satisfied with this; it mostly met my needs.",
    "I am extremely satisfied; it has been an excellent experience in every way.",
];

const AGREEMENT_5: &[&str] = &[
    "I strongly disagree with this statement; it does not reflect my view at all.",
    "I disagree with this statement for the most part.",
    "I neither agree nor disagree; I don't have a strong opinion either way.",
    "I agree with this statement for the most part.",
    "I strongly agree with this statement; it describes my view exactly.",
];

const AGREEMENT_7: &[&str] = &[
    "I strongly disagree with this statement; it does not reflect my view at all.",
    "I disagree with this statement.",
    "I somewhat disagree with this statement.",
    "I neither agree nor disagree; I don't have a strong opinion either way.",
    "I somewhat agree with this statement.",
    "I agree with this statement.",
    "I strongly agree with this statement; it describes my view exactly.",
];

const LIKELIHOOD_5: &[&str] = &[
    "I am very unlikely to do this; I can't see it happening.",
    "I am somewhat unlikely to do this.",
    "I might or might not do this; it could go either way.",
    "I am fairly likely to do this.",
    "I am extremely likely to do this; I am almost certain I will.",
];

const QUALITY_5: &[&str] = &[
    "The quality is very poor; it is badly made and unreliable.",
    "The quality is below average; there are noticeable problems.",
    "The quality is average; nothing stands out good or bad.",
    "The quality is good; it is well made overall.",
    "The quality is excellent; it is outstanding in every respect.",
];

const IMPORTANCE_5: &[&str] = &[
    "This is not at all important to me.",
    "This is only slightly important to me.",
    "This is moderately important to me.",
    "This is very important to me.",
    "This is extremely important to me; it is essential.",
];

const FREQUENCY_5: &[&str] = &[
    "I never do this.",
    "I rarely do this, only once in a while.",
    "I sometimes do this.",
    "I often do this.",
    "I always do this; it is a constant part of my routine.",
];

const TRUST_5: &[&str] = &[
    "I do not trust this at all; I am deeply skeptical of it.",
    "I have little trust in this and remain wary.",
    "I am unsure whether I trust this; I have mixed feelings.",
    "I mostly trust this and find it reliable.",
    "I completely trust this; it has never let me down.",
];

const VALUE_5: &[&str] = &[
    "This is very poor value for money; it is not worth the price at all.",
    "This is somewhat poor value; it costs more than it is worth.",
    "This is fair value; the price is about right for what you get.",
    "This is good value for money.",
    "This is excellent value; it is worth far more than it costs.",
];

const EASE_5: &[&str] = &[
    "This was very difficult; I struggled throughout.",
    "This was somewhat difficult and took real effort.",
    "This was neither easy nor difficult.",
    "This was fairly easy to do.",
    "This was very easy; it was effortless.",
];

const EXPECTATION_5: &[&str] = &[
    "It was much worse than I expected; a real letdown.",
    "It was somewhat worse than I expected.",
    "It was about what I expected, no better and no worse.",
    "It was somewhat better than I expected.",
    "It was much better than I expected; it exceeded my expectations.",
];

const RECOMMENDATION_11: &[&str] = &[
    "I would never recommend this to anyone; I would actively warn people away from it.",
    "I would almost certainly not recommend this to anyone.",
    "I would be very unlikely to recommend this.",
    "I would probably not recommend this.",
    "I would be somewhat hesitant to recommend this.",
    "I might or might not recommend this; I am on the fence.",
    "I might recommend this to someone in the right situation.",
    "I would probably recommend this to others.",
    "I would be likely to recommend this to friends and colleagues.",
    "I would be very likely to recommend this; I speak well of it.",
    "I would definitely recommend this to everyone I know; I am a real fan.",
];

const SENTIMENT_7: &[&str] = &[
    "I feel extremely negative about this; it really upsets me.",
    "I feel quite negative about this.",
    "I feel somewhat negative about this.",
    "I feel neutral about this; I have no particular feelings either way.",
    "I feel somewhat positive about this.",
    "I feel quite positive about this.",
    "I feel extremely positive about this; it makes me genuinely happy.",
];

const INTEREST_5: &[&str] = &[
    "I am not at all interested in this.",
    "I am only slightly interested in this.",
    "I am moderately interested in this.",
    "I am very interested in this.",
    "I am extremely interested in this; I want to learn everything about it.",
];

const CONCERN_5: &[&str] = &[
    "I am not at all concerned about this.",
    "I am slightly concerned about this.",
    "I am moderately concerned about this.",
    "I am very concerned about this.",
    "I am extremely concerned about this; it worries me a great deal.",
];

const FAMILIARITY_5: &[&str] = &[
    "I am not at all familiar with this; I have never heard of it.",
    "I am slightly familiar with this; I have heard the name.",
    "I am somewhat familiar with this.",
    "I am very familiar with this.",
    "I am extremely familiar with this; I know it inside and out.",
];

static TEMPLATES: &[AnchorTemplate] = &[
    AnchorTemplate {
        family: SemanticFamily::Satisfaction,
        ladders: &[SATISFACTION_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Agreement,
        ladders: &[AGREEMENT_5, AGREEMENT_7],
    },
    AnchorTemplate {
        family: SemanticFamily::Likelihood,
        ladders: &[LIKELIHOOD_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Quality,
        ladders: &[QUALITY_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Importance,
        ladders: &[IMPORTANCE_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Frequency,
        ladders: &[FREQUENCY_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Trust,
        ladders: &[TRUST_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Value,
        ladders: &[VALUE_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Ease,
        ladders: &[EASE_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Expectation,
        ladders: &[EXPECTATION_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Recommendation,
        ladders: &[RECOMMENDATION_11],
    },
    AnchorTemplate {
        family: SemanticFamily::Sentiment,
        ladders: &[SENTIMENT_7],
    },
    AnchorTemplate {
        family: SemanticFamily::Interest,
        ladders: &[INTEREST_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Concern,
        ladders: &[CONCERN_5],
    },
    AnchorTemplate {
        family: SemanticFamily::Familiarity,
        ladders: &[FAMILIARITY_5],
    },
];

static LABEL_FAMILIES: &[(&str, SemanticFamily)] = &[
    ("very dissatisfied", SemanticFamily::Satisfaction),
    ("very satisfied", SemanticFamily::Satisfaction),
    ("extremely dissatisfied", SemanticFamily::Satisfaction),
    ("extremely satisfied", SemanticFamily::Satisfaction),
    ("dissatisfied", SemanticFamily::Satisfaction),
    ("satisfied", SemanticFamily::Satisfaction),
    ("strongly disagree", SemanticFamily::Agreement),
    ("strongly agree", SemanticFamily::Agreement),
    ("disagree", SemanticFamily::Agreement),
    ("agree", SemanticFamily::Agreement),
    ("very unlikely", SemanticFamily::Likelihood),
    ("very likely", SemanticFamily::Likelihood),
    ("not at all likely", SemanticFamily::Likelihood),
    ("extremely likely", SemanticFamily::Likelihood),
    ("very poor", SemanticFamily::Quality),
    ("poor", SemanticFamily::Quality),
    ("excellent", SemanticFamily::Quality),
    ("very poor quality", SemanticFamily::Quality),
    ("excellent quality", SemanticFamily::Quality),
    ("not at all important", SemanticFamily::Importance),
    ("not important", SemanticFamily::Importance),
    ("extremely important", SemanticFamily::Importance),
    ("very important", SemanticFamily::Importance),
    ("never", SemanticFamily::Frequency),
    ("always", SemanticFamily::Frequency),
    ("rarely", SemanticFamily::Frequency),
    ("very often", SemanticFamily::Frequency),
    ("do not trust at all", SemanticFamily::Trust),
    ("no trust at all", SemanticFamily::Trust),
    ("completely distrust", SemanticFamily::Trust),
    ("completely trust", SemanticFamily::Trust),
    ("very poor value", SemanticFamily::Value),
    ("excellent value", SemanticFamily::Value),
    ("not worth it", SemanticFamily::Value),
    ("very difficult", SemanticFamily::Ease),
    ("very easy", SemanticFamily::Ease),
    ("much worse than expected", SemanticFamily::Expectation),
    ("much better than expected", SemanticFamily::Expectation),
    ("very negative", SemanticFamily::Sentiment),
    ("very positive", SemanticFamily::Sentiment),
    ("extremely negative", SemanticFamily::Sentiment),
    ("extremely positive", SemanticFamily::Sentiment),
    ("not at all interested", SemanticFamily::Interest),
    ("extremely interested", SemanticFamily::Interest),
    ("very interested", SemanticFamily::Interest),
    ("not at all concerned", SemanticFamily::Concern),
    ("extremely concerned", SemanticFamily::Concern),
    ("very concerned", SemanticFamily::Concern),
    ("not at all familiar", SemanticFamily::Familiarity),
    ("extremely familiar", SemanticFamily::Familiarity),
    ("very familiar", SemanticFamily::Familiarity),
];

// Order matters: the first rule with a matching keyword wins.
static KEYWORD_RULES: &[(&[&str], SemanticFamily)] = &[
    (&["satisf"], SemanticFamily::Satisfaction),
    (&["recommend"], SemanticFamily::Recommendation),
    (&["trust", "reliab"], SemanticFamily::Trust),
    (&["value for money", "worth", "price", "afford"], SemanticFamily::Value),
    (&["easy", "ease of", "difficult"], SemanticFamily::Ease),
    (&["expect"], SemanticFamily::Expectation),
    (&["important", "importance"], SemanticFamily::Importance),
    (&["how often", "frequen"], SemanticFamily::Frequency),
    (&["quality"], SemanticFamily::Quality),
    (&["likely", "likelihood", "intend to", "plan to"], SemanticFamily::Likelihood),
    (&["interest"], SemanticFamily::Interest),
    (&["concern", "worried", "worry"], SemanticFamily::Concern),
    (&["familiar", "aware of"], SemanticFamily::Familiarity),
    (&["how do you feel", "feel about", "emotion"], SemanticFamily::Sentiment),
    (&["agree", "statement"], SemanticFamily::Agreement),
];
