//! Synthetic datasets and embedding setups.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ssr::anchors::{AnchorResolver, ScaleDefinition};
use ssr::calibration::LabeledCase;
use ssr::embedding::MockEmbeddingProvider;

/// Rated 5 at temperature 0.1 and 4 at 0.5 (min-max, expected value).
pub const RISING: [f64; 5] = [0.60, 0.65, 0.70, 0.75, 0.90];
/// Rated 1 at temperature 0.1 and 2 at 0.5.
pub const FALLING: [f64; 5] = [0.90, 0.75, 0.70, 0.65, 0.60];

pub fn one_hot(dim: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[i] = 1.0;
    v
}

/// Two domains: `sharp` is scored perfectly at 0.1, `soft` at 0.5.
pub fn two_domain_cases(per_domain: usize) -> Vec<LabeledCase> {
    let mut cases = Vec::with_capacity(per_domain * 2);
    for i in 0..per_domain {
        let (sharp_gold, soft_gold, sims) = if i % 2 == 0 {
            (5, 4, RISING)
        } else {
            (1, 2, FALLING)
        };
        cases.push(LabeledCase::new(
            format!("sharp-{i}"),
            "sharp",
            sharp_gold,
            sims.to_vec(),
        ));
        cases.push(LabeledCase::new(
            format!("soft-{i}"),
            "soft",
            soft_gold,
            sims.to_vec(),
        ));
    }
    cases
}

/// Writes `{ "cases": [...] }` to `dir/name`.
pub fn write_dataset(dir: &Path, name: &str, cases: &[LabeledCase]) -> PathBuf {
    let path = dir.join(name);
    let body = serde_json::json!({ "cases": cases });
    std::fs::write(&path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
    path
}

/// Mock provider whose anchors for `scale` embed to orthogonal unit vectors
/// of dimension `scale.points()`.
pub fn orthogonal_provider(scale: &ScaleDefinition) -> Arc<MockEmbeddingProvider> {
    let dim = scale.points();
    let provider = Arc::new(MockEmbeddingProvider::new(dim));
    let set = AnchorResolver::new().resolve(scale);
    for (i, text) in set.anchors.iter().enumerate() {
        provider.insert(text.clone(), one_hot(dim, i));
    }
    provider
}
