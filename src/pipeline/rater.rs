use std::sync::Arc;

use tracing::{debug, instrument};

use super::error::PipelineResult;
use super::types::RatedResponse;
use crate::anchors::{
    AnchorEmbeddingCache, AnchorResolver, AnchorVectors, Resolution, ScaleDefinition,
};
use crate::config::Config;
use crate::embedding::{EmbedMode, EmbeddingProvider, embed_checked};
use crate::scoring::{ScoringResult, SimilarityScorer, similarity_vector};

/// Resolve → embed anchors (cached) → embed response → score.
pub struct RatingPipeline<P: EmbeddingProvider> {
    resolver: AnchorResolver,
    cache: AnchorEmbeddingCache,
    provider: Arc<P>,
    scorer: SimilarityScorer,
}

impl<P: EmbeddingProvider> std::fmt::Debug for RatingPipeline<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingPipeline")
            .field("resolver", &self.resolver)
            .field("cache", &self.cache)
            .field("scorer", &self.scorer)
            .finish()
    }
}

impl<P: EmbeddingProvider> RatingPipeline<P> {
    pub fn new(provider: Arc<P>, scorer: SimilarityScorer) -> Self {
        Self {
            resolver: AnchorResolver::new(),
            cache: AnchorEmbeddingCache::new(),
            provider,
            scorer,
        }
    }

    /// Pipeline using the configured temperature, normalization, policy and
    /// cache capacity.
    pub fn from_config(config: &Config, provider: Arc<P>) -> ScoringResult<Self> {
        let scorer = SimilarityScorer::new(config.temperature)?
            .with_normalization(config.normalization)
            .with_policy(config.rating_policy);
        Ok(Self::new(provider, scorer)
            .with_cache(AnchorEmbeddingCache::with_capacity(config.anchor_cache_capacity)))
    }

    pub fn with_resolver(mut self, resolver: AnchorResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_cache(mut self, cache: AnchorEmbeddingCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn resolver(&self) -> &AnchorResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &AnchorEmbeddingCache {
        &self.cache
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Resolves `scale` and returns its anchor vectors, embedding on a cache miss.
    pub async fn anchors(
        &self,
        scale: &ScaleDefinition,
    ) -> PipelineResult<(Resolution, AnchorVectors)> {
        let resolution = self.resolver.resolve_with_tier(scale);
        let vectors = self
            .cache
            .get_or_embed(&resolution.anchors, self.provider.as_ref())
            .await?;
        Ok((resolution, vectors))
    }

    /// Rates free text on `scale`.
    #[instrument(
        skip(self, scale, response),
        fields(points = scale.points(), response_len = response.len())
    )]
    pub async fn rate(
        &self,
        scale: &ScaleDefinition,
        response: &str,
    ) -> PipelineResult<RatedResponse> {
        let (resolution, anchors) = self.anchors(scale).await?;
        let embedded = embed_checked(
            self.provider.as_ref(),
            &[response.to_string()],
            EmbedMode::Query,
        )
        .await?;
        // embed_checked guarantees one vector per input text
        let vector = embedded.into_iter().next().unwrap_or_default();
        self.score(resolution, &anchors, &vector)
    }

    /// Rates an already-embedded response on `scale`.
    pub async fn rate_vector(
        &self,
        scale: &ScaleDefinition,
        response: &[f32],
    ) -> PipelineResult<RatedResponse> {
        let (resolution, anchors) = self.anchors(scale).await?;
        self.score(resolution, &anchors, response)
    }

    /// Rates several responses on one scale with a single query-mode embed call.
    #[instrument(
        skip(self, scale, responses),
        fields(points = scale.points(), batch = responses.len())
    )]
    pub async fn rate_batch(
        &self,
        scale: &ScaleDefinition,
        responses: &[String],
    ) -> PipelineResult<Vec<RatedResponse>> {
        if responses.is_empty() {
            return Ok(Vec::new());
        }
        let (resolution, anchors) = self.anchors(scale).await?;
        let vectors = embed_checked(self.provider.as_ref(), responses, EmbedMode::Query).await?;
        vectors
            .iter()
            .map(|vector| self.score(resolution.clone(), &anchors, vector))
            .collect()
    }

    fn score(
        &self,
        resolution: Resolution,
        anchors: &[Vec<f32>],
        response: &[f32],
    ) -> PipelineResult<RatedResponse> {
        let similarities = similarity_vector(response, anchors)?;
        let score = self
            .scorer
            .score_similarities(&similarities, resolution.anchors.min)?;
        debug!(
            tier = %resolution.tier,
            family = %resolution.anchors.family,
            rating = score.rating,
            confidence = score.confidence,
            "Response rated"
        );
        Ok(RatedResponse {
            score,
            anchors: resolution.anchors,
            tier: resolution.tier,
            similarities,
        })
    }
}
