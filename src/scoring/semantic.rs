use std::sync::Arc;

use tracing::debug;

use crate::candidate::Candidate;
use crate::embedding::{EmbeddingError, TextEmbedder, cosine_similarity};

/// Cosine similarity between a product embedding and each candidate's context.
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn TextEmbedder>,
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish()
    }
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Embeds the product description. Call once per run and reuse the vector.
    pub fn embed_product(&self, product: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embedder
            .embed(product)
            .map_err(|source| EmbeddingError::Product {
                source: Box::new(source),
            })
    }

    pub fn score(
        &self,
        product_embedding: &[f32],
        candidate: &Candidate,
    ) -> Result<f64, EmbeddingError> {
        let context = candidate.semantic_context();
        let context_embedding =
            self.embedder
                .embed(&context)
                .map_err(|source| EmbeddingError::Context {
                    candidate: candidate.name.clone(),
                    source: Box::new(source),
                })?;
        let similarity = cosine_similarity(product_embedding, &context_embedding);

        debug!(
            candidate = %candidate.name,
            context_len = context.len(),
            similarity,
            "Semantic score computed"
        );

        Ok(similarity)
    }

    pub fn embedder(&self) -> &Arc<dyn TextEmbedder> {
        &self.embedder
    }
}
