use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lru::LruCache;
use tracing::debug;

use super::traits::{Embedder, EmbeddingError};

/// LRU cache mapping text hash to embedding vector.
pub struct EmbeddingCache {
    cache: LruCache<u64, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            hits: 0,
            misses: 0,
        }
    }

    fn hash_text(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up a cached embedding by text.
    pub fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        let key = Self::hash_text(text);
        if let Some(vec) = self.cache.get(&key) {
            self.hits += 1;
            Some(vec.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    /// Store an embedding for a text.
    pub fn put(&mut self, text: &str, embedding: Vec<f32>) {
        let key = Self::hash_text(text);
        self.cache.put(key, embedding);
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Number of cached embeddings.
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }
}

/// Embedder decorator that answers repeated texts from an [`EmbeddingCache`]
/// and forwards only the distinct misses of each batch to the inner provider.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Mutex<EmbeddingCache>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(EmbeddingCache::new(capacity)),
        }
    }

    /// `(hits, misses)` observed so far.
    pub fn stats(&self) -> (u64, u64) {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        (cache.hits(), cache.misses())
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        // Distinct missing texts, in first-seen order.
        let mut missing: Vec<&str> = Vec::new();
        let mut missing_slot: HashMap<&str, usize> = HashMap::new();
        {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            for &text in texts {
                let cached = if missing_slot.contains_key(text) {
                    None
                } else {
                    cache.get(text)
                };
                if cached.is_none() && !missing_slot.contains_key(text) {
                    missing_slot.insert(text, missing.len());
                    missing.push(text);
                }
                out.push(cached);
            }
        }

        if !missing.is_empty() {
            let fresh = self.inner.embed_batch(&missing).await?;
            if fresh.len() != missing.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: missing.len(),
                    actual: fresh.len(),
                });
            }
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            for (text, embedding) in missing.iter().zip(&fresh) {
                cache.put(text, embedding.clone());
            }
            debug!(
                requested = texts.len(),
                forwarded = missing.len(),
                entries = cache.len(),
                hit_rate = cache.hit_rate(),
                "embedding cache miss"
            );
            for (slot, &text) in out.iter_mut().zip(texts) {
                if slot.is_none() {
                    *slot = Some(fresh[missing_slot[text]].clone());
                }
            }
        }

        Ok(out.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
