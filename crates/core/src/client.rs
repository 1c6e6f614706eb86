use crate::cache::MemoryCache;
use crate::traits::{CorpusCache, CorpusSource};
use crate::{Corpus, CorpusError, CorpusKey, CorpusState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
enum Phase {
    Loading,
    Failed(String),
}

/// Loads corpora through a [`CorpusSource`] and memoizes them in a [`CorpusCache`].
///
/// Concurrent loads of the same key share a single fetch. A failed fetch leaves
/// the cache untouched so the next `load` retries.
pub struct CorpusClient<S, C = MemoryCache> {
    source: S,
    cache: C,
    gates: tokio::sync::Mutex<HashMap<CorpusKey, Arc<tokio::sync::Mutex<()>>>>,
    phases: Mutex<HashMap<CorpusKey, Phase>>,
}

impl<S> CorpusClient<S, MemoryCache>
where
    S: CorpusSource + Send + Sync,
{
    pub fn with_memory_cache(source: S) -> Self {
        Self::new(source, MemoryCache::new())
    }
}

impl<S, C> CorpusClient<S, C>
where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
{
    pub fn new(source: S, cache: C) -> Self {
        Self {
            source,
            cache,
            gates: tokio::sync::Mutex::new(HashMap::new()),
            phases: Mutex::new(HashMap::new()),
        }
    }

    pub async fn load(&self, key: &CorpusKey) -> Result<Arc<Corpus>, CorpusError> {
        if let Some(corpus) = self.cache.get(key) {
            debug!(corpus = %key, "corpus cache hit");
            return Ok(corpus);
        }

        let gate = {
            let mut gates = self.gates.lock().await;
            gates.entry(key.clone()).or_default().clone()
        };
        let _guard = gate.lock().await;

        // Another caller may have finished the fetch while we waited.
        if let Some(corpus) = self.cache.get(key) {
            return Ok(corpus);
        }

        self.set_phase(key, Some(Phase::Loading));
        match self.source.fetch(key).await {
            Ok(corpus) => {
                let corpus = Arc::new(corpus);
                info!(
                    corpus = %key,
                    entries = corpus.len(),
                    unaligned = corpus.unaligned,
                    "corpus loaded"
                );
                self.cache.set(key.clone(), corpus.clone());
                self.set_phase(key, None);
                Ok(corpus)
            }
            Err(error) => {
                warn!(corpus = %key, error = %error, "error fetching corpus");
                self.set_phase(key, Some(Phase::Failed(error.to_string())));
                Err(error)
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cached(&self, key: &CorpusKey) -> Option<Arc<Corpus>> {
        self.cache.get(key)
    }

    pub fn state(&self, key: &CorpusKey) -> CorpusState {
        if let Some(corpus) = self.cache.get(key) {
            return CorpusState::Loaded(corpus);
        }

        let phase = self
            .phases
            .lock()
            .ok()
            .and_then(|phases| phases.get(key).cloned());

        match phase {
            Some(Phase::Loading) => CorpusState::Loading,
            Some(Phase::Failed(reason)) => CorpusState::Failed(reason),
            None => CorpusState::NotLoaded,
        }
    }

    fn set_phase(&self, key: &CorpusKey, phase: Option<Phase>) {
        if let Ok(mut phases) = self.phases.lock() {
            match phase {
                Some(phase) => {
                    phases.insert(key.clone(), phase);
                }
                None => {
                    phases.remove(key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CorpusEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail_next: AtomicBool,
    }

    #[async_trait]
    impl CorpusSource for CountingSource {
        async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(CorpusError::Status {
                    key: key.to_string(),
                    status: 503,
                });
            }
            Ok(Corpus::new(
                key.clone(),
                vec![CorpusEntry::new("1", "In the name of Allah")],
            ))
        }
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let client = CorpusClient::with_memory_cache(CountingSource::default());
        let key = CorpusKey::new("eng-bukhari");

        let first = client.load(&key).await.expect("first load");
        let second = client.load(&key).await.expect("second load");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(client.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_fetch() {
        let client = Arc::new(CorpusClient::with_memory_cache(CountingSource::default()));
        let key = CorpusKey::new("eng-muslim");

        let (left, right) = tokio::join!(client.load(&key), client.load(&key));
        assert!(left.is_ok() && right.is_ok());
        assert_eq!(client.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached_and_retries() {
        let source = CountingSource::default();
        source.fail_next.store(true, Ordering::SeqCst);
        let client = CorpusClient::with_memory_cache(source);
        let key = CorpusKey::new("eng-nasai");

        assert!(client.load(&key).await.is_err());
        assert!(matches!(client.state(&key), CorpusState::Failed(_)));
        assert!(client.cached(&key).is_none());

        client.load(&key).await.expect("retry should succeed");
        assert!(client.state(&key).is_loaded());
        assert_eq!(client.source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_key_is_not_loaded() {
        let client = CorpusClient::with_memory_cache(CountingSource::default());
        assert!(matches!(
            client.state(&CorpusKey::new("eng-malik")),
            CorpusState::NotLoaded
        ));
    }
}
