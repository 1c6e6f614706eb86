use crate::traits::CorpusCache;
use crate::{Corpus, CorpusKey};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct MemoryCache {
    corpora: RwLock<HashMap<CorpusKey, Arc<Corpus>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.corpora.read().map(|map| map.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CorpusCache for MemoryCache {
    fn has(&self, key: &CorpusKey) -> bool {
        self.corpora
            .read()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    fn get(&self, key: &CorpusKey) -> Option<Arc<Corpus>> {
        self.corpora
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: CorpusKey, corpus: Arc<Corpus>) {
        if let Ok(mut map) = self.corpora.write() {
            map.entry(key).or_insert(corpus);
        }
    }
}
