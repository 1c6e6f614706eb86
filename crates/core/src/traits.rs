use crate::{Corpus, CorpusError, CorpusKey};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CorpusSource {
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError>;
}

#[async_trait]
impl<S> CorpusSource for Arc<S>
where
    S: CorpusSource + Send + Sync + ?Sized,
{
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
        (**self).fetch(key).await
    }
}

pub trait CorpusCache {
    fn has(&self, key: &CorpusKey) -> bool;

    fn get(&self, key: &CorpusKey) -> Option<Arc<Corpus>>;

    fn set(&self, key: CorpusKey, corpus: Arc<Corpus>);
}
