pub mod catalog;
pub mod hadith_cdn;
pub mod local;
pub mod quran_api;

pub use catalog::BookCatalogSource;
pub use hadith_cdn::HadithCdnSource;
pub use local::{discover_corpus_files, LocalJsonSource};
pub use quran_api::QuranComSource;

use crate::CorpusError;
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub(crate) fn base_url(base: &str) -> Result<Url, CorpusError> {
    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

pub(crate) async fn get_json(client: &Client, url: Url, key: &str) -> Result<Value, CorpusError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(CorpusError::Status {
            key: key.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
