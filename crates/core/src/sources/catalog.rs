use super::{base_url, get_json};
use crate::traits::CorpusSource;
use crate::{Corpus, CorpusEntry, CorpusError, CorpusKey};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_BOOKS_URL: &str = "http://localhost:3000/";

#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<BookRecord>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRecord {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    volumes: Vec<Volume>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_number: Option<u32>,
    #[serde(default)]
    download_url: Option<String>,
}

pub struct BookCatalogSource {
    client: Client,
    base: Url,
}

impl BookCatalogSource {
    pub fn new(base: &str) -> Result<Self, CorpusError> {
        Ok(Self {
            client: Client::new(),
            base: base_url(base)?,
        })
    }

    // The route reads only `category` and answers with its first page of books.
    fn category_url(&self, category: &str) -> Result<Url, CorpusError> {
        let mut url = self.base.join("api/books")?;
        url.query_pairs_mut().append_pair("category", category);
        Ok(url)
    }
}

#[async_trait]
impl CorpusSource for BookCatalogSource {
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
        let url = self.category_url(key.as_str())?;
        let body = get_json(&self.client, url, key.as_str()).await?;
        let entries = parse_books(key.as_str(), body)?;
        Ok(Corpus::new(key.clone(), entries))
    }
}

pub fn parse_books(key: &str, body: Value) -> Result<Vec<CorpusEntry>, CorpusError> {
    let envelope: Envelope = serde_json::from_value(body)?;
    if !envelope.success {
        return Err(CorpusError::shape(
            key,
            envelope.error.unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }

    let books = envelope
        .data
        .ok_or_else(|| CorpusError::shape(key, "missing data array"))?;

    Ok(books
        .into_iter()
        .enumerate()
        .map(|(index, book)| {
            let link = book
                .volumes
                .iter()
                .min_by_key(|volume| volume.volume_number.unwrap_or(u32::MAX))
                .and_then(|volume| volume.download_url.clone());
            CorpusEntry {
                heading: book.category,
                notes: book.description,
                keywords: book.keywords,
                link,
                ..CorpusEntry::new(book.id.unwrap_or_else(|| (index + 1).to_string()), book.title)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn successful_envelope_becomes_entries() {
        let body = json!({
            "success": true,
            "data": [{
                "_id": "65f0c0ffee",
                "title": "Al-Muwatta",
                "description": "Early compilation of hadith and fiqh",
                "category": "islamic-jurisprudence",
                "imageUrl": "https://res.cloudinary.com/demo/muwatta.jpg",
                "keywords": ["malik", "fiqh"],
                "volumes": [
                    {"volumeNumber": 2, "downloadUrl": "https://example.org/v2.pdf"},
                    {"volumeNumber": 1, "downloadUrl": "https://example.org/v1.pdf"}
                ]
            }]
        });

        let entries = parse_books("islamic-jurisprudence", body).expect("valid envelope");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "65f0c0ffee");
        assert_eq!(entries[0].text, "Al-Muwatta");
        assert_eq!(entries[0].keywords, vec!["malik", "fiqh"]);
        assert_eq!(entries[0].link.as_deref(), Some("https://example.org/v1.pdf"));
    }

    #[test]
    fn failed_envelope_is_a_shape_error() {
        let body = json!({"success": false, "error": "Failed to fetch books"});
        let error = parse_books("philosophy", body).expect_err("failed envelope");
        assert!(error.to_string().contains("Failed to fetch books"));
    }

    #[test]
    fn category_url_carries_query() {
        let source = BookCatalogSource::new("http://localhost:3000").expect("valid base");
        let url = source.category_url("islamic history").expect("valid url");
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/books?category=islamic+history"
        );
    }
}
