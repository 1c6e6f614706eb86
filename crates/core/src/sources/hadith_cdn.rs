use super::{base_url, get_json};
use crate::traits::CorpusSource;
use crate::{Corpus, CorpusEntry, CorpusError, CorpusKey};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;
use url::Url;

pub const DEFAULT_HADITH_CDN_URL: &str =
    "https://cdn.jsdelivr.net/gh/fawazahmed0/hadith-api@1/editions/";

pub const ARABIC_NOT_AVAILABLE: &str = "Arabic text not available";

pub struct HadithCdnSource {
    client: Client,
    base: Url,
}

impl HadithCdnSource {
    pub fn new(base: &str) -> Result<Self, CorpusError> {
        Ok(Self {
            client: Client::new(),
            base: base_url(base)?,
        })
    }

    fn edition_url(&self, edition: &str) -> Result<Url, CorpusError> {
        Ok(self.base.join(&format!("{edition}.json"))?)
    }
}

#[async_trait]
impl CorpusSource for HadithCdnSource {
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
        let (prefix, book) = key
            .as_str()
            .split_once('-')
            .filter(|(prefix, book)| !prefix.is_empty() && !book.is_empty())
            .ok_or_else(|| CorpusError::UnknownCorpus(key.to_string()))?;

        let translated_url = self.edition_url(key.as_str())?;
        if prefix == "ara" {
            let translated = get_json(&self.client, translated_url, key.as_str()).await?;
            let entries = parse_edition(key.as_str(), &translated)?
                .into_iter()
                .map(|(number, text)| hadith_entry(number, text, None))
                .collect();
            return Ok(Corpus::new(key.clone(), entries));
        }

        let arabic_edition = format!("ara-{book}");
        let arabic_url = self.edition_url(&arabic_edition)?;
        let (translated, arabic) = tokio::try_join!(
            get_json(&self.client, translated_url, key.as_str()),
            get_json(&self.client, arabic_url, &arabic_edition),
        )?;

        let translated = parse_edition(key.as_str(), &translated)?;
        let arabic = parse_edition(&arabic_edition, &arabic)?;
        Ok(pair_editions(key.clone(), translated, arabic))
    }
}

pub fn parse_edition(key: &str, body: &Value) -> Result<Vec<(String, String)>, CorpusError> {
    let hadiths = body
        .pointer("/hadiths")
        .and_then(Value::as_array)
        .ok_or_else(|| CorpusError::shape(key, "missing hadiths array"))?;

    Ok(hadiths
        .iter()
        .map(|hadith| {
            let number = match hadith.pointer("/hadithnumber") {
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::String(number)) => number.clone(),
                _ => String::new(),
            };
            let text = hadith
                .pointer("/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            (number, text)
        })
        .collect())
}

/// Joins a translated edition with its Arabic counterpart by hadith number.
///
/// Translated entries without an Arabic match keep a placeholder and are
/// counted in [`Corpus::unaligned`].
pub fn pair_editions(
    key: CorpusKey,
    translated: Vec<(String, String)>,
    arabic: Vec<(String, String)>,
) -> Corpus {
    let arabic_len = arabic.len();
    let mut arabic_by_number: HashMap<String, String> = HashMap::with_capacity(arabic_len);
    for (number, text) in arabic {
        arabic_by_number.entry(number).or_insert(text);
    }

    let translated_len = translated.len();
    let mut unaligned = 0;
    let entries = translated
        .into_iter()
        .map(|(number, text)| {
            let original = match arabic_by_number.get(&number) {
                Some(arabic) if !arabic.trim().is_empty() => arabic.clone(),
                _ => {
                    unaligned += 1;
                    ARABIC_NOT_AVAILABLE.to_string()
                }
            };
            hadith_entry(number, text, Some(original))
        })
        .collect();

    if unaligned > 0 || translated_len != arabic_len {
        warn!(
            corpus = %key,
            translated = translated_len,
            arabic = arabic_len,
            unaligned,
            "hadith editions are not aligned"
        );
    }

    let mut corpus = Corpus::new(key, entries);
    corpus.unaligned = unaligned;
    corpus
}

fn hadith_entry(number: String, text: String, original: Option<String>) -> CorpusEntry {
    CorpusEntry {
        heading: Some(format!("Hadith {number}")),
        original,
        ..CorpusEntry::new(number, text)
    }
}
