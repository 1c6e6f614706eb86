use super::{base_url, get_json};
use crate::traits::CorpusSource;
use crate::{Corpus, CorpusEntry, CorpusError, CorpusKey, Language};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::warn;
use url::Url;

pub const DEFAULT_QURAN_API_URL: &str = "https://api.quran.com/api/v4/";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Bundle {
    Uthmani,
    Translated(Vec<Language>),
}

/// quran.com v4 API.
///
/// `quran` loads every configured translation, `quran-<language>` loads one,
/// and `uthmani` loads the Arabic verses alone.
pub struct QuranComSource {
    client: Client,
    base: Url,
    languages: Vec<Language>,
}

impl QuranComSource {
    pub fn new(base: &str) -> Result<Self, CorpusError> {
        Ok(Self {
            client: Client::new(),
            base: base_url(base)?,
            languages: Language::ALL.to_vec(),
        })
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    async fn fetch_verses(&self, key: &str) -> Result<Vec<(String, String)>, CorpusError> {
        let url = self.base.join("quran/verses/uthmani")?;
        let body = get_json(&self.client, url, key).await?;
        parse_verses(key, &body)
    }

    async fn fetch_chapters(&self, key: &str) -> Result<HashMap<u16, String>, CorpusError> {
        let url = self.base.join("chapters")?;
        let body = get_json(&self.client, url, key).await?;
        parse_chapter_names(key, &body)
    }

    fn bundle(&self, key: &CorpusKey) -> Result<Bundle, CorpusError> {
        match key.as_str() {
            "uthmani" => Ok(Bundle::Uthmani),
            "quran" => Ok(Bundle::Translated(self.languages.clone())),
            other => other
                .strip_prefix("quran-")
                .and_then(|language| language.parse::<Language>().ok())
                .map(|language| Bundle::Translated(vec![language]))
                .ok_or_else(|| CorpusError::UnknownCorpus(key.to_string())),
        }
    }

    async fn fetch_translations(
        &self,
        key: &str,
        languages: &[Language],
    ) -> Result<Vec<(Language, Vec<String>)>, CorpusError> {
        let mut tasks = JoinSet::new();
        for language in languages {
            let language = *language;
            let url = self
                .base
                .join(&format!("quran/translations/{}", language.quran_translation_id()))?;
            let client = self.client.clone();
            let key = format!("{key}/{language}");
            tasks.spawn(async move {
                let body = get_json(&client, url, &key).await?;
                parse_translations(&key, &body).map(|texts| (language, texts))
            });
        }

        let mut translations = Vec::with_capacity(languages.len());
        while let Some(joined) = tasks.join_next().await {
            let translation = joined
                .map_err(|error| CorpusError::shape(key, format!("translation task failed: {error}")))??;
            translations.push(translation);
        }
        translations.sort_by_key(|(language, _)| *language);
        Ok(translations)
    }
}

#[async_trait]
impl CorpusSource for QuranComSource {
    async fn fetch(&self, key: &CorpusKey) -> Result<Corpus, CorpusError> {
        match self.bundle(key)? {
            Bundle::Uthmani => {
                let verses = self.fetch_verses(key.as_str()).await?;
                Ok(build_corpus(key.clone(), verses, Vec::new(), &HashMap::new()))
            }
            Bundle::Translated(languages) => {
                let (verses, chapters, translations) = tokio::try_join!(
                    self.fetch_verses(key.as_str()),
                    self.fetch_chapters(key.as_str()),
                    self.fetch_translations(key.as_str(), &languages),
                )?;
                Ok(build_corpus(key.clone(), verses, translations, &chapters))
            }
        }
    }
}

pub fn parse_verses(key: &str, body: &Value) -> Result<Vec<(String, String)>, CorpusError> {
    let verses = body
        .pointer("/verses")
        .and_then(Value::as_array)
        .ok_or_else(|| CorpusError::shape(key, "missing verses array"))?;

    verses
        .iter()
        .map(|verse| {
            let verse_key = verse
                .pointer("/verse_key")
                .and_then(Value::as_str)
                .ok_or_else(|| CorpusError::shape(key, "verse without verse_key"))?;
            let text = verse
                .pointer("/text_uthmani")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok((verse_key.to_string(), text.to_string()))
        })
        .collect()
}

pub fn parse_translations(key: &str, body: &Value) -> Result<Vec<String>, CorpusError> {
    let translations = body
        .pointer("/translations")
        .and_then(Value::as_array)
        .ok_or_else(|| CorpusError::shape(key, "missing translations array"))?;

    Ok(translations
        .iter()
        .map(|item| {
            item.pointer("/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect())
}

pub fn parse_chapter_names(key: &str, body: &Value) -> Result<HashMap<u16, String>, CorpusError> {
    let chapters = body
        .pointer("/chapters")
        .and_then(Value::as_array)
        .ok_or_else(|| CorpusError::shape(key, "missing chapters array"))?;

    Ok(chapters
        .iter()
        .filter_map(|chapter| {
            let id = chapter.pointer("/id").and_then(Value::as_u64)?;
            let name = chapter.pointer("/name_simple").and_then(Value::as_str)?;
            Some((u16::try_from(id).ok()?, name.to_string()))
        })
        .collect())
}

pub fn build_corpus(
    key: CorpusKey,
    verses: Vec<(String, String)>,
    translations: Vec<(Language, Vec<String>)>,
    chapters: &HashMap<u16, String>,
) -> Corpus {
    let mut unaligned = 0;
    for (language, texts) in &translations {
        if texts.len() != verses.len() {
            warn!(
                corpus = %key,
                language = %language,
                verses = verses.len(),
                translations = texts.len(),
                "translation length differs from verse count"
            );
            unaligned += verses.len().abs_diff(texts.len());
        }
    }

    let entries = verses
        .into_iter()
        .enumerate()
        .map(|(index, (verse_key, text))| {
            let heading = verse_key
                .split_once(':')
                .and_then(|(surah, _)| surah.parse::<u16>().ok())
                .and_then(|surah| chapters.get(&surah))
                .map(|name| format!("Surah {name}"));

            let translations = translations
                .iter()
                .map(|(language, texts)| (*language, texts.get(index).cloned().unwrap_or_default()))
                .collect();

            CorpusEntry {
                original: Some(text.clone()),
                translations,
                heading,
                ..CorpusEntry::new(verse_key, text)
            }
        })
        .collect();

    let mut corpus = Corpus::new(key, entries);
    corpus.unaligned = unaligned;
    corpus
}
