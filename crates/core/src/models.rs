use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Urdu,
    Indonesian,
    Turkish,
    French,
    Bengali,
    German,
    Spanish,
    Russian,
    Arabic,
    Portuguese,
    Italian,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Urdu,
        Language::Indonesian,
        Language::Turkish,
        Language::French,
        Language::Bengali,
        Language::German,
        Language::Spanish,
        Language::Russian,
        Language::Arabic,
        Language::Portuguese,
        Language::Italian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Urdu => "urdu",
            Language::Indonesian => "indonesian",
            Language::Turkish => "turkish",
            Language::French => "french",
            Language::Bengali => "bengali",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::Russian => "russian",
            Language::Arabic => "arabic",
            Language::Portuguese => "portuguese",
            Language::Italian => "italian",
        }
    }

    pub fn quran_translation_id(self) -> u32 {
        match self {
            Language::English => 131,
            Language::Urdu => 97,
            Language::Indonesian => 33,
            Language::Turkish => 77,
            Language::French => 31,
            Language::Bengali => 161,
            Language::German => 27,
            Language::Spanish => 83,
            Language::Russian => 79,
            Language::Arabic => 169,
            Language::Portuguese => 128,
            Language::Italian => 40,
        }
    }

    pub fn hadith_edition_prefix(self) -> Option<&'static str> {
        match self {
            Language::English => Some("eng"),
            Language::Urdu => Some("urd"),
            Language::Indonesian => Some("ind"),
            Language::Turkish => Some("tur"),
            Language::French => Some("fra"),
            Language::Bengali => Some("ben"),
            Language::Russian => Some("rus"),
            Language::Arabic => Some("ara"),
            _ => None,
        }
    }

    pub fn from_hadith_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.hadith_edition_prefix() == Some(prefix))
    }

    pub fn direction(self) -> TextDirection {
        match self {
            Language::Arabic | Language::Urdu => TextDirection::RightToLeft,
            _ => TextDirection::LeftToRight,
        }
    }

    pub fn font(self) -> Option<ScriptFont> {
        match self {
            Language::Arabic => Some(ScriptFont::Arabic),
            Language::Urdu => Some(ScriptFont::Urdu),
            Language::Bengali => Some(ScriptFont::Bengali),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.name() == lowered)
            .or_else(|| Self::from_hadith_prefix(&lowered))
            .ok_or_else(|| format!("unsupported language: {value}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScriptFont {
    Arabic,
    Urdu,
    Bengali,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct CorpusKey(String);

impl CorpusKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn hadith(language: Language, book: &str) -> Option<Self> {
        language
            .hadith_edition_prefix()
            .map(|prefix| Self(format!("{prefix}-{book}")))
    }

    pub fn quran() -> Self {
        Self("quran".to_string())
    }

    pub fn quran_in(language: Language) -> Self {
        Self(format!("quran-{}", language.name()))
    }

    pub fn uthmani() -> Self {
        Self("uthmani".to_string())
    }

    pub fn category(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorpusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorpusKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CorpusEntry {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub translations: BTreeMap<Language, String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CorpusEntry {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn translation(&self, language: Language) -> Option<&str> {
        self.translations.get(&language).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub key: CorpusKey,
    pub entries: Vec<CorpusEntry>,
    pub fetched_at: DateTime<Utc>,
    pub unaligned: usize,
}

impl Corpus {
    pub fn new(key: CorpusKey, entries: Vec<CorpusEntry>) -> Self {
        Self {
            key,
            entries,
            fetched_at: Utc::now(),
            unaligned: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&CorpusEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Primary,
    Original,
    OriginalStripped,
    ActiveTranslation,
    Notes,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub score: Option<f64>,
}

impl Hit {
    pub fn exact(index: usize) -> Self {
        Self { index, score: None }
    }
}

#[derive(Debug, Clone)]
pub struct MatchSet {
    pub corpus: Arc<Corpus>,
    pub hits: Vec<Hit>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CorpusEntry> + '_ {
        self.hits
            .iter()
            .filter_map(|hit| self.corpus.entries.get(hit.index))
    }

    pub fn slice(&self, range: Range<usize>) -> impl Iterator<Item = &CorpusEntry> + '_ {
        let end = range.end.min(self.hits.len());
        let start = range.start.min(end);
        self.hits[start..end]
            .iter()
            .filter_map(|hit| self.corpus.entries.get(hit.index))
    }
}

#[derive(Debug, Clone)]
pub enum CorpusState {
    NotLoaded,
    Loading,
    Loaded(Arc<Corpus>),
    Failed(String),
}

impl CorpusState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, CorpusState::Loaded(_))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HighlightedText {
    pub markup: String,
    pub direction: TextDirection,
    pub font: Option<ScriptFont>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultRow {
    pub id: String,
    pub heading: Option<String>,
    pub link: Option<String>,
    pub body: HighlightedText,
    pub original: Option<HighlightedText>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultsPage {
    pub query: String,
    pub total: usize,
    pub page: usize,
    pub rows: Vec<ResultRow>,
    pub appended: Range<usize>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum SearchView {
    Idle,
    Failed(String),
    NoMatches { query: String },
    Results(ResultsPage),
}

impl SearchView {
    pub fn rows(&self) -> &[ResultRow] {
        match self {
            SearchView::Results(page) => &page.rows,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_names_and_edition_prefixes() {
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert_eq!("urd".parse::<Language>(), Ok(Language::Urdu));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn hadith_key_uses_edition_prefix() {
        let key = CorpusKey::hadith(Language::English, "bukhari").expect("english has editions");
        assert_eq!(key.as_str(), "eng-bukhari");
        assert!(CorpusKey::hadith(Language::German, "bukhari").is_none());
        assert_eq!(CorpusKey::quran_in(Language::Urdu).as_str(), "quran-urdu");
    }

    #[test]
    fn rtl_languages_are_flagged() {
        assert_eq!(Language::Urdu.direction(), TextDirection::RightToLeft);
        assert_eq!(Language::Arabic.direction(), TextDirection::RightToLeft);
        assert_eq!(Language::Bengali.direction(), TextDirection::LeftToRight);
        assert_eq!(Language::Bengali.font(), Some(ScriptFont::Bengali));
    }

    #[test]
    fn match_set_slice_clamps_to_hits() {
        let corpus = Arc::new(Corpus::new(
            CorpusKey::new("test"),
            vec![CorpusEntry::new("1", "a"), CorpusEntry::new("2", "b")],
        ));
        let set = MatchSet {
            corpus,
            hits: vec![Hit::exact(1)],
        };
        let ids: Vec<_> = set.slice(0..20).map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
