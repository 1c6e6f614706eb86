use crate::debounce::{TYPING_QUIET_PERIOD, VOICE_QUIET_PERIOD};
use crate::matcher::{
    FuzzyMatcher, Matcher, SubstringMatcher, DEFAULT_FUZZY_THRESHOLD, DEFAULT_LOCATION_DISTANCE,
};
use crate::paginate::DEFAULT_PAGE_SIZE;
use crate::{SearchError, SearchField};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStrategy {
    Substring { fields: Vec<SearchField> },
    Fuzzy {
        threshold: f64,
        field: SearchField,
        /// `null` scores matches the same wherever they sit in the text.
        #[serde(default = "default_location_distance")]
        location_distance: Option<usize>,
    },
}

fn default_location_distance() -> Option<usize> {
    Some(DEFAULT_LOCATION_DISTANCE)
}

impl MatchStrategy {
    pub fn build(&self) -> Box<dyn Matcher> {
        match self {
            MatchStrategy::Substring { fields } => Box::new(SubstringMatcher::new(fields.clone())),
            MatchStrategy::Fuzzy {
                threshold,
                field,
                location_distance,
            } => Box::new(
                FuzzyMatcher::new(*threshold)
                    .on_field(*field)
                    .with_location_distance(*location_distance),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    pub min_query_chars: usize,
    pub page_size: usize,
    pub debounce_ms: u64,
    pub strategy: MatchStrategy,
    #[serde(default)]
    pub show_footnotes: bool,
    #[serde(default)]
    pub resolve_references: bool,
}

impl SearchSettings {
    pub fn quran_text() -> Self {
        Self {
            min_query_chars: 3,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: millis(TYPING_QUIET_PERIOD),
            strategy: MatchStrategy::Substring {
                fields: vec![SearchField::Original, SearchField::ActiveTranslation],
            },
            show_footnotes: false,
            resolve_references: true,
        }
    }

    pub fn hadith_text() -> Self {
        Self {
            min_query_chars: 3,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: millis(TYPING_QUIET_PERIOD),
            strategy: MatchStrategy::Substring {
                fields: vec![SearchField::Primary],
            },
            show_footnotes: false,
            resolve_references: false,
        }
    }

    pub fn quran_voice() -> Self {
        Self {
            min_query_chars: 2,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: millis(VOICE_QUIET_PERIOD),
            strategy: MatchStrategy::Fuzzy {
                threshold: DEFAULT_FUZZY_THRESHOLD,
                field: SearchField::OriginalStripped,
                location_distance: default_location_distance(),
            },
            show_footnotes: false,
            resolve_references: false,
        }
    }

    pub fn book_catalog() -> Self {
        Self {
            min_query_chars: 1,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: millis(TYPING_QUIET_PERIOD),
            strategy: MatchStrategy::Substring {
                fields: vec![SearchField::Primary, SearchField::Notes, SearchField::Keywords],
            },
            show_footnotes: false,
            resolve_references: false,
        }
    }

    pub fn sahaba_names() -> Self {
        Self {
            min_query_chars: 1,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: millis(TYPING_QUIET_PERIOD),
            strategy: MatchStrategy::Substring {
                fields: vec![SearchField::Primary],
            },
            show_footnotes: false,
            resolve_references: false,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.page_size == 0 {
            return Err(SearchError::InvalidSettings("page_size must be at least 1".to_string()));
        }
        if self.min_query_chars == 0 {
            return Err(SearchError::InvalidSettings(
                "min_query_chars must be at least 1".to_string(),
            ));
        }
        match &self.strategy {
            MatchStrategy::Fuzzy { threshold, .. } if !(0.0..=1.0).contains(threshold) => {
                Err(SearchError::InvalidSettings(format!(
                    "fuzzy threshold {threshold} outside 0..=1"
                )))
            }
            MatchStrategy::Fuzzy {
                location_distance: Some(0),
                ..
            } => Err(SearchError::InvalidSettings(
                "fuzzy location_distance must be at least 1".to_string(),
            )),
            MatchStrategy::Substring { fields } if fields.is_empty() => Err(
                SearchError::InvalidSettings("substring search needs at least one field".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
