use crate::{HighlightedText, Language, TextDirection};
use regex::{Captures, Regex, RegexBuilder};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub open: String,
    pub close: String,
}

impl Marker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    marker: Marker,
}

#[derive(Debug, Clone)]
pub struct TermHighlighter<'a> {
    marker: &'a Marker,
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(marker: Marker) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn for_term(&self, term: &str) -> TermHighlighter<'_> {
        let pattern = if term.trim().is_empty() {
            None
        } else {
            match RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => Some(pattern),
                Err(error) => {
                    warn!(term, error = %error, "highlight pattern rejected");
                    None
                }
            }
        };

        TermHighlighter {
            marker: &self.marker,
            pattern,
        }
    }

    pub fn highlight(&self, text: &str, term: &str) -> String {
        self.for_term(term).apply(text)
    }

    pub fn decorate(&self, text: &str, term: &str, language: Language) -> HighlightedText {
        self.for_term(term).decorate(text, language)
    }
}

impl TermHighlighter<'_> {
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    format!("{}{}{}", self.marker.open, &caps[0], self.marker.close)
                })
                .into_owned(),
            None => text.to_string(),
        }
    }

    pub fn decorate(&self, text: &str, language: Language) -> HighlightedText {
        HighlightedText {
            markup: self.apply(text),
            direction: language.direction(),
            font: language.font(),
        }
    }

    pub fn decorate_original(&self, text: &str) -> HighlightedText {
        HighlightedText {
            markup: self.apply(text),
            direction: TextDirection::RightToLeft,
            font: Language::Arabic.font(),
        }
    }
}
