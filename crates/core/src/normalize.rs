use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
    pub lowered: String,
}

impl NormalizedQuery {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn normalize_query(raw: &str, min_chars: usize) -> Option<NormalizedQuery> {
    let text = raw.trim();
    if text.is_empty() || text.chars().count() < min_chars {
        return None;
    }

    Some(NormalizedQuery {
        text: text.to_string(),
        lowered: text.to_lowercase(),
    })
}

pub fn is_arabic_mark(c: char) -> bool {
    ('\u{064B}'..='\u{065F}').contains(&c)
}

pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_arabic_mark(*c)).collect()
}

fn footnote_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?is)<sup[^>]*>.*?</sup>|&lt;sup[^&]*&gt;.*?&lt;/sup&gt;").ok())
        .as_ref()
}

pub fn strip_footnotes(text: &str) -> String {
    match footnote_pattern() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_rejected_after_trimming() {
        assert!(normalize_query("  ab  ", 3).is_none());
        assert!(normalize_query("", 1).is_none());
        assert!(normalize_query("   ", 1).is_none());

        let query = normalize_query("  Mercy ", 3).expect("long enough");
        assert_eq!(query.text, "Mercy");
        assert_eq!(query.lowered, "mercy");
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // three Arabic letters are six bytes
        assert!(normalize_query("رحم", 3).is_some());
        assert!(normalize_query("رح", 3).is_none());
    }

    #[test]
    fn diacritics_are_removed() {
        let voweled = "بِسْمِ ٱللَّهِ";
        assert_eq!(strip_diacritics(voweled), "بسم ٱلله");
    }

    #[test]
    fn footnotes_are_removed_in_both_forms() {
        let raw = "Guide us<sup foot_note=77>1</sup> to the straight path";
        assert_eq!(strip_footnotes(raw), "Guide us to the straight path");

        let escaped = "Praise&lt;sup foot_note=1&gt;2&lt;/sup&gt; be to Allah";
        assert_eq!(strip_footnotes(escaped), "Praise be to Allah");
    }

    #[test]
    fn whitespace_is_normalized() {
        assert_eq!(normalize_whitespace("A  \t lot\nof   space"), "A lot of space");
        assert_eq!(normalize_whitespace(" قُلْ\u{a0} هُوَ "), "قُلْ هُوَ");
        assert_eq!(
            normalize_whitespace(&strip_footnotes("Guide us <sup foot_note=77>1</sup> to")),
            "Guide us to"
        );
    }
}
