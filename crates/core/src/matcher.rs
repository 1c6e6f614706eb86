use crate::normalize::{strip_diacritics, NormalizedQuery};
use crate::{Corpus, CorpusEntry, Hit, Language, SearchField};

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.3;

pub const DEFAULT_LOCATION_DISTANCE: usize = 100;

pub trait Matcher: Send + Sync {
    fn find(&self, corpus: &Corpus, query: &NormalizedQuery, language: Language) -> Vec<Hit>;
}

#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    fields: Vec<SearchField>,
}

impl SubstringMatcher {
    pub fn new(fields: Vec<SearchField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }
}

impl Matcher for SubstringMatcher {
    fn find(&self, corpus: &Corpus, query: &NormalizedQuery, language: Language) -> Vec<Hit> {
        let stripped_needle = strip_diacritics(&query.lowered);

        corpus
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                self.fields.iter().any(|field| {
                    field_values(entry, *field, language).iter().any(|value| {
                        let value = value.to_lowercase();
                        if *field == SearchField::OriginalStripped {
                            strip_diacritics(&value).contains(&stripped_needle)
                        } else {
                            value.contains(&query.lowered)
                        }
                    })
                })
            })
            .map(|(index, _)| Hit::exact(index))
            .collect()
    }
}

/// Approximate matcher for noisy input such as speech transcripts.
///
/// A window of the field scores `errors / query length + offset / location
/// distance`, where `errors` is the Levenshtein distance to the query. The
/// best window must not exceed the threshold. Hits are ranked by score, ties
/// keeping corpus order.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
    field: SearchField,
    location_distance: Option<usize>,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            field: SearchField::OriginalStripped,
            location_distance: Some(DEFAULT_LOCATION_DISTANCE),
        }
    }

    pub fn on_field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    pub fn with_location_distance(mut self, distance: Option<usize>) -> Self {
        self.location_distance = distance.filter(|distance| *distance > 0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn best_score(&self, needle: &str, needle_len: usize, haystack: &str) -> Option<f64> {
        let bounds: Vec<usize> = haystack
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(haystack.len()))
            .collect();
        let char_len = bounds.len() - 1;
        if char_len == 0 {
            return None;
        }

        let slack = (self.threshold * needle_len as f64).floor() as usize;
        let shortest = needle_len.saturating_sub(slack).max(1);
        let longest = needle_len + slack;

        let mut best: Option<f64> = None;
        for start in 0..char_len {
            let proximity = self
                .location_distance
                .map_or(0.0, |distance| start as f64 / distance as f64);
            if proximity > self.threshold {
                break;
            }

            for len in shortest..=longest {
                let end = (start + len).min(char_len);
                let window = &haystack[bounds[start]..bounds[end]];
                let score = strsim::levenshtein(needle, window) as f64 / needle_len as f64 + proximity;
                if score <= self.threshold && best.map_or(true, |current| score < current) {
                    best = Some(score);
                }
                if end == char_len {
                    break;
                }
            }

            if best == Some(0.0) {
                break;
            }
        }
        best
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl Matcher for FuzzyMatcher {
    fn find(&self, corpus: &Corpus, query: &NormalizedQuery, language: Language) -> Vec<Hit> {
        let needle = strip_diacritics(&query.lowered);
        let needle_len = needle.chars().count();
        if needle_len == 0 {
            return Vec::new();
        }

        let mut hits: Vec<Hit> = corpus
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let score = field_values(entry, self.field, language)
                    .iter()
                    .filter_map(|value| {
                        let haystack = strip_diacritics(&value.to_lowercase());
                        self.best_score(&needle, needle_len, &haystack)
                    })
                    .min_by(f64::total_cmp)?;
                Some(Hit {
                    index,
                    score: Some(score),
                })
            })
            .collect();

        hits.sort_by(|left, right| {
            let left = left.score.unwrap_or_default();
            let right = right.score.unwrap_or_default();
            left.total_cmp(&right)
        });
        hits
    }
}

pub fn field_values(entry: &CorpusEntry, field: SearchField, language: Language) -> Vec<&str> {
    match field {
        SearchField::Primary => vec![entry.text.as_str()],
        SearchField::Original | SearchField::OriginalStripped => {
            entry.original.as_deref().into_iter().collect()
        }
        SearchField::ActiveTranslation => entry.translation(language).into_iter().collect(),
        SearchField::Notes => entry.notes.as_deref().into_iter().collect(),
        SearchField::Keywords => entry.keywords.iter().map(String::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_query;
    use crate::CorpusKey;
    use proptest::prelude::*;

    fn corpus(texts: &[(&str, &str)]) -> Corpus {
        Corpus::new(
            CorpusKey::new("test"),
            texts
                .iter()
                .map(|(id, text)| CorpusEntry::new(*id, *text))
                .collect(),
        )
    }

    fn query(raw: &str) -> NormalizedQuery {
        normalize_query(raw, 1).expect("non-empty query")
    }

    #[test]
    fn substring_match_keeps_only_containing_verses() {
        let corpus = corpus(&[
            ("2:255", "Allah - there is no deity except Him"),
            ("2:256", "There is no compulsion in religion"),
        ]);
        let matcher = SubstringMatcher::new(vec![SearchField::Primary]);

        let hits = matcher.find(&corpus, &query("no deity"), Language::English);
        assert_eq!(hits, vec![Hit::exact(0)]);
    }

    #[test]
    fn substring_match_is_case_insensitive_and_ordered() {
        let corpus = corpus(&[
            ("1", "Mercy upon mercy"),
            ("2", "nothing here"),
            ("3", "MERCIFUL lord"),
        ]);
        let matcher = SubstringMatcher::new(vec![SearchField::Primary]);

        let hits = matcher.find(&corpus, &query("Merc"), Language::English);
        let indexes: Vec<_> = hits.iter().map(|hit| hit.index).collect();
        assert_eq!(indexes, vec![0, 2]);
    }

    #[test]
    fn original_or_translation_fields_are_both_checked() {
        let mut verse = CorpusEntry::new("1:1", "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ");
        verse.original = Some(verse.text.clone());
        verse
            .translations
            .insert(Language::English, "In the name of Allah".to_string());
        verse
            .translations
            .insert(Language::Urdu, "شروع اللہ کے نام سے".to_string());
        let corpus = Corpus::new(CorpusKey::quran(), vec![verse]);
        let matcher =
            SubstringMatcher::new(vec![SearchField::Original, SearchField::ActiveTranslation]);

        assert_eq!(matcher.find(&corpus, &query("name of"), Language::English).len(), 1);
        assert!(matcher.find(&corpus, &query("name of"), Language::Urdu).is_empty());
        assert_eq!(matcher.find(&corpus, &query("بِسْمِ"), Language::Urdu).len(), 1);
    }

    #[test]
    fn keywords_and_notes_are_searchable() {
        let mut book = CorpusEntry::new("book-1", "Ihya Ulum al-Din");
        book.notes = Some("Revival of the religious sciences".to_string());
        book.keywords = vec!["ghazali".to_string(), "tasawwuf".to_string()];
        let corpus = Corpus::new(CorpusKey::category("theology"), vec![book]);
        let matcher = SubstringMatcher::new(vec![
            SearchField::Primary,
            SearchField::Notes,
            SearchField::Keywords,
        ]);

        assert_eq!(matcher.find(&corpus, &query("revival"), Language::English).len(), 1);
        assert_eq!(matcher.find(&corpus, &query("Ghazali"), Language::English).len(), 1);
        assert!(matcher.find(&corpus, &query("hadith"), Language::English).is_empty());
    }

    #[test]
    fn fuzzy_matcher_ignores_diacritics_and_ranks_by_distance() {
        let mut entries = Vec::new();
        for (id, text) in [
            ("1:2", "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ"),
            ("112:1", "قُلْ هُوَ ٱللَّهُ أَحَدٌ"),
            ("1:4", "مَٰلِكِ يَوْمِ ٱلدِّينِ"),
        ] {
            let mut entry = CorpusEntry::new(id, text);
            entry.original = Some(text.to_string());
            entries.push(entry);
        }
        let corpus = Corpus::new(CorpusKey::uthmani(), entries);
        let matcher = FuzzyMatcher::default();

        let hits = matcher.find(&corpus, &query("قل هو ٱلله احد"), Language::Arabic);
        assert_eq!(hits.first().map(|hit| hit.index), Some(1));
        assert!(hits.iter().all(|hit| hit.score.unwrap_or(1.0) <= DEFAULT_FUZZY_THRESHOLD));
    }

    #[test]
    fn fuzzy_matcher_tolerates_a_typo_near_the_start() {
        let corpus = corpus(&[("1", "the mersy of"), ("2", "patience and prayer")]);
        let matcher = FuzzyMatcher::default().on_field(SearchField::Primary);

        let hits = matcher.find(&corpus, &query("mercy"), Language::English);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert!(hits[0].score.is_some_and(|score| score > 0.0 && score <= 0.3));
    }

    #[test]
    fn fuzzy_location_weighting_drops_late_matches_and_ranks_early_ones_first() {
        let late = format!("{} mercy", "x".repeat(40));
        let corpus = corpus(&[("late", late.as_str()), ("near", "ab mercy"), ("start", "mercy")]);

        let weighted = FuzzyMatcher::default().on_field(SearchField::Primary);
        let indexes: Vec<_> = weighted
            .find(&corpus, &query("mercy"), Language::English)
            .iter()
            .map(|hit| hit.index)
            .collect();
        assert_eq!(indexes, vec![2, 1]);

        let anywhere = FuzzyMatcher::default()
            .on_field(SearchField::Primary)
            .with_location_distance(None);
        let indexes: Vec<_> = anywhere
            .find(&corpus, &query("mercy"), Language::English)
            .iter()
            .map(|hit| hit.index)
            .collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn stripped_original_matches_voweled_text_with_either_query() {
        let text = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ";
        let mut verse = CorpusEntry::new("1:1", text);
        verse.original = Some(text.to_string());
        let corpus = Corpus::new(CorpusKey::uthmani(), vec![verse]);
        let matcher = SubstringMatcher::new(vec![SearchField::OriginalStripped]);

        assert_eq!(matcher.find(&corpus, &query("بِسْمِ ٱللَّهِ"), Language::Arabic).len(), 1);
        assert_eq!(matcher.find(&corpus, &query("بسم ٱلله"), Language::Arabic).len(), 1);
        assert!(matcher.find(&corpus, &query("الكتاب"), Language::Arabic).is_empty());
    }

    proptest! {
        #[test]
        fn substring_hits_are_exactly_the_containing_entries(
            texts in proptest::collection::vec("[a-e ]{0,24}", 1..30),
            pick in any::<prop::sample::Index>(),
            start in 0usize..24,
            len in 1usize..5,
        ) {
            let source = &texts[pick.index(texts.len())];
            let chars: Vec<char> = source.chars().collect();
            prop_assume!(!chars.is_empty());
            let start = start % chars.len();
            let end = (start + len).min(chars.len());
            let needle: String = chars[start..end].iter().collect();
            prop_assume!(!needle.trim().is_empty());

            let corpus = Corpus::new(
                CorpusKey::new("prop"),
                texts
                    .iter()
                    .enumerate()
                    .map(|(index, text)| CorpusEntry::new(index.to_string(), text.clone()))
                    .collect(),
            );
            let normalized = normalize_query(&needle, 1).expect("non-blank needle");
            let hits = SubstringMatcher::new(vec![SearchField::Primary])
                .find(&corpus, &normalized, Language::English);
            let hit_indexes: Vec<usize> = hits.iter().map(|hit| hit.index).collect();

            for (index, text) in texts.iter().enumerate() {
                let contains = text.to_lowercase().contains(&normalized.lowered);
                prop_assert_eq!(hit_indexes.contains(&index), contains);
            }
            prop_assert!(hit_indexes.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
