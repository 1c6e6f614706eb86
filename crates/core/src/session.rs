use crate::cache::MemoryCache;
use crate::client::CorpusClient;
use crate::debounce::DebounceOutput;
use crate::highlight::{Highlighter, TermHighlighter};
use crate::matcher::Matcher;
use crate::normalize::{normalize_query, normalize_whitespace, strip_footnotes, NormalizedQuery};
use crate::paginate::Paginator;
use crate::reference::parse_verse_reference;
use crate::settings::{MatchStrategy, SearchSettings};
use crate::traits::{CorpusCache, CorpusSource};
use crate::{
    CorpusEntry, CorpusKey, CorpusState, Hit, Language, MatchSet, ResultRow, ResultsPage,
    SearchError, SearchField, SearchView,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
enum Outcome {
    Idle,
    Failed(String),
    Matches(MatchSet),
}

/// State of one search box: the selected corpus and language, the last
/// committed query, its match set, and how much of it is shown.
///
/// Every committed query waits for its corpus to finish loading before the
/// matcher runs, so results always come from the currently selected corpus.
pub struct SearchSession<S, C = MemoryCache> {
    client: Arc<CorpusClient<S, C>>,
    corpus_key: CorpusKey,
    language: Language,
    settings: SearchSettings,
    matcher: Box<dyn Matcher>,
    highlighter: Highlighter,
    query: Option<NormalizedQuery>,
    outcome: Outcome,
    paginator: Paginator,
}

impl<S, C> SearchSession<S, C>
where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
{
    pub fn new(
        client: Arc<CorpusClient<S, C>>,
        corpus_key: CorpusKey,
        language: Language,
        settings: SearchSettings,
    ) -> Result<Self, SearchError> {
        settings.validate()?;
        Ok(Self {
            client,
            corpus_key,
            language,
            matcher: settings.strategy.build(),
            paginator: Paginator::new(settings.page_size),
            settings,
            highlighter: Highlighter::default(),
            query: None,
            outcome: Outcome::Idle,
        })
    }

    pub fn with_matcher(mut self, matcher: Box<dyn Matcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn corpus_key(&self) -> &CorpusKey {
        &self.corpus_key
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn query(&self) -> Option<&NormalizedQuery> {
        self.query.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn corpus_state(&self) -> CorpusState {
        self.client.state(&self.corpus_key)
    }

    /// Commits a debounced input value. Queries below the minimum length clear
    /// the results without running the matcher.
    pub async fn commit(&mut self, raw: &str) -> SearchView {
        match normalize_query(raw, self.settings.min_query_chars) {
            Some(query) => {
                self.query = Some(query);
                self.refresh().await
            }
            None => {
                self.clear();
                SearchView::Idle
            }
        }
    }

    pub async fn select_corpus(&mut self, key: CorpusKey) -> SearchView {
        self.corpus_key = key;
        if self.query.is_some() {
            return self.refresh().await;
        }

        match self.client.load(&self.corpus_key).await {
            Ok(_) => self.outcome = Outcome::Idle,
            Err(error) => self.outcome = Outcome::Failed(fetch_failure(&self.corpus_key, &error)),
        }
        self.view()
    }

    pub async fn set_language(&mut self, language: Language) -> SearchView {
        self.language = language;
        if self.query.is_some() {
            return self.refresh().await;
        }
        self.view()
    }

    pub async fn select(&mut self, key: CorpusKey, language: Language) -> SearchView {
        self.language = language;
        self.select_corpus(key).await
    }

    pub fn load_more(&mut self) -> SearchView {
        if let Outcome::Matches(matches) = &self.outcome {
            self.paginator.load_more(matches.len());
        }
        self.view()
    }

    pub fn clear(&mut self) {
        self.query = None;
        self.outcome = Outcome::Idle;
        self.paginator.reset();
    }

    pub fn view(&self) -> SearchView {
        let (matches, query) = match (&self.outcome, &self.query) {
            (Outcome::Idle, _) | (Outcome::Matches(_), None) => return SearchView::Idle,
            (Outcome::Failed(reason), _) => return SearchView::Failed(reason.clone()),
            (Outcome::Matches(matches), Some(query)) => (matches, query),
        };

        if matches.is_empty() {
            return SearchView::NoMatches {
                query: query.text.clone(),
            };
        }

        let window = self.paginator.window(matches.len());
        let term = self.highlighter.for_term(&query.text);
        let rows = matches
            .slice(window.visible.clone())
            .map(|entry| self.render_row(entry, &term))
            .collect();

        SearchView::Results(ResultsPage {
            query: query.text.clone(),
            total: matches.len(),
            page: window.page,
            rows,
            appended: window.appended,
            has_more: window.has_more,
        })
    }

    async fn refresh(&mut self) -> SearchView {
        self.paginator.reset();
        let Some(query) = self.query.clone() else {
            self.outcome = Outcome::Idle;
            return SearchView::Idle;
        };

        let reference = if self.settings.resolve_references {
            match parse_verse_reference(&query.text) {
                Ok(reference) => reference,
                Err(error) => {
                    self.outcome = Outcome::Failed(error.to_string());
                    return self.view();
                }
            }
        } else {
            None
        };

        let corpus = match self.client.load(&self.corpus_key).await {
            Ok(corpus) => corpus,
            Err(error) => {
                self.outcome = Outcome::Failed(fetch_failure(&self.corpus_key, &error));
                return self.view();
            }
        };

        let hits = match reference {
            Some(reference) => {
                let key = reference.key();
                corpus
                    .entries
                    .iter()
                    .position(|entry| entry.id == key)
                    .map(Hit::exact)
                    .into_iter()
                    .collect()
            }
            None => self.matcher.find(&corpus, &query, self.language),
        };

        debug!(
            corpus = %self.corpus_key,
            query = %query.text,
            language = %self.language,
            matches = hits.len(),
            "search committed"
        );
        self.outcome = Outcome::Matches(MatchSet { corpus, hits });
        self.view()
    }

    fn render_row(&self, entry: &CorpusEntry, term: &TermHighlighter<'_>) -> ResultRow {
        let translation = if self.searches_translation() {
            entry.translation(self.language).filter(|text| !text.is_empty())
        } else {
            None
        };
        let body_text = translation.unwrap_or(entry.text.as_str());
        let body_text = if self.settings.show_footnotes {
            body_text.to_string()
        } else {
            normalize_whitespace(&strip_footnotes(body_text))
        };

        let body_is_original =
            translation.is_none() && entry.original.as_deref() == Some(entry.text.as_str());
        let body = if body_is_original {
            term.decorate_original(&body_text)
        } else {
            term.decorate(&body_text, self.language)
        };

        let original = entry
            .original
            .as_deref()
            .filter(|_| !body_is_original)
            .map(|text| term.decorate_original(text));

        ResultRow {
            id: entry.id.clone(),
            heading: entry.heading.clone(),
            link: entry.link.clone(),
            body,
            original,
        }
    }

    fn searches_translation(&self) -> bool {
        match &self.settings.strategy {
            MatchStrategy::Substring { fields } => fields.contains(&SearchField::ActiveTranslation),
            MatchStrategy::Fuzzy { field, .. } => *field == SearchField::ActiveTranslation,
        }
    }
}

fn fetch_failure(key: &CorpusKey, error: &impl std::fmt::Display) -> String {
    format!("Error fetching {key}: {error}")
}

pub async fn run_debounced<S, C, F>(
    session: &mut SearchSession<S, C>,
    mut input: DebounceOutput<String>,
    mut render: F,
) where
    S: CorpusSource + Send + Sync,
    C: CorpusCache + Send + Sync,
    F: FnMut(SearchView),
{
    while let Some(raw) = input.next().await {
        let view = session.commit(&raw).await;
        render(view);
    }
}
