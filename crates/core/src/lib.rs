pub mod cache;
pub mod client;
pub mod debounce;
pub mod error;
pub mod highlight;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod paginate;
pub mod reference;
pub mod session;
pub mod settings;
pub mod sources;
pub mod traits;

pub use cache::MemoryCache;
pub use client::CorpusClient;
pub use debounce::{DebounceGate, DebounceInput, DebounceOutput, TYPING_QUIET_PERIOD, VOICE_QUIET_PERIOD};
pub use error::{CorpusError, SearchError};
pub use highlight::{Highlighter, Marker, TermHighlighter};
pub use matcher::{
    field_values, FuzzyMatcher, Matcher, SubstringMatcher, DEFAULT_FUZZY_THRESHOLD,
    DEFAULT_LOCATION_DISTANCE,
};
pub use models::{
    Corpus, CorpusEntry, CorpusKey, CorpusState, HighlightedText, Hit, Language, MatchSet,
    ResultRow, ResultsPage, ScriptFont, SearchField, SearchView, TextDirection,
};
pub use normalize::{
    normalize_query, normalize_whitespace, strip_diacritics, strip_footnotes, NormalizedQuery,
};
pub use paginate::{PageWindow, Paginator, DEFAULT_PAGE_SIZE};
pub use reference::{parse_verse_reference, surah, Surah, VerseRef, SURAHS};
pub use session::{run_debounced, SearchSession};
pub use settings::{MatchStrategy, SearchSettings};
pub use sources::{
    discover_corpus_files, BookCatalogSource, HadithCdnSource, LocalJsonSource, QuranComSource,
};
pub use traits::{CorpusCache, CorpusSource};
