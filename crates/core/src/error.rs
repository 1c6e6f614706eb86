use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("corpus {key} returned status {status}")]
    Status { key: String, status: u16 },

    #[error("unexpected response shape for {key}: {details}")]
    Shape { key: String, details: String },

    #[error("json parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown corpus: {0}")]
    UnknownCorpus(String),
}

impl CorpusError {
    pub(crate) fn shape(key: &str, details: impl Into<String>) -> Self {
        Self::Shape {
            key: key.to_string(),
            details: details.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("{0}")]
    InvalidReference(String),

    #[error("invalid search settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
