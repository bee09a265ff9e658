use thiserror::Error;

/// Failures a single station's fetch+normalize pipeline can hit.
///
/// None of these ever escape a station task: the aggregator folds every
/// variant into that station's failure entry. A missing HTML field is
/// deliberately NOT an error — it resolves to `None` with a warning,
/// since upstream page structure is not guaranteed stable.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("incomplete or unexpected payload shape")]
    PayloadShape,
}
