use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoodError {
    #[error("Invalid Spotify playlist URL: {0}")]
    InvalidPlaylistUrl(String),

    #[error("Invalid {field} value: {value}")]
    InvalidFeatures { field: &'static str, value: f64 },

    #[error("Dataset error at row {row}: {source}")]
    Dataset {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Cannot train a model on an empty dataset")]
    EmptyTrainingSet,
}

pub type MoodResult<T> = Result<T, MoodError>;
