//! Playlist mood analysis: match playlist tracks against the reference
//! dataset, classify them with the k-NN model and pick out one mood.

pub mod classifier;
pub mod dataset;
pub mod error;
pub mod features;
pub mod filter;
pub mod matcher;
pub mod session;
pub mod train;

pub use classifier::{KnnModel, Mood};
pub use dataset::ReferenceDataset;
pub use error::MoodError;
pub use filter::MAX_PLAYLIST_ITEMS;
pub use matcher::ExternalTrack;
pub use session::{Analysis, AnalysisSession, MoodEngine};
