use chrono::{DateTime, Local};
use rand::Rng;
use std::sync::Arc;
use tracing::info;

use super::classifier::{KnnModel, Mood};
use super::dataset::ReferenceDataset;
use super::error::MoodResult;
use super::features::Features;
use super::filter::{filter_by_mood, playlist_uris, LabeledTrack};
use super::matcher::{match_tracks, ExternalTrack};

/// Process-wide, read-only pieces of the pipeline. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MoodEngine {
    dataset: Arc<ReferenceDataset>,
    model: Arc<KnnModel>,
}

impl MoodEngine {
    pub fn new(dataset: ReferenceDataset, model: KnnModel) -> Self {
        MoodEngine {
            dataset: Arc::new(dataset),
            model: Arc::new(model),
        }
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    /// Match, classify and filter one playlist's tracks.
    pub fn analyze(&self, tracks: &[ExternalTrack], mood: Mood) -> MoodResult<Analysis> {
        let matched = match_tracks(tracks, &self.dataset);
        let features: Vec<Features> = matched.iter().map(|m| m.features).collect();
        let moods = self.model.classify(&features)?;

        let labeled: Vec<LabeledTrack> = matched
            .into_iter()
            .zip(moods)
            .map(|(track, mood)| LabeledTrack { track, mood })
            .collect();
        let filtered = filter_by_mood(&labeled, mood);

        info!(
            "Matched {} of {} tracks, {} labelled {}",
            labeled.len(),
            tracks.len(),
            filtered.len(),
            mood.short_name()
        );
        Ok(Analysis { mood, labeled, filtered })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub mood: Mood,
    pub labeled: Vec<LabeledTrack>,
    pub filtered: Vec<LabeledTrack>,
}

impl Analysis {
    /// Number of playlist tracks that matched the reference dataset.
    pub fn total(&self) -> usize {
        self.labeled.len()
    }

    pub fn selected(&self) -> usize {
        self.filtered.len()
    }

    pub fn uris(&self) -> Vec<String> {
        playlist_uris(&self.filtered)
    }
}

/// Everything one user accumulates between "analyze" and "create playlist".
/// Owned by whoever drives the UI; never shared between users.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub id: String,
    pub source_url: Option<String>,
    pub playlist_id: Option<String>,
    pub analysis: Option<Analysis>,
    pub analyzed_at: Option<DateTime<Local>>,
    pub created_playlist_url: Option<String>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        let bytes: [u8; 8] = rand::thread_rng().gen();
        AnalysisSession {
            id: hex::encode(bytes),
            source_url: None,
            playlist_id: None,
            analysis: None,
            analyzed_at: None,
            created_playlist_url: None,
        }
    }

    pub fn record_analysis(&mut self, url: &str, playlist_id: &str, analysis: Analysis) {
        self.source_url = Some(url.to_string());
        self.playlist_id = Some(playlist_id.to_string());
        self.analysis = Some(analysis);
        self.analyzed_at = Some(Local::now());
        self.created_playlist_url = None;
    }

    pub fn record_created(&mut self, url: Option<String>) {
        self.created_playlist_url = url;
    }

    pub fn can_create(&self) -> bool {
        self.playlist_id.is_some()
            && self.analysis.as_ref().is_some_and(|a| !a.filtered.is_empty())
    }

    /// Drops results but keeps the session id.
    pub fn reset(&mut self) {
        self.source_url = None;
        self.playlist_id = None;
        self.analysis = None;
        self.analyzed_at = None;
        self.created_playlist_url = None;
    }
}
