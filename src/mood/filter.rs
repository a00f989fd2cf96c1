use super::classifier::Mood;
use super::matcher::MatchedTrack;

/// Upper bound on items the playlist API accepts in a single add call.
pub const MAX_PLAYLIST_ITEMS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTrack {
    pub track: MatchedTrack,
    pub mood: Mood,
}

pub fn filter_by_mood(tracks: &[LabeledTrack], mood: Mood) -> Vec<LabeledTrack> {
    tracks.iter().filter(|t| t.mood == mood).cloned().collect()
}

/// Track URIs in matched order, capped at [`MAX_PLAYLIST_ITEMS`].
pub fn playlist_uris(tracks: &[LabeledTrack]) -> Vec<String> {
    tracks
        .iter()
        .take(MAX_PLAYLIST_ITEMS)
        .map(|t| t.track.uri.clone())
        .collect()
}
