use tracing::debug;

use super::dataset::{ReferenceDataset, ReferenceSong};
use super::features::Features;

/// A track as read from the source playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalTrack {
    pub name: String,
    /// Primary (first listed) artist, if the platform reports one.
    pub artist: Option<String>,
    /// Opaque platform handle; only ever handed back to the playlist API.
    pub uri: String,
}

impl ExternalTrack {
    pub fn new(name: &str, artist: Option<&str>, uri: &str) -> Self {
        ExternalTrack {
            name: name.to_string(),
            artist: artist.map(str::to_string),
            uri: uri.to_string(),
        }
    }
}

/// An external track paired with the reference row it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedTrack {
    pub song_name: String,
    pub singer: String,
    pub track_name: String,
    pub track_artist: Option<String>,
    pub features: Features,
    pub uri: String,
}

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// True when either string contains the other. "" is contained in everything.
fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn qualifies(name: &str, artist: &str, song: &ReferenceSong) -> bool {
    overlaps(name, &normalize(&song.song_name)) && overlaps(artist, &normalize(&song.singer))
}

/// Pairs each external track with the first qualifying reference song, in dataset order.
///
/// Unmatched tracks are dropped. `ReferenceDataset` only holds rows with valid features,
/// so everything returned here is safe to hand to the classifier.
pub fn match_tracks(external: &[ExternalTrack], reference: &ReferenceDataset) -> Vec<MatchedTrack> {
    let mut matched = Vec::new();

    for track in external {
        let name = normalize(&track.name);
        let artist = track.artist.as_deref().map(normalize).unwrap_or_default();

        let hit = reference.songs().iter().find(|song| qualifies(&name, &artist, song));

        match hit {
            Some(song) => matched.push(MatchedTrack {
                song_name: song.song_name.clone(),
                singer: song.singer.clone(),
                track_name: track.name.clone(),
                track_artist: track.artist.clone(),
                features: song.features(),
                uri: track.uri.clone(),
            }),
            None => debug!("No reference match for {} ({})", track.name, artist),
        }
    }

    matched
}
