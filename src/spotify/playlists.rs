use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use regex::Regex;
use rspotify::{
    model::{FullTrack, PlayableId, PlayableItem, PlaylistId, PlaylistItem, TrackId},
    prelude::*,
};
use std::sync::OnceLock;
use tracing::{debug, info};

use super::{PlaylistService, SharedSpotify};
use moodlist::mood::{error::MoodError, ExternalTrack, MAX_PLAYLIST_ITEMS};

fn playlist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"playlist/([a-zA-Z0-9]+)").expect("playlist id pattern is valid"))
}

/// Pulls the playlist id out of an `open.spotify.com/playlist/<id>` style link.
pub fn extract_playlist_id(url: &str) -> Result<String, MoodError> {
    playlist_re()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| MoodError::InvalidPlaylistUrl(url.trim().to_string()))
}

fn to_external(track: &FullTrack) -> Option<ExternalTrack> {
    // local files have no id and cannot be added to another playlist
    let uri = track.id.as_ref()?.uri();
    Some(ExternalTrack {
        name: track.name.clone(),
        artist: track.artists.first().map(|a| a.name.clone()),
        uri,
    })
}

pub struct SpotifyPlaylists {
    spotify: SharedSpotify,
}

impl SpotifyPlaylists {
    pub fn new(spotify: SharedSpotify) -> Self {
        SpotifyPlaylists { spotify }
    }
}

#[async_trait]
impl PlaylistService for SpotifyPlaylists {
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<ExternalTrack>> {
        let sp = self.spotify.lock().await;
        let pid = PlaylistId::from_id(playlist_id)?;
        let items: Vec<PlaylistItem> = sp
            .playlist_items(pid, None, None)
            .try_collect()
            .await
            .context("Unable to access this playlist (private, region-locked, or invalid)")?;

        let total = items.len();
        let tracks: Vec<ExternalTrack> = items
            .iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(ref track)) => to_external(track),
                _ => None,
            })
            .collect();
        debug!("Playlist {playlist_id}: {} of {total} items are usable tracks", tracks.len());
        Ok(tracks)
    }

    async fn playlist_name(&self, playlist_id: &str) -> Result<String> {
        let sp = self.spotify.lock().await;
        let pid = PlaylistId::from_id(playlist_id)?;
        let playlist = sp.playlist(pid, None, None).await?;
        Ok(playlist.name)
    }

    async fn create_playlist(&self, name: &str, uris: &[String]) -> Result<Option<String>> {
        let sp = self.spotify.lock().await;
        let user = sp
            .current_user()
            .await
            .context("Failed to fetch current user. Make sure you completed login.")?;
        info!("Creating playlist {name} for {}", user.display_name.as_deref().unwrap_or("unknown user"));

        let playlist = sp
            .user_playlist_create(user.id.as_ref(), name, Some(true), None, None)
            .await
            .context("Failed to create playlist")?;

        let ids = uris
            .iter()
            .take(MAX_PLAYLIST_ITEMS)
            .map(|uri| TrackId::from_uri(uri).map(PlayableId::Track))
            .collect::<Result<Vec<_>, _>>()?;
        if !ids.is_empty() {
            let count = ids.len();
            sp.playlist_add_items(playlist.id.as_ref(), ids, None)
                .await
                .context("Failed to add tracks to the new playlist")?;
            info!("Added {count} songs to {name}");
        }

        Ok(playlist.external_urls.get("spotify").cloned())
    }
}
