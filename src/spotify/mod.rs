use anyhow::Result;
use async_trait::async_trait;
use rspotify::{
    clients::{BaseClient, OAuthClient},
    scopes, AuthCodePkceSpotify, Config as SpotifyConfig, Credentials, OAuth,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::TokenCache;
use crate::config::Config;
use moodlist::mood::ExternalTrack;

pub mod auth;
pub mod playlists;

pub type SharedSpotify = Arc<Mutex<AuthCodePkceSpotify>>;

/// The slice of the Spotify Web API the mood workflow needs.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Every track of the playlist, all pages, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<ExternalTrack>>;

    async fn playlist_name(&self, playlist_id: &str) -> Result<String>;

    /// Creates a public playlist for the logged-in user and returns its share URL.
    async fn create_playlist(&self, name: &str, uris: &[String]) -> Result<Option<String>>;
}

pub async fn build_spotify_client(
    config: &Config,
    cache: &TokenCache,
) -> Result<(SharedSpotify, Option<String>)> {
    let creds = Credentials::new(&config.client_id, &config.client_secret);

    let scopes = scopes!(
        "playlist-read-private",
        "playlist-modify-public",
        "playlist-modify-private"
    );

    let oauth = OAuth {
        redirect_uri: config.redirect_uri.clone(),
        scopes,
        ..Default::default()
    };

    let sp_config = SpotifyConfig {
        token_refreshing: true,
        ..Default::default()
    };

    let mut spotify = AuthCodePkceSpotify::with_config(creds, oauth, sp_config);

    if let Some(token) = cache.load().await {
        info!("Loaded cached token from Redis");
        *spotify.token.lock().await.unwrap() = Some(token);

        // A cached token may be stale or revoked
        match spotify.refetch_token().await {
            Ok(Some(fresh)) => {
                *spotify.token.lock().await.unwrap() = Some(fresh.clone());
                cache.store(&fresh).await.ok();
                return Ok((Arc::new(Mutex::new(spotify)), None));
            }
            Ok(None) => {
                warn!("Cached token had no refresh token, re-authenticating");
                *spotify.token.lock().await.unwrap() = None;
                cache.clear().await;
            }
            Err(e) => {
                warn!("Failed to refresh cached token ({e}), clearing cache and re-authenticating");
                *spotify.token.lock().await.unwrap() = None;
                cache.clear().await;
            }
        }
    }

    let url = spotify.get_authorize_url(None)?;
    info!("Auth URL generated, opening browser...");

    Ok((Arc::new(Mutex::new(spotify)), Some(url)))
}

pub async fn complete_auth(spotify: SharedSpotify, code: &str, cache: &TokenCache) -> Result<()> {
    let sp = spotify.lock().await;
    sp.request_token(code).await?;

    let token = sp.token.lock().await.unwrap().clone();
    if let Some(token) = token {
        cache.store(&token).await?;
        info!("Token saved to Redis cache");
    }

    Ok(())
}
