use anyhow::{bail, Result};
use dotenvy::dotenv;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub redis_url: String,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    /// Namespaces the cached OAuth token so several accounts can share one Redis.
    pub profile: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok(); // Try loading .env file, ignore if it doesn't exist (e.g. env vars set manually)
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // SPOTIPY_* is what the spotipy tooling writes into .env files
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k).filter(|v| !v.is_empty()));

        let Some(client_id) = first(&["SPOTIFY_CLIENT_ID", "SPOTIPY_CLIENT_ID"]) else {
            bail!("SPOTIFY_CLIENT_ID is missing from .env or environment");
        };
        let Some(client_secret) = first(&["SPOTIFY_CLIENT_SECRET", "SPOTIPY_CLIENT_SECRET"]) else {
            bail!("SPOTIFY_CLIENT_SECRET is missing from .env or environment");
        };

        Ok(Config {
            client_id,
            client_secret,
            redirect_uri: first(&["SPOTIFY_REDIRECT_URI", "SPOTIPY_REDIRECT_URI"])
                .unwrap_or_else(|| "http://127.0.0.1:8989/login".to_string()),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            dataset_path: lookup("MOODLIST_DATASET")
                .unwrap_or_else(|| "data/SingerAndSongs.csv".to_string())
                .into(),
            model_path: lookup("MOODLIST_MODEL")
                .unwrap_or_else(|| "KNN_Model.json".to_string())
                .into(),
            profile: lookup("MOODLIST_PROFILE").unwrap_or_else(|| "default".to_string()),
        })
    }
}
