use anyhow::{bail, Context, Result};
use tracing::info;

use moodlist::mood::{AnalysisSession, Mood, MoodEngine};
use crate::spotify::{playlists::extract_playlist_id, PlaylistService};

/// Fetch the playlist behind `url`, label its tracks and store the result in `session`.
/// An unparseable link fails before anything is fetched.
pub async fn analyze_playlist(
    service: &dyn PlaylistService,
    engine: &MoodEngine,
    session: &mut AnalysisSession,
    url: &str,
    mood: Mood,
) -> Result<()> {
    let playlist_id = extract_playlist_id(url)?;
    let tracks = service.playlist_tracks(&playlist_id).await?;
    let analysis = engine.analyze(&tracks, mood)?;
    session.record_analysis(url.trim(), &playlist_id, analysis);
    Ok(())
}

/// Create "<source name> - <Mood>" holding the session's filtered tracks.
/// Returns the share URL when the API reports one.
pub async fn create_mood_playlist(
    service: &dyn PlaylistService,
    session: &mut AnalysisSession,
) -> Result<Option<String>> {
    if !session.can_create() {
        bail!("No tracks to add. Analyze a playlist first.");
    }
    let (Some(playlist_id), Some(analysis)) = (&session.playlist_id, &session.analysis) else {
        bail!("No tracks to add. Analyze a playlist first.");
    };

    let source_name = service
        .playlist_name(playlist_id)
        .await
        .context("Failed to read the source playlist name")?;
    let name = format!("{source_name} - {}", analysis.mood.short_name());
    let uris = analysis.uris();

    let url = service.create_playlist(&name, &uris).await?;
    info!("Created {name} with {} tracks", uris.len());
    session.record_created(url.clone());
    Ok(url)
}
