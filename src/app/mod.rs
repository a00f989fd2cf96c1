pub mod state;
pub mod workflow;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::time;
use tracing::{info, warn};

use moodlist::mood::MoodEngine;

use crate::{
    app::state::{ActiveScreen, AppState, Notification},
    cache::TokenCache,
    config::Config,
    events::{map_key_to_action, UserAction},
    spotify::{
        auth::wait_for_auth_code, build_spotify_client, complete_auth,
        playlists::SpotifyPlaylists, PlaylistService,
    },
};

const TICK_MS: u64 = 80;

/// Spotify work triggered by a key press. Run after a redraw so the busy banner shows.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Job {
    Analyze,
    CreatePlaylist,
}

pub struct App {
    pub state: AppState,
    config: Config,
    cache: Arc<TokenCache>,
    engine: MoodEngine,
}

impl App {
    pub fn new(config: Config, cache: Arc<TokenCache>, engine: MoodEngine) -> Self {
        let state = AppState {
            dataset_size: engine.dataset().len(),
            ..AppState::default()
        };
        App { state, config, cache, engine }
    }

    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> Result<()> {
        // ── Spotify Auth ─────────────────────────────────────────────────────
        let (spotify_arc, auth_url) = build_spotify_client(&self.config, &self.cache).await?;

        if let Some(ref url) = auth_url {
            self.state.auth_url = Some(url.clone());
            if let Err(e) = open::that(url) {
                warn!("Could not open browser: {e}");
            }

            terminal.draw(|f| crate::ui::render(f, &self.state))?;

            let state = spotify_arc.lock().await.oauth.state.clone();
            let code = wait_for_auth_code(&self.config.redirect_uri, &state).await?;
            complete_auth(spotify_arc.clone(), &code, &self.cache).await?;
        }

        self.state.is_authenticated = true;
        self.state.auth_url = None;
        self.state.set_notification(Notification::info("Connected to Spotify ✓"));
        info!("Authenticated successfully");

        let service = SpotifyPlaylists::new(spotify_arc);

        // ── Main event loop ───────────────────────────────────────────────────
        let mut tick_interval = time::interval(Duration::from_millis(TICK_MS));
        let mut event_stream = EventStream::new();

        loop {
            terminal.draw(|f| crate::ui::render(f, &self.state))?;

            let job = tokio::select! {
                _ = tick_interval.tick() => {
                    self.state.tick = self.state.tick.wrapping_add(1);
                    self.state.tick_notification();
                    None
                }
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => map_key_to_action(key, self.state.input.editing)
                        .and_then(|action| self.handle_action(action)),
                    Some(Ok(Event::Paste(text))) => {
                        self.paste(&text);
                        None
                    }
                    _ => None,
                },
            };

            if let Some(job) = job {
                self.state.busy = Some(match job {
                    Job::Analyze => "🎧 Fetching songs...".to_string(),
                    Job::CreatePlaylist => "🛠 Creating playlist...".to_string(),
                });
                terminal.draw(|f| crate::ui::render(f, &self.state))?;
                self.run_job(job, &service).await;
                self.state.busy = None;
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn paste(&mut self, text: &str) {
        if !self.state.input.editing {
            self.state.input.editing = true;
            self.state.input.text.clear();
        }
        self.state.input.text.extend(text.chars().filter(|c| !c.is_control()));
    }

    // ── Action handler ────────────────────────────────────────────────────────
    fn handle_action(&mut self, action: UserAction) -> Option<Job> {
        match action {
            UserAction::Quit => {
                self.state.should_quit = true;
            }
            UserAction::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
            }
            UserAction::SwitchScreen(n) => {
                self.state.show_help = false;
                match n {
                    1 => self.state.navigate_to(ActiveScreen::Filtered),
                    2 => self.state.navigate_to(ActiveScreen::AllMatches),
                    _ => {}
                }
            }
            UserAction::Back => {
                if self.state.confirm_create {
                    self.state.confirm_create = false;
                } else if self.state.input.editing {
                    self.state.input.editing = false;
                } else if self.state.show_help {
                    self.state.show_help = false;
                }
            }
            UserAction::EditUrl => {
                self.state.input.editing = true;
                self.state.confirm_create = false;
            }
            UserAction::UrlInput(c) => self.state.input.text.push(c),
            UserAction::UrlBackspace => {
                self.state.input.text.pop();
            }
            UserAction::UrlClear => self.state.input.text.clear(),
            UserAction::UrlSubmit => {
                self.state.input.editing = false;
                return self.analyze_job();
            }
            UserAction::ToggleMood => {
                self.state.toggle_mood();
                let msg = format!("Mood: {}", self.state.mood);
                self.state.set_notification(Notification::info(msg));
            }
            UserAction::Analyze => return self.analyze_job(),
            UserAction::CreatePlaylist => {
                if !self.state.request_create() {
                    self.state.set_notification(Notification::error("⚠️ No tracks to add."));
                }
            }
            UserAction::ConfirmCreate => {
                if self.state.confirm_create {
                    self.state.confirm_create = false;
                    return Some(Job::CreatePlaylist);
                }
            }
            UserAction::OpenCreated => {
                if let Some(url) = self.state.session.created_playlist_url.clone() {
                    if let Err(e) = open::that(&url) {
                        warn!("Could not open browser: {e}");
                        self.state.set_notification(Notification::error(format!("Open {url} manually")));
                    }
                }
            }
            UserAction::Reset => {
                self.state.reset();
                self.state.set_notification(Notification::info("Session cleared"));
            }
            UserAction::NavigateUp => self.state.select_up(),
            UserAction::NavigateDown => self.state.select_down(),
        }
        None
    }

    fn analyze_job(&mut self) -> Option<Job> {
        if self.state.input.text.trim().is_empty() {
            self.state.set_notification(Notification::error("Enter your public Spotify playlist URL"));
            self.state.input.editing = true;
            return None;
        }
        Some(Job::Analyze)
    }

    async fn run_job(&mut self, job: Job, service: &dyn PlaylistService) {
        match job {
            Job::Analyze => {
                let url = self.state.input.text.clone();
                let mood = self.state.mood;
                match workflow::analyze_playlist(service, &self.engine, &mut self.state.session, &url, mood).await {
                    Ok(()) => {
                        self.state.selected_row = 0;
                        self.state.navigate_to(ActiveScreen::Filtered);
                        let msg = self.state.summary().unwrap_or_default();
                        self.state.set_notification(Notification::info(msg));
                    }
                    Err(e) => {
                        warn!("Analysis failed: {e:#}");
                        self.state.set_notification(Notification::error(format!("{e}")));
                    }
                }
            }
            Job::CreatePlaylist => match workflow::create_mood_playlist(service, &mut self.state.session).await {
                Ok(Some(url)) => {
                    info!("Playlist created: {url}");
                    self.state.set_notification(Notification::info("✅ Playlist created successfully! Press [o] to open"));
                }
                Ok(None) => {
                    self.state.set_notification(Notification::info("✅ Playlist created successfully!"));
                }
                Err(e) => {
                    warn!("Playlist creation failed: {e:#}");
                    self.state.set_notification(Notification::error(format!("{e}")));
                }
            },
        }
    }
}
