use moodlist::mood::{filter::LabeledTrack, AnalysisSession, Mood};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveScreen {
    /// Only the tracks of the chosen mood; what a new playlist would contain.
    Filtered,
    /// Every matched track with its label.
    AllMatches,
}

impl Default for ActiveScreen {
    fn default() -> Self {
        ActiveScreen::Filtered
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrlInput {
    pub text: String,
    pub editing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub message: String,
    pub remaining_ticks: u8,
    pub is_error: bool,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Notification { message: msg.into(), remaining_ticks: 30, is_error: false }
    }
    pub fn error(msg: impl Into<String>) -> Self {
        Notification { message: msg.into(), remaining_ticks: 40, is_error: true }
    }
}

pub struct AppState {
    pub active_screen: ActiveScreen,
    pub previous_screen: Option<ActiveScreen>,
    pub input: UrlInput,
    pub mood: Mood,
    pub session: AnalysisSession,
    pub selected_row: usize,
    /// Set while a Spotify call is in flight; shown in place of the results.
    pub busy: Option<String>,
    pub confirm_create: bool,
    pub notification: Option<Notification>,
    pub show_help: bool,
    pub should_quit: bool,
    pub tick: u64,
    pub is_authenticated: bool,
    pub auth_url: Option<String>,
    pub dataset_size: usize,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            active_screen: ActiveScreen::Filtered,
            previous_screen: None,
            input: UrlInput { text: String::new(), editing: true },
            mood: Mood::Happy,
            session: AnalysisSession::new(),
            selected_row: 0,
            busy: None,
            confirm_create: false,
            notification: None,
            show_help: false,
            should_quit: false,
            tick: 0,
            is_authenticated: false,
            auth_url: None,
            dataset_size: 0,
        }
    }
}

impl AppState {
    pub fn navigate_to(&mut self, screen: ActiveScreen) {
        if self.active_screen != screen {
            self.previous_screen = Some(self.active_screen);
            self.active_screen = screen;
            self.selected_row = 0;
        }
    }

    pub fn set_notification(&mut self, n: Notification) {
        self.notification = Some(n);
    }

    pub fn tick_notification(&mut self) {
        if let Some(ref mut n) = self.notification {
            if n.remaining_ticks > 0 {
                n.remaining_ticks -= 1;
            } else {
                self.notification = None;
            }
        }
    }

    /// Switching mood only changes what the next analysis keeps; results on screen stay
    /// tied to the mood they were computed for.
    pub fn toggle_mood(&mut self) {
        self.mood = self.mood.toggle();
        self.confirm_create = false;
    }

    /// Rows for the active screen.
    pub fn visible_tracks(&self) -> &[LabeledTrack] {
        match (&self.session.analysis, self.active_screen) {
            (Some(a), ActiveScreen::Filtered) => &a.filtered,
            (Some(a), ActiveScreen::AllMatches) => &a.labeled,
            (None, _) => &[],
        }
    }

    pub fn select_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let max = self.visible_tracks().len().saturating_sub(1);
        if self.selected_row < max {
            self.selected_row += 1;
        }
    }

    /// One-line outcome of the last analysis.
    pub fn summary(&self) -> Option<String> {
        let a = self.session.analysis.as_ref()?;
        if a.total() == 0 {
            return Some("😕 No songs matched with the dataset.".to_string());
        }
        Some(format!(
            "🎯 Found {} '{}' songs out of {} total.",
            a.selected(),
            a.mood,
            a.total()
        ))
    }

    /// Ask for confirmation before creating a playlist. Returns false when there is nothing to create.
    pub fn request_create(&mut self) -> bool {
        self.confirm_create = self.session.can_create();
        self.confirm_create
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.input = UrlInput { text: String::new(), editing: true };
        self.selected_row = 0;
        self.confirm_create = false;
    }
}
