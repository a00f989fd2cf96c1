use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Quit,
    ToggleHelp,
    NavigateUp,
    NavigateDown,
    Back,
    EditUrl,
    UrlInput(char),
    UrlBackspace,
    UrlClear,
    UrlSubmit,
    ToggleMood,
    Analyze,
    CreatePlaylist,
    ConfirmCreate,
    OpenCreated,
    Reset,
    SwitchScreen(u8),
}

pub fn map_key_to_action(key: KeyEvent, editing: bool) -> Option<UserAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UserAction::Quit);
    }

    if editing {
        return match key.code {
            KeyCode::Esc => Some(UserAction::Back),
            KeyCode::Enter => Some(UserAction::UrlSubmit),
            KeyCode::Backspace => Some(UserAction::UrlBackspace),
            KeyCode::Tab => Some(UserAction::ToggleMood),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UserAction::UrlClear)
            }
            KeyCode::Char(c) => Some(UserAction::UrlInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(UserAction::Quit),
        KeyCode::Char('?') => Some(UserAction::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => Some(UserAction::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UserAction::NavigateDown),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('n') => Some(UserAction::Back),
        KeyCode::Char('i') | KeyCode::Char('/') => Some(UserAction::EditUrl),
        KeyCode::Tab | KeyCode::Char('m') => Some(UserAction::ToggleMood),
        KeyCode::Enter | KeyCode::Char('a') => Some(UserAction::Analyze),
        KeyCode::Char('c') => Some(UserAction::CreatePlaylist),
        KeyCode::Char('y') => Some(UserAction::ConfirmCreate),
        KeyCode::Char('o') => Some(UserAction::OpenCreated),
        KeyCode::Char('r') => Some(UserAction::Reset),
        KeyCode::Char('1') => Some(UserAction::SwitchScreen(1)),
        KeyCode::Char('2') => Some(UserAction::SwitchScreen(2)),
        _ => None,
    }
}
