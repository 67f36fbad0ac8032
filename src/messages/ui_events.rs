//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The rendered screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Home,
    Search,
    Manga,
    Reader,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Navigation
    GoHome,
    GoSearch,
    GoBack,
    Refresh,

    // Query editing (search screen)
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    SubmitSearch,

    // List selection
    SelectNext,
    SelectPrev,
    Activate,

    // Reader paging
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,

    // Goto popup
    OpenGoto,
    GotoChar(char),
    GotoBackspace,
    SubmitGoto,
    CancelGoto,

    // Help popup
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
    show_goto: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    // Popups swallow everything
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_goto {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::CancelGoto),
            KeyCode::Enter => Some(UiEvent::SubmitGoto),
            KeyCode::Backspace => Some(UiEvent::GotoBackspace),
            KeyCode::Char(c) => Some(UiEvent::GotoChar(c)),
            _ => None,
        };
    }

    // Screen-independent keys (normal mode only, so they never steal
    // characters from the query editor)
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('q') => return Some(UiEvent::Quit),
            KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
            KeyCode::Char('g') => return Some(UiEvent::OpenGoto),
            KeyCode::Char('1') => return Some(UiEvent::GoHome),
            KeyCode::Char('2') => return Some(UiEvent::GoSearch),
            KeyCode::Char('r') => return Some(UiEvent::Refresh),
            KeyCode::Esc => return Some(UiEvent::GoBack),
            _ => {}
        }
    }

    match screen {
        Screen::Home => None,
        Screen::Search => handle_search_keys(key, input_mode),
        Screen::Manga => handle_manga_keys(key),
        Screen::Reader => handle_reader_keys(key),
    }
}

/// Keys for the search screen
fn handle_search_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('e') | KeyCode::Char('/') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::SubmitSearch),
            KeyCode::Up => Some(UiEvent::SelectPrev),
            KeyCode::Down => Some(UiEvent::SelectNext),
            KeyCode::Enter => Some(UiEvent::Activate),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::SubmitSearch),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

/// Keys for the title-detail screen
fn handle_manga_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Up => Some(UiEvent::SelectPrev),
        KeyCode::Down => Some(UiEvent::SelectNext),
        KeyCode::Enter => Some(UiEvent::Activate),
        KeyCode::Backspace => Some(UiEvent::GoBack),
        _ => None,
    }
}

/// Keys for the reader screen
fn handle_reader_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Right | KeyCode::Down | KeyCode::Char('n') | KeyCode::Char(' ') => {
            Some(UiEvent::NextPage)
        }
        KeyCode::Left | KeyCode::Up | KeyCode::Char('p') => Some(UiEvent::PrevPage),
        KeyCode::Home => Some(UiEvent::FirstPage),
        KeyCode::End => Some(UiEvent::LastPage),
        KeyCode::Backspace => Some(UiEvent::GoBack),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_chars_reach_the_editor_while_editing() {
        let event = key_to_ui_event(
            press(KeyCode::Char('q')),
            Screen::Search,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_enter_submits_while_editing() {
        let event = key_to_ui_event(
            press(KeyCode::Enter),
            Screen::Search,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::SubmitSearch)));
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        let event = key_to_ui_event(
            press(KeyCode::Char('s')),
            Screen::Search,
            InputMode::Normal,
            true,
            false,
        );
        assert!(matches!(event, Some(UiEvent::CloseHelp)));
    }

    #[test]
    fn test_goto_popup_collects_path() {
        let event = key_to_ui_event(
            press(KeyCode::Char('/')),
            Screen::Home,
            InputMode::Normal,
            false,
            true,
        );
        assert!(matches!(event, Some(UiEvent::GotoChar('/'))));
    }
}
