//! Keyboard input handling for the TUI.
//!
//! Input handlers only change UI state and queue network work; the main
//! loop runs queued actions after the next redraw.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use gummyte_core::RecordKind;

use crate::app::{can_add_password_char, App, AppState, LoginFocus, PendingAction, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Nothing is accepted while a request is outstanding
    if app.is_busy() {
        return Ok(false);
    }

    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('1') => app.switch_tab(RecordKind::Signups),
        KeyCode::Char('2') => app.switch_tab(RecordKind::Messages),
        KeyCode::Left => app.switch_tab(app.current_tab.prev()),
        KeyCode::Right => app.switch_tab(app.current_tab.next()),
        KeyCode::Char('r') | KeyCode::Char('u') => app.queue(PendingAction::Refresh),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        _ => {}
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Up | KeyCode::Tab | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => {
            app.login_focus = LoginFocus::Button;
            app.queue(PendingAction::Login);
        }
        KeyCode::Backspace => {
            if app.login_focus == LoginFocus::Password {
                app.login_password.pop();
            }
        }
        KeyCode::Char(c) => {
            if app.login_focus == LoginFocus::Password
                && can_add_password_char(app.login_password.chars().count(), c)
            {
                app.login_password.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use gummyte_core::MemoryTokenStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default(), MemoryTokenStore::new()).expect("app builds")
    }

    #[test]
    fn test_login_typing_and_submit() {
        let mut app = app();
        app.start_login();

        for c in "abc".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.login_password, "ab");

        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.pending(), Some(PendingAction::Login));

        // A second submit is swallowed while the first is outstanding
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.login_password, "ab");
    }

    #[test]
    fn test_escape_on_login_quits() {
        let mut app = app();
        app.start_login();
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = app();
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))).unwrap());
        assert_eq!(app.state, AppState::Normal);
        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
    }

    #[test]
    fn test_tab_keys_queue_refresh() {
        let mut app = app();
        app.current_tab = RecordKind::Signups;

        handle_input(&mut app, key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.current_tab, RecordKind::Messages);
        assert_eq!(app.pending(), Some(PendingAction::Refresh));
    }

    #[test]
    fn test_logout_key_opens_login() {
        let mut app = app();
        handle_input(&mut app, key(KeyCode::Char('l'))).unwrap();
        assert_eq!(app.state, AppState::LoggingIn);
    }
}
