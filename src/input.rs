use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    match app.mode {
        AppMode::Normal     => handle_normal_mode(app, key),
        AppMode::Help       => handle_help_mode(app, key),
        AppMode::EditFormat => handle_format_mode(app, key),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.should_quit = true,

        KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') => app.mode = AppMode::Help,

        // ── F2 / f — edit the label template ──
        KeyCode::F(2) | KeyCode::Char('f') => app.begin_format_edit(),

        // ── r — CPUs may have been hot-(un)plugged ──
        KeyCode::Char('r') => {
            app.reconfigure();
            app.on_tick();
        }

        KeyCode::Char('s') => app.save_config(),

        KeyCode::Char('z') | KeyCode::Char('Z') => app.paused = !app.paused,

        _ => {}
    }
}

// ── Help ────────────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.mode = AppMode::Normal;
        }
        KeyCode::F(10) => app.should_quit = true,
        _ => {}
    }
}

// ── Format entry ────────────────────────────────────────────────────────

fn handle_format_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_format_edit(),
        KeyCode::Enter => app.apply_format_edit(),
        KeyCode::Backspace => {
            app.format_input.pop();
        }
        KeyCode::Char(c) => app.format_input.push(c),
        KeyCode::F(10) => app.should_quit = true,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FreqConfig;
    use std::fs;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn test_app() -> (TempDir, App) {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("online"), "0").unwrap();
        let app = App::new(FreqConfig::default(), None, tmp.path().to_path_buf());
        (tmp, app)
    }

    #[test]
    fn test_quit_keys() {
        let (_tmp, mut app) = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let (_tmp, mut app) = test_app();
        handle_input(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_a_template() {
        let (_tmp, mut app) = test_app();
        app.reconfigure();
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.mode, AppMode::EditFormat);

        // 'q' is text here, not quit
        for _ in 0.."$L: $F".len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "q$N".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.config.template().as_str(), "q$N");
    }

    #[test]
    fn test_help_toggle() {
        let (_tmp, mut app) = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_pause_toggle() {
        let (_tmp, mut app) = test_app();
        press(&mut app, KeyCode::Char('z'));
        assert!(app.paused);
        press(&mut app, KeyCode::Char('z'));
        assert!(!app.paused);
    }
}
