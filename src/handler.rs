use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use pathtree::tree::ClickModifiers;

use crate::app::{App, AppMode};
use crate::components::help::HelpOverlay;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    match app.mode {
        AppMode::Normal => handle_normal_key(app, key),
        AppMode::Search => handle_search_key(app, key),
        AppMode::Help => handle_help_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let extend = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.panel_mut().move_cursor(1, extend),
        KeyCode::Char('k') | KeyCode::Up => app.panel_mut().move_cursor(-1, extend),
        KeyCode::Char(' ') => app.panel_mut().toggle_cursor_selection(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            app.panel_mut().activate_cursor();
        }
        KeyCode::Char('h') | KeyCode::Left => app.panel_mut().collapse_or_parent(),
        KeyCode::Char('E') => {
            if !app.panel_mut().expand_all() {
                app.set_status_message("Folders are all open while searching".to_string());
            }
        }
        KeyCode::Char('C') => {
            if !app.panel_mut().collapse_all() {
                app.set_status_message("Folders are all open while searching".to_string());
            }
        }
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Esc => app.panel_mut().click_outside(),
        KeyCode::Tab => app.next_panel(),
        KeyCode::F(5) => app.reload_all(),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Backspace => app.search_delete_char(),
        KeyCode::Left => app.search_cursor_left(),
        KeyCode::Right => app.search_cursor_right(),
        KeyCode::Down => app.panel_mut().move_cursor(1, false),
        KeyCode::Up => app.panel_mut().move_cursor(-1, false),
        KeyCode::Char(c) => app.search_input_char(c),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => {
            let max = HelpOverlay::total_lines().saturating_sub(1);
            app.help_scroll = (app.help_scroll + 1).min(max);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// Map held keys to click modifiers. Ctrl and Super (cmd) both toggle.
pub fn click_modifiers(modifiers: KeyModifiers) -> ClickModifiers {
    ClickModifiers {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        toggle: modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER),
    }
}

/// Handle a mouse event.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode == AppMode::Help {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.click_at(mouse.column, mouse.row, click_modifiers(mouse.modifiers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PanelSource;
    use pathtree::source::WalkOptions;
    use ratatui::layout::Rect;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        File::create(dir.path().join("src").join("main.rs")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        let app = App::new(vec![(
            "Files".to_string(),
            PanelSource::Walk {
                root: dir.path().to_path_buf(),
                options: WalkOptions::default(),
            },
        )])
        .unwrap();
        (dir, app)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_event(app, KeyEvent::new(code, modifiers));
    }

    fn click(app: &mut App, column: u16, row: u16, modifiers: KeyModifiers) {
        handle_mouse_event(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers,
            },
        );
    }

    #[test]
    fn j_and_k_move_and_select() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.panel().selected_paths(), vec!["a.txt"]);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.panel().selected_paths(), vec!["src"]);
    }

    #[test]
    fn shift_arrows_extend_range() {
        let (_dir, mut app) = setup_app();
        press_with(&mut app, KeyCode::Down, KeyModifiers::SHIFT);
        press_with(&mut app, KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(app.panel().selected_paths(), vec!["src", "a.txt", "b.txt"]);
    }

    #[test]
    fn space_toggles_and_esc_clears() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.panel().selected_paths(), vec!["src"]);
        press(&mut app, KeyCode::Esc);
        assert!(app.panel().selected_paths().is_empty());
    }

    #[test]
    fn enter_and_h_expand_and_collapse() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.panel().visible_order()[1], "src/main.rs");
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.panel().rows().len(), 3);
    }

    #[test]
    fn expand_all_is_refused_while_searching() {
        let (_dir, mut app) = setup_app();
        app.panel_mut().set_query("main");
        press(&mut app, KeyCode::Char('C'));
        assert!(app.status_message.is_some());
        assert_eq!(app.panel().visible_order(), ["src", "src/main.rs"]);
    }

    #[test]
    fn search_mode_captures_letters() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.panel().query(), "q");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.panel().visible_order(), ["b.txt"]);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.panel().query(), "");
    }

    #[test]
    fn help_opens_scrolls_and_closes() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_scroll, 1);
        // Keys do not reach the tree while help is open.
        assert!(app.panel().selected_paths().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let (_dir, mut app) = setup_app();
        press(&mut app, KeyCode::Char('/'));
        press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn click_modifier_mapping() {
        assert_eq!(click_modifiers(KeyModifiers::NONE), ClickModifiers::PLAIN);
        assert_eq!(click_modifiers(KeyModifiers::SHIFT), ClickModifiers::SHIFT);
        assert_eq!(click_modifiers(KeyModifiers::CONTROL), ClickModifiers::TOGGLE);
        assert_eq!(click_modifiers(KeyModifiers::SUPER), ClickModifiers::TOGGLE);
        let both = click_modifiers(KeyModifiers::SHIFT | KeyModifiers::CONTROL);
        assert!(both.shift && both.toggle);
    }

    #[test]
    fn mouse_clicks_select_with_modifiers() {
        let (_dir, mut app) = setup_app();
        app.tree_area = Rect::new(0, 0, 40, 10);
        click(&mut app, 15, 0, KeyModifiers::NONE);
        click(&mut app, 15, 2, KeyModifiers::CONTROL);
        assert_eq!(app.panel().selected_paths(), vec!["src", "b.txt"]);
        click(&mut app, 15, 7, KeyModifiers::NONE);
        assert!(app.panel().selected_paths().is_empty());
    }

    #[test]
    fn mouse_ignored_while_help_open() {
        let (_dir, mut app) = setup_app();
        app.tree_area = Rect::new(0, 0, 40, 10);
        app.toggle_help();
        click(&mut app, 15, 0, KeyModifiers::NONE);
        assert!(app.panel().selected_paths().is_empty());
    }
}
