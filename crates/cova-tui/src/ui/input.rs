//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Any key dismisses a notification
    if app.notification.is_some() {
        app.notification = None;
        return Ok(false);
    }

    // Esc cancels a pending request before anything else
    if key.code == KeyCode::Esc && app.cancel_in_flight() {
        return Ok(false);
    }

    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => handle_quit_confirm(app, key),
        AppState::Editing => {
            handle_editing_input(app, key);
            Ok(false)
        }
        AppState::Normal => handle_normal_input(app, key),
        AppState::Quitting => Ok(true),
    }
}

fn handle_quit_confirm(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.state = AppState::Quitting;
            Ok(true)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
            Ok(false)
        }
        _ => Ok(false),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,

        // Tabs
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.select_tab(Tab::ALL[index]);
        }
        KeyCode::Right => app.select_tab(app.current_tab.next()),
        KeyCode::Left => app.select_tab(app.current_tab.prev()),

        // Session
        KeyCode::Char('a') => app.start_sign_in(),
        KeyCode::Char('l') => {
            if app.authed {
                app.logout();
            }
        }
        KeyCode::Char('r') => app.reload(),

        // Lists
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, 1),
        KeyCode::PageUp => move_selection(app, -(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => move_selection(app, PAGE_SCROLL_SIZE as isize),

        KeyCode::Enter | KeyCode::Char('e') => app.start_editing(),
        _ => {}
    }
    Ok(false)
}

fn move_selection(app: &mut App, delta: isize) {
    let (selection, len) = match app.current_tab {
        Tab::Menu => (&mut app.menu_selection, app.menu.len()),
        Tab::Bestsellers => {
            let len = app.bestsellers().len();
            (&mut app.bestseller_selection, len)
        }
        _ => return,
    };
    if len == 0 {
        return;
    }
    *selection = selection
        .saturating_add_signed(delta)
        .min(len - 1);
}

fn handle_editing_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.state = AppState::Normal;
        return;
    }

    if app.current_tab == Tab::Account && matches!(key.code, KeyCode::Left | KeyCode::Right) {
        app.toggle_auth_mode();
        return;
    }

    if key.code == KeyCode::Enter {
        let on_button = app.active_form().map(|f| f.on_button()).unwrap_or(false);
        if on_button {
            app.submit();
        } else if let Some(form) = app.active_form_mut() {
            form.next_field();
        }
        return;
    }

    if app.active_form().is_none() {
        app.state = AppState::Normal;
        return;
    }
    let Some(form) = app.active_form_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}
