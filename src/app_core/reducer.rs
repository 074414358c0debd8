//! Event reducer for the terminal UI.
//!
//! The native runtime converts crossterm events to [`AppKeyEvent`] /
//! [`AppMouseEvent`] and passes the current clock reading along, so the notice
//! deadlines stay deterministic under test.
//!
//! Precedence: a pending capacity alert swallows everything until it is
//! acknowledged, then the add form, then the help overlay, then the notice
//! overlay (mouse only), then the panes.

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::AppState;
use crate::model::ListKind;

pub const SCROLL_LINES: u16 = 1;

/// Returns the pane under the given cell, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<ListKind> {
    app.pane_areas
        .iter()
        .find(|(area, _)| area.contains((column, row).into()))
        .map(|(_, list)| *list)
}

pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent, now_ms: u64) {
    let code = event.code;
    let ctrl = event.ctrl;

    if ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.alert_pending() {
        if matches!(
            code,
            AppKeyCode::Enter | AppKeyCode::Esc | AppKeyCode::Char(' ')
        ) {
            app.acknowledge_alert();
        }
        return;
    }

    if app.form.is_some() {
        handle_form_key(app, event);
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match code {
        AppKeyCode::Char('q') => app.should_quit = true,
        AppKeyCode::Char('?') => app.show_help = true,
        AppKeyCode::Char('a') => app.open_form(),
        AppKeyCode::Tab | AppKeyCode::BackTab => app.focus_other_pane(),
        AppKeyCode::Char('1') => app.focus(ListKind::Watchlist),
        AppKeyCode::Char('2') => app.focus(ListKind::TopFive),
        AppKeyCode::Up | AppKeyCode::Char('k') => app.move_selection(-1),
        AppKeyCode::Down | AppKeyCode::Char('j') => app.move_selection(1),
        AppKeyCode::Left | AppKeyCode::Char('h') => app.move_button(-1),
        AppKeyCode::Right | AppKeyCode::Char('l') => app.move_button(1),
        AppKeyCode::PageUp => app.move_selection(-5),
        AppKeyCode::PageDown => app.move_selection(5),
        AppKeyCode::Home => app.select_first(),
        AppKeyCode::End => app.select_last(),
        AppKeyCode::Enter | AppKeyCode::Char(' ') => app.press_selected(now_ms),
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, event: AppKeyEvent) {
    let code = event.code;
    let ctrl = event.ctrl;

    match code {
        AppKeyCode::Esc => {
            app.form = None;
            return;
        }
        AppKeyCode::Enter => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };
    match code {
        AppKeyCode::Tab | AppKeyCode::Down => form.focus_next(),
        AppKeyCode::BackTab | AppKeyCode::Up => form.focus_prev(),
        AppKeyCode::Char('u') if ctrl => form.focused_input_mut().clear(),
        AppKeyCode::Char('w') if ctrl => form.focused_input_mut().delete_word(),
        AppKeyCode::Char('a') if ctrl => form.focused_input_mut().move_to_start(),
        AppKeyCode::Char('e') if ctrl => form.focused_input_mut().move_to_end(),
        AppKeyCode::Char(c) if !ctrl => form.focused_input_mut().insert_char(c),
        AppKeyCode::Backspace => form.focused_input_mut().backspace(),
        AppKeyCode::Delete => form.focused_input_mut().delete(),
        AppKeyCode::Left => form.focused_input_mut().move_left(),
        AppKeyCode::Right => form.focused_input_mut().move_right(),
        AppKeyCode::Home => form.focused_input_mut().move_to_start(),
        AppKeyCode::End => form.focused_input_mut().move_to_end(),
        _ => {}
    }
}

/// Handles a mouse event. Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent, now_ms: u64) -> bool {
    let column = event.column;
    let row = event.row;
    let clicked = event.kind == AppMouseKind::LeftDown;

    if app.alert_pending() {
        if clicked
            && let Some(ok) = app.alert_ok_area
            && ok.contains((column, row).into())
        {
            app.acknowledge_alert();
            return true;
        }
        return false;
    }

    if app.form.is_some() {
        return false;
    }

    if app.show_help {
        if clicked {
            app.show_help = false;
            return true;
        }
        return false;
    }

    // The notice overlay covers the page: clicks never reach the panes while
    // it is up, and only clicks outside its content box close it.
    if app.notice_visible() {
        if !clicked {
            return false;
        }
        let inside = app
            .notice_content_area
            .is_some_and(|area| area.contains((column, row).into()));
        return app.shelf.click_modal(inside);
    }

    match event.kind {
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
            let Some(list) = pane_at(app, column, row) else {
                return false;
            };
            let section = app.section_mut(list);
            for _ in 0..SCROLL_LINES {
                if event.kind == AppMouseKind::ScrollDown {
                    section.scroll.scroll_down();
                } else {
                    section.scroll.scroll_up();
                }
            }
            section.follow_selection = false;
            true
        }
        AppMouseKind::LeftDown => {
            if let Some(hit) = app
                .button_hits
                .iter()
                .find(|hit| hit.area.contains((column, row).into()))
                .copied()
            {
                app.focus(hit.list);
                let section = app.section_mut(hit.list);
                section.selected = Some(hit.box_index);
                section.button = hit.button_index;
                app.clamp_selection(hit.list);
                app.press_selected(now_ms);
                return true;
            }

            if let Some(hit) = app
                .box_hits
                .iter()
                .find(|hit| hit.area.contains((column, row).into()))
                .copied()
            {
                app.focus(hit.list);
                let section = app.section_mut(hit.list);
                if section.selected != Some(hit.box_index) {
                    section.selected = Some(hit.box_index);
                    section.button = 0;
                }
                app.clamp_selection(hit.list);
                return true;
            }

            if let Some(list) = pane_at(app, column, row)
                && list != app.focused
            {
                app.focus(list);
                return true;
            }
            false
        }
    }
}
