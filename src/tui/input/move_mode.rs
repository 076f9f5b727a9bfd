use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::mutate;
use crate::tui::app::{App, Mode};

use super::navigate;

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Swap with the section under the cursor
        (_, KeyCode::Enter) => {
            confirm_swap(app);
        }

        // Cancel
        (_, KeyCode::Esc) => {
            app.move_source = None;
            app.mode = Mode::Navigate;
        }

        // Pick a target
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
            navigate::move_cursor(app, -1);
        }
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
            navigate::move_cursor(app, 1);
        }
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            navigate::jump_to_top(app);
        }
        (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
            navigate::jump_to_bottom(app);
        }

        _ => {}
    }
}

fn confirm_swap(app: &mut App) {
    let source = app.move_source.take();
    app.mode = Mode::Navigate;
    let (Some(source), Some(target)) = (source, app.current_key()) else {
        return;
    };
    if source == target {
        return;
    }
    if mutate::swap(&mut app.ws.sections, &source, &target) {
        app.status_message = Some(format!("swapped {} and {}", source, target));
        app.status_is_error = false;
        app.commit();
    } else {
        app.status_message = Some(format!("cannot swap {} with {}", source, target));
        app.status_is_error = true;
    }
}
