use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Section;
use crate::ops::{mutate, normalize};
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let action = app.confirm_action.take();
            app.mode = Mode::Navigate;
            if let Some(action) = action {
                match action {
                    ConfirmAction::DeleteSection { key } => {
                        confirm_delete_section(app, &key);
                    }
                    ConfirmAction::DeleteProject { id } => {
                        confirm_delete_project(app, &id);
                    }
                    ConfirmAction::DeleteStatus { index } => {
                        confirm_delete_status(app, index);
                    }
                }
            }
        }

        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm_action = None;
            app.mode = Mode::Navigate;
        }

        _ => {}
    }
}

fn confirm_delete_section(app: &mut App, key: &str) {
    let descendants = app
        .ws
        .sections
        .lookup(key)
        .map(Section::subtree_len)
        .unwrap_or(0)
        .saturating_sub(1);
    if !mutate::delete(&mut app.ws.sections, key) {
        return;
    }
    app.status_message = Some(if descendants == 0 {
        format!("deleted {}", key)
    } else {
        format!("deleted {} and {} descendants", key, descendants)
    });
    app.status_is_error = false;
    app.commit();
    app.clamp_panel_cursor();
}

fn confirm_delete_project(app: &mut App, id: &str) {
    let name = app
        .ws
        .project_by_id(id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let was_current = app.ws.current_project_id.as_deref() == Some(id);
    if !app.ws.remove_project(id) {
        return;
    }
    // Deleting the current project falls back to the first remaining,
    // run through the load pipeline like any other switch
    if was_current {
        app.panels.remove(id);
        if let Some(next) = app.ws.current_project_id.clone() {
            normalize::switch_project(&mut app.ws, &next);
        }
        app.restore_panel_state();
    }
    app.status_message = Some(format!("deleted {}", name));
    app.status_is_error = false;
    app.save();
    if app.projects_cursor >= app.ws.projects.len() {
        app.projects_cursor = app.ws.projects.len().saturating_sub(1);
    }
}

fn confirm_delete_status(app: &mut App, index: usize) {
    let Some(status) = app.ws.statuses.get(index) else {
        return;
    };
    if !app.ws.statuses.remove_at(index) {
        return;
    }
    let still_used = app
        .ws
        .sections
        .iter()
        .filter(|(s, _)| s.status == status.name)
        .count();
    app.status_message = Some(if still_used > 0 {
        format!("removed {} ({} sections still use it)", status.name, still_used)
    } else {
        format!("removed {}", status.name)
    });
    app.status_is_error = false;
    app.commit();
    if app.statuses_cursor >= app.ws.statuses.len() {
        app.statuses_cursor = app.ws.statuses.len().saturating_sub(1);
    }
}
