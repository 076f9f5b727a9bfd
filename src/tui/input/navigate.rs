use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::{mutate, normalize};
use crate::tui::app::{App, ConfirmAction, EditTarget, Mode, View};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc, plus scroll keys
    if app.show_help {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                app.show_help = false;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                app.help_scroll = app.help_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Char('g') => {
                app.help_scroll = 0;
            }
            KeyCode::Char('G') => {
                app.help_scroll = usize::MAX;
            }
            _ => {}
        }
        return;
    }

    // Clear any transient status message on keypress
    app.status_message = None;
    app.status_is_error = false;

    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }

        // Help overlay (? reports as NONE or SHIFT depending on terminal)
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            app.help_scroll = 0;
        }

        // View switching
        (KeyModifiers::NONE, KeyCode::Tab) => {
            switch_view(app, 1);
        }
        (KeyModifiers::SHIFT, KeyCode::BackTab) => {
            switch_view(app, -1);
        }

        // Cursor movement: up/down
        (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
            move_cursor(app, -1);
        }
        (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
            move_cursor(app, 1);
        }

        // Jump to top: g or Home
        (KeyModifiers::NONE, KeyCode::Char('g')) | (_, KeyCode::Home) => {
            jump_to_top(app);
        }

        // Jump to bottom: G or End
        (KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
            jump_to_bottom(app);
        }

        // Collapse the section under the cursor, or step to its parent
        (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h')) => {
            if app.view == View::Panel {
                collapse_or_parent(app);
            }
        }

        // Expand, or step into the first child
        (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l')) => {
            if app.view == View::Panel {
                expand_or_first_child(app);
            }
        }

        // Cycle the status of the section under the cursor
        (KeyModifiers::NONE, KeyCode::Char(' ') | KeyCode::Char('s')) => {
            if app.view == View::Panel {
                cycle_status(app);
            }
        }

        // Rename section or project
        (KeyModifiers::NONE, KeyCode::Char('r')) => match app.view {
            View::Panel => begin_section_rename(app),
            View::Projects => begin_project_rename(app),
            View::Statuses => {}
        },

        // Rekey section
        (KeyModifiers::SHIFT, KeyCode::Char('K')) => {
            if app.view == View::Panel {
                begin_section_rekey(app);
            }
        }

        // Add child section or new status
        (KeyModifiers::NONE, KeyCode::Char('a')) => match app.view {
            View::Panel => begin_add_child(app),
            View::Statuses => begin_status_add(app),
            View::Projects => {}
        },

        // Add sibling after the cursor
        (KeyModifiers::SHIFT, KeyCode::Char('A')) => {
            if app.view == View::Panel {
                begin_add_sibling(app);
            }
        }

        // Add root section
        (KeyModifiers::NONE, KeyCode::Char('o')) => {
            if app.view == View::Panel {
                begin_add_root(app);
            }
        }

        // New empty project
        (KeyModifiers::NONE, KeyCode::Char('n')) => {
            if app.view == View::Projects {
                begin_new_project(app);
            }
        }

        // Edit status name and color
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            if app.view == View::Statuses {
                begin_status_edit(app);
            }
        }

        // Move mode: pick a swap target
        (KeyModifiers::NONE, KeyCode::Char('m')) => {
            if app.view == View::Panel {
                begin_move(app);
            }
        }

        // Delete under confirmation
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            begin_delete(app);
        }

        // Switch to the selected project
        (KeyModifiers::NONE, KeyCode::Enter) => {
            if app.view == View::Projects {
                switch_to_selected_project(app);
            }
        }

        _ => {}
    }
}

fn view_len(app: &App) -> usize {
    match app.view {
        View::Panel => app.flatten().len(),
        View::Projects => app.ws.projects.len(),
        View::Statuses => app.ws.statuses.len(),
    }
}

pub(super) fn move_cursor(app: &mut App, delta: i32) {
    let len = view_len(app);
    if len == 0 {
        return;
    }
    let cursor = match app.view {
        View::Panel => &mut app.panel_cursor,
        View::Projects => &mut app.projects_cursor,
        View::Statuses => &mut app.statuses_cursor,
    };
    if delta < 0 {
        *cursor = cursor.saturating_sub(delta.unsigned_abs() as usize);
    } else {
        *cursor = (*cursor + delta as usize).min(len - 1);
    }
}

pub(super) fn jump_to_top(app: &mut App) {
    match app.view {
        View::Panel => app.panel_cursor = 0,
        View::Projects => app.projects_cursor = 0,
        View::Statuses => app.statuses_cursor = 0,
    }
}

pub(super) fn jump_to_bottom(app: &mut App) {
    let len = view_len(app);
    if len == 0 {
        return;
    }
    match app.view {
        View::Panel => app.panel_cursor = len - 1,
        View::Projects => app.projects_cursor = len - 1,
        View::Statuses => app.statuses_cursor = len - 1,
    }
}

pub(super) fn switch_view(app: &mut App, direction: i32) {
    let order = [View::Panel, View::Projects, View::Statuses];
    let pos = order.iter().position(|v| *v == app.view).unwrap_or(0);
    let next = (pos as i32 + direction).rem_euclid(order.len() as i32) as usize;
    app.view = order[next];
}

/// Collapse the current section, or move the cursor to its parent when
/// it is already collapsed (or a leaf)
pub(super) fn collapse_or_parent(app: &mut App) {
    let rows = app.flatten();
    let Some(row) = rows.get(app.panel_cursor) else {
        return;
    };
    if row.child_count > 0 && !row.is_collapsed {
        mutate::toggle_collapse(&mut app.ws.sections, &row.key);
        app.commit();
    } else if row.depth > 0 {
        let parent_depth = row.depth - 1;
        for i in (0..app.panel_cursor).rev() {
            if rows[i].depth == parent_depth {
                app.panel_cursor = i;
                break;
            }
        }
    }
}

/// Expand the current section, or move into its first child when it is
/// already expanded
pub(super) fn expand_or_first_child(app: &mut App) {
    let rows = app.flatten();
    let Some(row) = rows.get(app.panel_cursor) else {
        return;
    };
    if row.is_collapsed {
        mutate::toggle_collapse(&mut app.ws.sections, &row.key);
        app.commit();
    } else if row.child_count > 0 && app.panel_cursor + 1 < rows.len() {
        app.panel_cursor += 1;
    }
}

/// Advance the cursor section to the next status in palette order.
/// Unset and unknown statuses start the cycle at the first status.
pub(super) fn cycle_status(app: &mut App) {
    if app.ws.statuses.is_empty() {
        app.status_message = Some("no statuses defined".to_string());
        app.status_is_error = true;
        return;
    }
    let Some(key) = app.current_key() else {
        return;
    };
    let current = app
        .ws
        .sections
        .lookup(&key)
        .map(|s| s.status.clone())
        .unwrap_or_default();
    let next_index = match app.ws.statuses.rank(&current) {
        Some(rank) => (rank + 1) % app.ws.statuses.len(),
        None => 0,
    };
    let Some(next) = app.ws.statuses.get(next_index) else {
        return;
    };
    mutate::set_status(&mut app.ws.sections, &key, &next.name);
    app.commit();
}

fn begin_edit(app: &mut App, target: EditTarget, initial: &str) {
    app.mode = Mode::Edit;
    app.edit_buffer = initial.to_string();
    app.edit_cursor = app.edit_buffer.len();
    app.edit_target = Some(target);
}

pub(super) fn begin_section_rename(app: &mut App) {
    let rows = app.flatten();
    let Some(row) = rows.get(app.panel_cursor) else {
        return;
    };
    let key = row.key.clone();
    let name = row.name.clone();
    begin_edit(app, EditTarget::RenameSection { key }, &name);
}

pub(super) fn begin_section_rekey(app: &mut App) {
    let rows = app.flatten();
    let Some(row) = rows.get(app.panel_cursor) else {
        return;
    };
    let key = row.key.clone();
    begin_edit(app, EditTarget::RekeySection { key: key.clone() }, &key);
}

pub(super) fn begin_add_child(app: &mut App) {
    let Some(parent) = app.current_key() else {
        return;
    };
    begin_edit(app, EditTarget::AddChild { parent }, "");
}

pub(super) fn begin_add_sibling(app: &mut App) {
    let Some(after) = app.current_key() else {
        return;
    };
    begin_edit(app, EditTarget::AddSibling { after }, "");
}

pub(super) fn begin_add_root(app: &mut App) {
    begin_edit(app, EditTarget::AddRoot, "");
}

pub(super) fn begin_move(app: &mut App) {
    let Some(key) = app.current_key() else {
        return;
    };
    app.move_source = Some(key);
    app.mode = Mode::Move;
}

pub(super) fn begin_delete(app: &mut App) {
    match app.view {
        View::Panel => {
            let Some(key) = app.current_key() else {
                return;
            };
            app.confirm_action = Some(ConfirmAction::DeleteSection { key });
            app.mode = Mode::Confirm;
        }
        View::Projects => {
            let Some(project) = app.ws.projects.get(app.projects_cursor) else {
                return;
            };
            app.confirm_action = Some(ConfirmAction::DeleteProject {
                id: project.id.clone(),
            });
            app.mode = Mode::Confirm;
        }
        View::Statuses => {
            if app.statuses_cursor >= app.ws.statuses.len() {
                return;
            }
            app.confirm_action = Some(ConfirmAction::DeleteStatus {
                index: app.statuses_cursor,
            });
            app.mode = Mode::Confirm;
        }
    }
}

pub(super) fn switch_to_selected_project(app: &mut App) {
    let Some(project) = app.ws.projects.get(app.projects_cursor) else {
        return;
    };
    let id = project.id.clone();
    if app.ws.current_project_id.as_deref() == Some(id.as_str()) {
        app.view = View::Panel;
        return;
    }
    app.stash_panel_state();
    normalize::switch_project(&mut app.ws, &id);
    app.save();
    app.restore_panel_state();
    app.view = View::Panel;
    let name = app
        .ws
        .current_project()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    app.status_message = Some(format!("switched to {}", name));
}

pub(super) fn begin_project_rename(app: &mut App) {
    let Some(project) = app.ws.projects.get(app.projects_cursor) else {
        return;
    };
    let id = project.id.clone();
    let name = project.name.clone();
    begin_edit(app, EditTarget::RenameProject { id }, &name);
}

pub(super) fn begin_new_project(app: &mut App) {
    begin_edit(app, EditTarget::NewProject, "");
}

pub(super) fn begin_status_add(app: &mut App) {
    begin_edit(app, EditTarget::NewStatusName, "");
}

pub(super) fn begin_status_edit(app: &mut App) {
    let Some(status) = app.ws.statuses.get(app.statuses_cursor) else {
        return;
    };
    begin_edit(
        app,
        EditTarget::StatusName {
            index: app.statuses_cursor,
        },
        &status.name,
    );
}
