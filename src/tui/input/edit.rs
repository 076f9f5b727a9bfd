use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Project, Section, SectionTree, pastel_color};
use crate::ops::mutate;
use crate::tui::app::{App, EditTarget, Mode, View};
use crate::tui::theme;
use crate::util::unicode;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm edit
        (_, KeyCode::Enter) => {
            confirm_edit(app);
        }

        // Cancel edit
        (_, KeyCode::Esc) => {
            cancel_edit(app);
        }

        // Home / Ctrl+A: jump to start of line
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = 0;
        }

        // End / Ctrl+E: jump to end of line
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = app.edit_buffer.len();
        }

        // Kill to start of line: Ctrl+U
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => {
            if app.edit_cursor > 0 {
                app.edit_buffer.drain(..app.edit_cursor);
                app.edit_cursor = 0;
            }
        }

        // Cursor movement: single grapheme left/right
        (KeyModifiers::NONE, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = prev;
            }
        }
        (KeyModifiers::NONE, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_cursor = next;
            }
        }

        // Ctrl+Left/Right: jump to start/end of line
        (m, KeyCode::Left) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = 0;
        }
        (m, KeyCode::Right) if m.contains(KeyModifiers::CONTROL) => {
            app.edit_cursor = app.edit_buffer.len();
        }

        // Home/End keys
        (_, KeyCode::Home) => {
            app.edit_cursor = 0;
        }
        (_, KeyCode::End) => {
            app.edit_cursor = app.edit_buffer.len();
        }

        // Word movement (Alt+arrow; Alt+B/F for terminals that translate)
        (m, KeyCode::Left) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Right) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_right(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Char('b')) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
        }
        (m, KeyCode::Char('f')) if m.contains(KeyModifiers::ALT) => {
            app.edit_cursor = unicode::word_boundary_right(&app.edit_buffer, app.edit_cursor);
        }

        // Backspace: delete the grapheme before the cursor
        (KeyModifiers::NONE, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(prev..app.edit_cursor);
                app.edit_cursor = prev;
            }
        }

        // Word backspace (Alt or Ctrl)
        (m, KeyCode::Backspace)
            if m.contains(KeyModifiers::ALT) || m.contains(KeyModifiers::CONTROL) =>
        {
            let new_pos = unicode::word_boundary_left(&app.edit_buffer, app.edit_cursor);
            app.edit_buffer.drain(new_pos..app.edit_cursor);
            app.edit_cursor = new_pos;
        }

        // Delete: remove the grapheme after the cursor
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.edit_buffer, app.edit_cursor) {
                app.edit_buffer.drain(app.edit_cursor..next);
            }
        }

        // Type character
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.edit_buffer.insert(app.edit_cursor, c);
            app.edit_cursor += c.len_utf8();
        }

        _ => {}
    }
}

fn exit_edit(app: &mut App) {
    app.mode = Mode::Navigate;
    app.edit_buffer.clear();
    app.edit_cursor = 0;
    app.edit_target = None;
}

pub(super) fn cancel_edit(app: &mut App) {
    exit_edit(app);
}

/// Apply the buffer to the edit target. Two-step status edits chain
/// into the color prompt instead of leaving edit mode.
pub(super) fn confirm_edit(app: &mut App) {
    let Some(target) = app.edit_target.take() else {
        exit_edit(app);
        return;
    };
    let text = app.edit_buffer.trim().to_string();

    match target {
        EditTarget::RenameSection { key } => {
            if !text.is_empty() {
                mutate::rename(&mut app.ws.sections, &key, &text);
                app.commit();
            }
        }

        EditTarget::RekeySection { key } => {
            if !text.is_empty() && text != key {
                // Duplicate keys are legal but worth flagging
                if app.ws.sections.contains(&text) {
                    app.status_message = Some(format!("key '{}' already exists", text));
                    app.status_is_error = true;
                }
                mutate::rekey(&mut app.ws.sections, &key, &text);
                app.commit();
            }
        }

        EditTarget::AddChild { parent } => {
            if !text.is_empty() {
                // Expand a collapsed parent so the new row is visible
                if app
                    .ws
                    .sections
                    .lookup(&parent)
                    .is_some_and(|s| s.is_collapsed)
                {
                    mutate::toggle_collapse(&mut app.ws.sections, &parent);
                }
                let key = app.next_child_key(&parent);
                let section = Section::new(key.clone(), text);
                if mutate::insert_child(&mut app.ws.sections, &parent, section) {
                    app.commit();
                    move_cursor_to_key(app, &key);
                } else {
                    app.status_message = Some(format!("cannot insert '{}' at that position", key));
                    app.status_is_error = true;
                }
            }
        }

        EditTarget::AddSibling { after } => {
            if !text.is_empty() {
                let parent = app.ws.sections.parent_key(&after).map(String::from);
                let (key, inserted) = match parent {
                    Some(parent) => {
                        let key = app.next_child_key(&parent);
                        let section = Section::new(key.clone(), text);
                        let ok =
                            mutate::insert_sibling(&mut app.ws.sections, &parent, &after, section);
                        (key, ok)
                    }
                    None => {
                        let key = app.next_root_key();
                        let section = Section::new(key.clone(), text);
                        let ok = mutate::insert_root_after(&mut app.ws.sections, &after, section);
                        (key, ok)
                    }
                };
                if inserted {
                    app.commit();
                    move_cursor_to_key(app, &key);
                } else {
                    app.status_message = Some(format!("cannot insert '{}' at that position", key));
                    app.status_is_error = true;
                }
            }
        }

        EditTarget::AddRoot => {
            if !text.is_empty() {
                let key = app.next_root_key();
                mutate::insert_root(&mut app.ws.sections, Section::new(key.clone(), text));
                app.commit();
                move_cursor_to_key(app, &key);
            }
        }

        EditTarget::RenameProject { id } => {
            if !text.is_empty() && app.ws.rename_project(&id, &text) {
                app.save();
            }
        }

        EditTarget::NewProject => {
            if !text.is_empty() {
                app.stash_panel_state();
                app.ws.add_project(Project::new(&text, SectionTree::new()));
                app.ws.sections = SectionTree::new();
                app.commit();
                app.restore_panel_state();
                app.view = View::Panel;
                app.status_message = Some(format!("created project: {}", text));
            }
        }

        EditTarget::StatusName { index } => {
            if !text.is_empty() {
                // Chain into the color prompt
                let color = app
                    .ws
                    .statuses
                    .get(index)
                    .map(|s| s.color)
                    .unwrap_or_default();
                app.edit_buffer = color;
                app.edit_cursor = app.edit_buffer.len();
                app.edit_target = Some(EditTarget::StatusColor { index, name: text });
                return;
            }
        }

        EditTarget::StatusColor { index, name } => {
            if theme::parse_hex_color(&text).is_none() {
                app.status_message = Some(format!("invalid color '{}' (expected #RRGGBB)", text));
                app.status_is_error = true;
                app.edit_target = Some(EditTarget::StatusColor { index, name });
                return;
            }
            // Renaming onto another entry would merge ranks
            if let Some(existing) = app.ws.statuses.rank(&name)
                && existing != index
            {
                app.status_message = Some(format!("status '{}' already exists", name));
                app.status_is_error = true;
            } else {
                app.ws.statuses.update_at(index, &name, &text);
                app.commit();
            }
        }

        EditTarget::NewStatusName => {
            if !text.is_empty() {
                if app.ws.statuses.contains(&text) {
                    app.status_message = Some(format!("status '{}' already exists", text));
                    app.status_is_error = true;
                } else {
                    app.edit_buffer = pastel_color(app.ws.statuses.len()).to_string();
                    app.edit_cursor = app.edit_buffer.len();
                    app.edit_target = Some(EditTarget::NewStatusColor { name: text });
                    return;
                }
            }
        }

        EditTarget::NewStatusColor { name } => {
            if theme::parse_hex_color(&text).is_none() {
                app.status_message = Some(format!("invalid color '{}' (expected #RRGGBB)", text));
                app.status_is_error = true;
                app.edit_target = Some(EditTarget::NewStatusColor { name });
                return;
            }
            app.ws.statuses.push(&name, &text);
            app.commit();
            app.statuses_cursor = app.ws.statuses.len() - 1;
        }
    }

    exit_edit(app);
}

fn move_cursor_to_key(app: &mut App, key: &str) {
    if let Some(pos) = app.flatten().iter().position(|r| r.key == key) {
        app.panel_cursor = pos;
    }
}
