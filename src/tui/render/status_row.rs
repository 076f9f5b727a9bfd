use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ConfirmAction, EditTarget, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Navigate => {
            if let Some(ref message) = app.status_message {
                let fg = if app.status_is_error {
                    app.theme.warning
                } else {
                    app.theme.text
                };
                with_hint(
                    app,
                    width,
                    vec![Span::styled(
                        format!(" {}", message),
                        Style::default().fg(fg).bg(bg),
                    )],
                    "? help",
                )
            } else {
                with_hint(app, width, Vec::new(), "? help")
            }
        }
        Mode::Edit => {
            // Prompt with the cursor drawn as ▌ at the insertion point
            let prompt = edit_prompt(app.edit_target.as_ref());
            let before = &app.edit_buffer[..app.edit_cursor];
            let after = &app.edit_buffer[app.edit_cursor..];
            let spans = vec![
                Span::styled(
                    format!(" {}", prompt),
                    Style::default().fg(app.theme.highlight).bg(bg),
                ),
                Span::styled(
                    before.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.highlight).bg(bg),
                ),
                Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
            ];
            with_hint(app, width, spans, "Enter confirm  Esc cancel")
        }
        Mode::Move => {
            let source = app.move_source.as_deref().unwrap_or("?");
            let spans = vec![Span::styled(
                format!(" swap {} with: pick a target row", source),
                Style::default().fg(app.theme.highlight).bg(bg),
            )];
            with_hint(app, width, spans, "Enter swap  Esc cancel")
        }
        Mode::Confirm => {
            let spans = vec![Span::styled(
                format!(" {}", confirm_prompt(app)),
                Style::default().fg(app.theme.warning).bg(bg),
            )];
            with_hint(app, width, spans, "y confirm  n cancel")
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Pad spans to full width and right-align a dim hint when it fits.
fn with_hint<'a>(app: &App, width: usize, mut spans: Vec<Span<'a>>, hint: &'a str) -> Line<'a> {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    } else if content_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width),
            Style::default().bg(bg),
        ));
    }
    Line::from(spans)
}

fn edit_prompt(target: Option<&EditTarget>) -> &'static str {
    match target {
        Some(EditTarget::RenameSection { .. }) => "rename: ",
        Some(EditTarget::RekeySection { .. }) => "key: ",
        Some(EditTarget::AddChild { .. }) => "add child: ",
        Some(EditTarget::AddSibling { .. }) => "add sibling: ",
        Some(EditTarget::AddRoot) => "add section: ",
        Some(EditTarget::RenameProject { .. }) => "rename project: ",
        Some(EditTarget::NewProject) => "new project: ",
        Some(EditTarget::StatusName { .. }) | Some(EditTarget::NewStatusName) => "status name: ",
        Some(EditTarget::StatusColor { .. }) | Some(EditTarget::NewStatusColor { .. }) => {
            "color: "
        }
        None => "",
    }
}

fn confirm_prompt(app: &App) -> String {
    match app.confirm_action {
        Some(ConfirmAction::DeleteSection { ref key }) => {
            let descendants = app
                .ws
                .sections
                .lookup(key)
                .map(|s| s.subtree_len().saturating_sub(1))
                .unwrap_or(0);
            if descendants > 0 {
                format!("delete {} and {} descendants? (y/n)", key, descendants)
            } else {
                format!("delete section {}? (y/n)", key)
            }
        }
        Some(ConfirmAction::DeleteProject { ref id }) => {
            let name = app
                .ws
                .project_by_id(id)
                .map(|p| p.name.as_str())
                .unwrap_or(id);
            format!("delete project {}? (y/n)", name)
        }
        Some(ConfirmAction::DeleteStatus { index }) => {
            let name = app
                .ws
                .statuses
                .get(index)
                .map(|s| s.name)
                .unwrap_or_default();
            format!("remove status {}? (y/n)", name)
        }
        None => String::new(),
    }
}
