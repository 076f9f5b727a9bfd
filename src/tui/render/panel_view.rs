use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the section panel for the current project. Each row is painted
/// full-width in its status color, darkened by depth.
pub fn render_panel_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.flatten();

    if rows.is_empty() {
        let empty = Paragraph::new(" No sections. Press o to add one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Clamp cursor and keep it inside the scroll window
    let visible_height = area.height as usize;
    app.panel_cursor = app.panel_cursor.min(rows.len() - 1);
    if app.panel_cursor < app.panel_scroll {
        app.panel_scroll = app.panel_cursor;
    } else if app.panel_cursor >= app.panel_scroll + visible_height {
        app.panel_scroll = app.panel_cursor.saturating_sub(visible_height - 1);
    }

    let duplicates = app.duplicate_keys();
    let label_is_key = app.config.ui.label_is_key();
    let width = area.width as usize;
    let scroll = app.panel_scroll;
    let end = rows.len().min(scroll + visible_height);

    let mut lines: Vec<Line> = Vec::with_capacity(end - scroll);
    for (row, idx) in rows[scroll..end].iter().zip(scroll..end) {
        let is_cursor = idx == app.panel_cursor;
        let status_color = app.ws.statuses.color(&row.status);
        let row_bg = app.theme.row_bg(status_color, row.depth);
        let fill = Style::default().bg(row_bg);

        let mut spans: Vec<Span> = Vec::new();

        // Cursor bar in column 0
        if is_cursor {
            spans.push(Span::styled(
                "\u{258E}",
                Style::default().fg(app.theme.selection_border).bg(row_bg),
            ));
        } else {
            spans.push(Span::styled(" ", fill));
        }

        // Indent by depth
        if row.depth > 0 {
            spans.push(Span::styled("  ".repeat(row.depth), fill));
        }

        // Label: name or key per config, flagged when the key is duplicated
        let label = if label_is_key { &row.key } else { &row.name };
        let label_fg = if duplicates.contains(row.key.as_str()) {
            app.theme.warning
        } else {
            app.theme.panel_text
        };
        let mut label_style = Style::default().fg(label_fg).bg(row_bg);
        if is_cursor {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(label.clone(), label_style));

        // Collapsed marker with the hidden child count
        if row.is_collapsed && row.child_count > 0 {
            spans.push(Span::styled(
                format!(" \u{25B8} {}", row.child_count),
                Style::default().fg(app.theme.panel_text).bg(row_bg),
            ));
        }

        // Status name right-aligned, then fill to full width
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let status_width = display_width(&row.status);
        if !row.status.is_empty() && content_width + status_width + 1 < width {
            let padding = width - content_width - status_width - 1;
            spans.push(Span::styled(" ".repeat(padding), fill));
            spans.push(Span::styled(
                row.status.clone(),
                Style::default().fg(app.theme.panel_text).bg(row_bg),
            ));
            spans.push(Span::styled(" ", fill));
        } else if content_width < width {
            spans.push(Span::styled(" ".repeat(width - content_width), fill));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;
    use crate::tui::render::test_helpers::{
        TERM_H, TERM_W, app_with_tree, render_to_string, sample_tree,
    };

    #[test]
    fn test_panel_rows_show_names_and_statuses() {
        let mut app = app_with_tree(sample_tree());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        assert!(out.contains("Build"));
        assert!(out.contains("Parser"));
        assert!(out.contains("In Progress"));
    }

    #[test]
    fn test_panel_collapsed_marker_counts_children() {
        let mut app = app_with_tree(sample_tree());
        if let Some(s) = app.ws.sections.lookup_mut("1") {
            s.is_collapsed = true;
        }
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        assert!(out.contains("Build \u{25B8} 2"));
        assert!(!out.contains("Parser"));
    }

    #[test]
    fn test_panel_empty_state() {
        let mut app = app_with_tree(crate::model::SectionTree::new());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        assert!(out.contains("No sections"));
    }

    #[test]
    fn test_panel_cursor_bar_on_current_row() {
        let mut app = app_with_tree(sample_tree());
        app.panel_cursor = 1;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("\u{258E}"));
    }

    #[test]
    fn test_panel_scroll_follows_cursor() {
        let mut roots = Vec::new();
        for i in 1..=30 {
            let mut s = Section::new(i.to_string(), format!("Section {}", i));
            s.status = "To Do".to_string();
            roots.push(s);
        }
        let mut app = app_with_tree(crate::model::SectionTree::from_roots(roots));
        app.panel_cursor = 29;
        let out = render_to_string(TERM_W, 10, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        assert_eq!(app.panel_scroll, 20);
        assert!(out.contains("Section 30"));
        assert!(out.contains("Section 21"));
        assert!(!out.contains("Section 20"));
    }

    #[test]
    fn test_panel_labels_follow_config() {
        let mut app = app_with_tree(sample_tree());
        app.config.ui.display_label = "key".to_string();
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_panel_view(frame, &mut app, area);
        });
        assert!(out.contains("1.1"));
        assert!(!out.contains("Parser"));
    }
}
