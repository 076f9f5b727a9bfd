use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::parse_hex_color;
use crate::util::unicode::display_width;

/// Render the status registry in rank order, least advanced first.
pub fn render_statuses_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let statuses: Vec<(String, String)> = app
        .ws
        .statuses
        .iter()
        .map(|(name, color)| (name.to_string(), color.to_string()))
        .collect();

    if statuses.is_empty() {
        let empty = Paragraph::new(" No statuses defined. Press a to add one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = area.height as usize;
    app.statuses_cursor = app.statuses_cursor.min(statuses.len() - 1);
    if app.statuses_cursor < app.statuses_scroll {
        app.statuses_scroll = app.statuses_cursor;
    } else if app.statuses_cursor >= app.statuses_scroll + visible_height {
        app.statuses_scroll = app.statuses_cursor.saturating_sub(visible_height - 1);
    }

    let width = area.width as usize;
    let name_w = statuses
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let scroll = app.statuses_scroll;
    let end = statuses.len().min(scroll + visible_height);

    let mut lines: Vec<Line> = Vec::with_capacity(end - scroll);
    for ((name, color), idx) in statuses[scroll..end].iter().zip(scroll..end) {
        let is_cursor = idx == app.statuses_cursor;
        let bg = if is_cursor {
            app.theme.selection_bg
        } else {
            app.theme.background
        };
        let fill = Style::default().bg(bg);

        let mut spans: Vec<Span> = Vec::new();
        if is_cursor {
            spans.push(Span::styled(
                "\u{258E}",
                Style::default().fg(app.theme.selection_border).bg(bg),
            ));
        } else {
            spans.push(Span::styled(" ", fill));
        }

        spans.push(Span::styled(
            format!("{:>2} ", idx),
            Style::default().fg(app.theme.dim).bg(bg),
        ));

        // Swatch in the status's own color
        let swatch_fg = parse_hex_color(color).unwrap_or(app.theme.unset);
        spans.push(Span::styled(
            "\u{2588}\u{2588} ",
            Style::default().fg(swatch_fg).bg(bg),
        ));

        let mut name_style = Style::default()
            .fg(if is_cursor {
                app.theme.text_bright
            } else {
                app.theme.text
            })
            .bg(bg);
        if is_cursor {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(
            format!("{:<width$}", name, width = name_w),
            name_style,
        ));

        spans.push(Span::styled(
            format!("  {}", color),
            Style::default().fg(app.theme.dim).bg(bg),
        ));

        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if content_width < width {
            spans.push(Span::styled(" ".repeat(width - content_width), fill));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}
