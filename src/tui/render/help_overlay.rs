use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, View};

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &mut App, area: Rect) {
    // Center the overlay, leaving some margin
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let text_color = app.theme.text;
    let bright = app.theme.text_bright;
    let highlight = app.theme.highlight;
    let dim = app.theme.dim;

    let key_style = Style::default()
        .fg(highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(text_color).bg(bg);
    let header_style = Style::default()
        .fg(bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive help
    match app.view {
        View::Panel => {
            lines.push(Line::from(Span::styled(" Navigation", header_style)));
            add_binding(
                &mut lines,
                " \u{2191}\u{2193}/jk",
                "Move cursor up/down",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " \u{2190}/h",
                "Collapse / go to parent",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " \u{2192}/l",
                "Expand / go to first child",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " g/G",
                "Jump to top/bottom",
                key_style,
                desc_style,
            );
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled(" Editing", header_style)));
            add_binding(
                &mut lines,
                " Space/s",
                "Cycle section status",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " r", "Rename section", key_style, desc_style);
            add_binding(&mut lines, " K", "Change section key", key_style, desc_style);
            add_binding(&mut lines, " a", "Add child section", key_style, desc_style);
            add_binding(&mut lines, " A", "Add sibling below", key_style, desc_style);
            add_binding(&mut lines, " o", "Add top-level section", key_style, desc_style);
            add_binding(
                &mut lines,
                " m",
                "Swap with another section",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " d", "Delete section", key_style, desc_style);
            lines.push(Line::from(""));
        }
        View::Projects => {
            lines.push(Line::from(Span::styled(" Projects", header_style)));
            add_binding(
                &mut lines,
                " \u{2191}\u{2193}/jk",
                "Move cursor",
                key_style,
                desc_style,
            );
            add_binding(
                &mut lines,
                " Enter",
                "Switch to project",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " n", "New empty project", key_style, desc_style);
            add_binding(&mut lines, " r", "Rename project", key_style, desc_style);
            add_binding(&mut lines, " d", "Delete project", key_style, desc_style);
            lines.push(Line::from(""));
        }
        View::Statuses => {
            lines.push(Line::from(Span::styled(" Statuses", header_style)));
            add_binding(
                &mut lines,
                " \u{2191}\u{2193}/jk",
                "Move cursor",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " a", "Add status", key_style, desc_style);
            add_binding(
                &mut lines,
                " e",
                "Edit status name and color",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " d", "Remove status", key_style, desc_style);
            lines.push(Line::from(""));
        }
    }

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(
        &mut lines,
        " Tab",
        "Next view (Shift+Tab previous)",
        key_style,
        desc_style,
    );
    add_binding(&mut lines, " ?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);

    // Clamp the scroll offset so G lands on the last line
    app.help_scroll = app.help_scroll.min(lines.len().saturating_sub(1));
    let scroll = app.help_scroll as u16;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg))
        .scroll((scroll, 0));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
