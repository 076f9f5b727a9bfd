use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::display_width;

/// Render the tab bar: current project tab + projects/statuses tabs, with
/// separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );

    // Leading icon
    let bg_style = Style::default().bg(app.theme.background);
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25B2}",
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background),
    ));
    spans.push(Span::styled(" ", bg_style));

    // Current project tab
    let project_name = app
        .ws
        .current_project()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "(no project)".to_string());
    let is_panel = app.view == View::Panel;
    spans.push(Span::styled(
        format!(" {} ", project_name),
        tab_style(app, is_panel),
    ));
    sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
    spans.push(sep.clone());

    // Projects tab
    let is_projects = app.view == View::Projects;
    spans.push(Span::styled(" projects ", tab_style(app, is_projects)));
    sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
    spans.push(sep.clone());

    // Statuses tab
    let is_statuses = app.view == View::Statuses;
    spans.push(Span::styled(" statuses ", tab_style(app, is_statuses)));
    sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
    spans.push(sep.clone());

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(Style::default().bg(app.theme.background));
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget = Paragraph::new(line)
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_W, app_with_tree, render_to_string, sample_tree};

    #[test]
    fn test_tab_bar_shows_project_and_views() {
        let app = app_with_tree(sample_tree());
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(out.contains("test project"));
        assert!(out.contains("projects"));
        assert!(out.contains("statuses"));
        assert!(out.contains("\u{2534}"));
    }

    #[test]
    fn test_tab_bar_without_project() {
        let mut app = app_with_tree(sample_tree());
        app.ws.projects.clear();
        app.ws.current_project_id = None;
        let out = render_to_string(TERM_W, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert!(out.contains("(no project)"));
    }
}
