use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::relative_time;
use crate::tui::app::App;
use crate::util::unicode::display_width;

/// Render the stored projects list. The current project is starred.
pub fn render_projects_view(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.ws.projects.is_empty() {
        let empty = Paragraph::new(" No projects yet. Press n to create one.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = area.height as usize;
    app.projects_cursor = app.projects_cursor.min(app.ws.projects.len() - 1);
    if app.projects_cursor < app.projects_scroll {
        app.projects_scroll = app.projects_cursor;
    } else if app.projects_cursor >= app.projects_scroll + visible_height {
        app.projects_scroll = app.projects_cursor.saturating_sub(visible_height - 1);
    }

    let width = area.width as usize;
    let name_w = app
        .ws
        .projects
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let scroll = app.projects_scroll;
    let end = app.ws.projects.len().min(scroll + visible_height);

    let mut lines: Vec<Line> = Vec::with_capacity(end - scroll);
    for (project, idx) in app.ws.projects[scroll..end].iter().zip(scroll..end) {
        let is_cursor = idx == app.projects_cursor;
        let is_current = app.ws.current_project_id.as_deref() == Some(project.id.as_str());
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

        let marker = if is_current { "*" } else { " " };
        spans.push(Span::styled(
            format!("{} ", marker),
            Style::default().fg(app.theme.highlight).bg(bg),
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
            format!("{:<width$}", project.name, width = name_w),
            name_style,
        ));

        let count = project.sections.len();
        spans.push(Span::styled(
            format!(
                "  {:<13}  {:>3} {}  {}",
                project.id,
                count,
                if count == 1 { "section " } else { "sections" },
                relative_time(&project.created_at),
            ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, SectionTree};
    use crate::tui::render::test_helpers::{
        TERM_H, TERM_W, app_with_tree, render_to_string, sample_tree,
    };

    #[test]
    fn test_projects_marks_current_with_star() {
        let mut app = app_with_tree(sample_tree());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_projects_view(frame, &mut app, area);
        });
        assert!(out.contains("* test project"));
        assert!(out.contains("4 sections"));
    }

    #[test]
    fn test_projects_other_rows_unstarred() {
        let mut app = app_with_tree(sample_tree());
        let current = app.ws.current_project_id.clone();
        app.ws.projects.push(Project::new("other", SectionTree::new()));
        app.ws.current_project_id = current;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_projects_view(frame, &mut app, area);
        });
        assert!(out.contains("* test project"));
        assert!(out.contains("other"));
        assert!(!out.contains("* other"));
    }

    #[test]
    fn test_projects_empty_state() {
        let mut app = app_with_tree(sample_tree());
        app.ws.projects.clear();
        app.ws.current_project_id = None;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_projects_view(frame, &mut app, area);
        });
        assert!(out.contains("No projects yet"));
    }
}
