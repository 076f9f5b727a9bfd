use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Config, Project, Section, SectionTree, Workspace};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App around an in-memory workspace holding `tree` as the
/// current project. The store dir points nowhere; these apps never save.
pub fn app_with_tree(tree: SectionTree) -> App {
    let mut ws = Workspace::new();
    ws.add_project(Project::new("test project", tree.clone()));
    ws.sections = tree;
    App::new(PathBuf::from("/tmp/canopy-test"), ws, Config::default())
}

/// Two roots, one with children:
///
/// ```text
/// 1  Build      To Do
///   1.1 Parser  In Progress
///   1.2 Codegen To Do
/// 2  Deploy     Done
/// ```
pub fn sample_tree() -> SectionTree {
    let mut build = Section::new("1", "Build");
    build.status = "To Do".to_string();
    let mut parser = Section::new("1.1", "Parser");
    parser.status = "In Progress".to_string();
    let mut codegen = Section::new("1.2", "Codegen");
    codegen.status = "To Do".to_string();
    build.children = vec![parser, codegen];

    let mut deploy = Section::new("2", "Deploy");
    deploy.status = "Done".to_string();

    SectionTree::from_roots(vec![build, deploy])
}
