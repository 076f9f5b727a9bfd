use serde::{Deserialize, Serialize};

use super::project::Project;
use super::status::StatusRegistry;
use super::tree::SectionTree;

/// Everything the tool knows, in one owned value.
///
/// `sections` is the live working copy of the current project's tree;
/// callers mutate it through ops/ and then `sync_current` writes it back
/// into the matching entry of `projects` before the workspace is saved.
/// `generation` counts committed loads so a stale reload from the
/// watcher can be recognized and dropped; it is not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub current_project_id: Option<String>,
    #[serde(default)]
    pub statuses: StatusRegistry,
    #[serde(default)]
    pub sections: SectionTree,
    #[serde(skip)]
    pub generation: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace {
            projects: Vec::new(),
            current_project_id: None,
            statuses: StatusRegistry::default(),
            sections: SectionTree::new(),
            generation: 0,
        }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    pub fn current_project(&self) -> Option<&Project> {
        let id = self.current_project_id.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn current_project_mut(&mut self) -> Option<&mut Project> {
        let id = self.current_project_id.clone()?;
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn project_by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Copy the live tree back into the current project's stored sections
    pub fn sync_current(&mut self) {
        let sections = self.sections.clone();
        if let Some(project) = self.current_project_mut() {
            project.sections = sections;
        }
    }

    /// Register a project and make it current. The live tree is not
    /// touched here; loading goes through the normalize pipeline.
    pub fn add_project(&mut self, project: Project) {
        self.current_project_id = Some(project.id.clone());
        self.projects.push(project);
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> bool {
        match self.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a project. If it was current, the first remaining project
    /// becomes current (the caller re-runs the load pipeline for it);
    /// with none left the workspace resets to an empty tree and the
    /// default palette.
    pub fn remove_project(&mut self, id: &str) -> bool {
        let Some(pos) = self.projects.iter().position(|p| p.id == id) else {
            return false;
        };
        self.projects.remove(pos);
        if self.current_project_id.as_deref() == Some(id) {
            match self.projects.first() {
                Some(next) => self.current_project_id = Some(next.id.clone()),
                None => self.clear(),
            }
        }
        true
    }

    /// Drop the live tree and current selection, restore the default
    /// palette. The project list itself is untouched.
    pub fn clear(&mut self) {
        self.sections = SectionTree::new();
        self.current_project_id = None;
        self.statuses = StatusRegistry::default();
    }

    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }
}
