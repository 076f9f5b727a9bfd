use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use regex::RegexBuilder;
use serde_json::Value;

/// Global override for the store directory (set by -S flag)
static STORE_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::export::{self, ImportPayload};
use crate::io::fetch;
use crate::io::lock::StoreLock;
use crate::io::store_io;
use crate::model::project::Project;
use crate::model::section::Section;
use crate::model::status::{StatusRegistry, pastel_color};
use crate::model::tree::SectionTree;
use crate::model::workspace::Workspace;
use crate::ops::normalize::NormalizeError;
use crate::ops::{aggregate, check, mutate, normalize, search, stats};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -S override for store_dir(). The directory is created up
    // front so a fresh path can be named on the first run.
    if let Some(ref dir) = cli.store {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create store dir '{}': {}", dir, e))?;
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -S path '{}': {}", dir, e))?;
        STORE_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Show(args) => cmd_show(args, json),
            Commands::List(args) => cmd_list(args, json),
            Commands::Search(args) => cmd_search(args, json),
            Commands::Stats => cmd_stats(json),
            Commands::Check => cmd_check(json),
            Commands::Export(args) => cmd_export(args),

            // Write commands
            Commands::Load(args) => cmd_load(args),
            Commands::Status(args) => cmd_status(args),
            Commands::Add(args) => cmd_add(args),
            Commands::Rm(args) => cmd_rm(args),
            Commands::Swap(args) => cmd_swap(args),
            Commands::Rename(args) => cmd_rename(args),
            Commands::Rekey(args) => cmd_rekey(args),
            Commands::Collapse(args) => cmd_collapse(args),

            // Palette and projects
            Commands::Statuses(args) => cmd_statuses(args, json),
            Commands::Projects(args) => cmd_projects(args, json),

            // Configuration
            Commands::Config(args) => cmd_config(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_dir() -> PathBuf {
    match STORE_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => store_io::store_dir(),
    }
}

/// Aggregate, sync the current project, and persist the workspace.
/// Every write command funnels through here, so a saved store always
/// has internal statuses consistent with the current palette.
fn commit_workspace(dir: &Path, ws: &mut Workspace) -> Result<(), store_io::StoreError> {
    aggregate::aggregate(&mut ws.sections, &ws.statuses);
    ws.sync_current();
    ws.bump_generation();
    store_io::write_workspace(dir, ws)
}

/// Resolve a project argument: exact id first, then exact name
fn resolve_project_id(ws: &Workspace, arg: &str) -> Option<String> {
    if let Some(p) = ws.projects.iter().find(|p| p.id == arg) {
        return Some(p.id.clone());
    }
    ws.projects
        .iter()
        .find(|p| p.name == arg)
        .map(|p| p.id.clone())
}

fn missing_key_error(key: &str) -> Box<dyn std::error::Error> {
    format!("no section with key '{}'", key).into()
}

// ---------------------------------------------------------------------------
// Load pipeline
// ---------------------------------------------------------------------------

/// Project name from a URL: the last slash-separated segment, however
/// odd, or a fixed fallback when the URL ends in a slash
fn url_project_name(url: &str) -> String {
    match url.split('/').next_back() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "URL Project".to_string(),
    }
}

/// Project name from a file path: the stem without its extension
fn file_project_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn read_stdin() -> std::io::Result<String> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Create a project and run `sections` through the import pipeline.
///
/// The project is registered and made current before the pipeline runs
/// so the committed tree lands in it; the outgoing live tree still
/// provides status inheritance for same-keyed nodes. Validation happens
/// up front, so a bad import leaves the project list untouched too.
fn load_into_new_project(
    ws: &mut Workspace,
    name: &str,
    sections: &Value,
    statuses: Option<StatusRegistry>,
) -> Result<(), NormalizeError> {
    normalize::validate(sections)?;
    ws.add_project(Project::new(name, SectionTree::new()));
    normalize::load_sections(ws, sections)?;
    if let Some(registry) = statuses {
        ws.statuses = registry;
    }
    Ok(())
}

fn cmd_load(args: LoadCmd) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let (config, _) = config_io::read_config(&dir)?;

    // Resolve the source before taking the lock; fetches can be slow
    let (payload, explicit_name, fallback_name) = match args.source {
        LoadSource::Model(a) => {
            let value = fetch::resolve_model(&dir, &config.fetch, &a.model)?;
            (ImportPayload::Sections(value), a.name, a.model)
        }
        LoadSource::Url(a) => {
            let timeout = Duration::from_secs(config.fetch.timeout_secs);
            let value = fetch::fetch_json(&a.url, timeout)?;
            let fallback = url_project_name(&a.url);
            (ImportPayload::Sections(value), a.name, fallback)
        }
        LoadSource::File(a) => {
            let payload = export::read_import(Path::new(&a.file))?;
            let fallback = file_project_name(&a.file);
            (payload, a.name, fallback)
        }
        LoadSource::Json(a) => {
            let text = match a.text {
                Some(text) => text,
                None => read_stdin()?,
            };
            let payload = export::parse_import(&text)?;
            (payload, a.name, "User Input Project".to_string())
        }
    };

    let (wrapper_name, sections, statuses) = match payload {
        ImportPayload::Sections(value) => (None, value, None),
        ImportPayload::Project {
            name,
            sections,
            statuses,
        } => (name, sections, statuses),
    };
    let name = explicit_name.or(wrapper_name).unwrap_or(fallback_name);

    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);
    load_into_new_project(&mut ws, &name, &sections, statuses)?;
    commit_workspace(&dir, &mut ws)?;

    println!("created project: {} ({} sections)", name, ws.sections.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());

    match args.key {
        Some(key) => {
            let section = ws.sections.lookup(&key).ok_or_else(|| missing_key_error(&key))?;
            if json {
                println!("{}", serde_json::to_string_pretty(section)?);
            } else {
                for line in format_subtree(section) {
                    println!("{}", line);
                }
            }
        }
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ws.sections)?);
            } else if ws.sections.is_empty() {
                println!("(no sections loaded)");
            } else {
                for line in format_tree(&ws.sections) {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());

    let rows: Vec<SectionRowJson> = ws
        .sections
        .iter()
        .filter(|(section, _)| match args.status {
            Some(ref wanted) => &section.status == wanted,
            None => true,
        })
        .map(|(section, depth)| section_row(section, depth))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if ws.sections.is_empty() {
        println!("(no sections loaded)");
    } else {
        for line in format_flat_rows(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());
    let re = RegexBuilder::new(&args.pattern)
        .case_insensitive(true)
        .build()?;
    let hits = search::search_sections(&ws.sections, &re);

    if json {
        let items: Vec<SearchHitJson> = hits.iter().map(search_hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        // one line per section even when both key and name match
        let mut seen = HashSet::new();
        for hit in &hits {
            if seen.insert((hit.key.clone(), hit.trail.clone())) {
                println!("{}", format_search_hit(hit));
            }
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());
    let stats = stats::tree_stats(&ws.sections, &ws.statuses);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats(&stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());
    let result = check::check_tree(&ws.sections, &ws.statuses);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::DuplicateKey { key, count } => {
                        println!("  key '{}' appears {} times", key, count);
                    }
                    check::CheckError::MissingIndexEntry { key, parent } => {
                        println!("  index missing entry: {} (child of {})", key, parent);
                    }
                    check::CheckError::WrongIndexParent {
                        key,
                        expected,
                        actual,
                    } => {
                        println!(
                            "  index points {} at {}, tree says {}",
                            key, actual, expected
                        );
                    }
                    check::CheckError::StaleIndexEntry { key, parent } => {
                        println!("  index has stale entry: {} → {}", key, parent);
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::DuplicateName { name, count } => {
                        println!("  name \"{}\" appears {} times", name, count);
                    }
                    check::CheckWarning::UnknownStatus { key, status } => {
                        println!("  {} has unknown status '{}'", key, status);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ workspace is valid");
        } else {
            println!("✗ workspace has errors");
        }
    }

    if !result.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());
    let project = ws
        .current_project()
        .ok_or("no current project (try `cn load model blank`)")?;

    let text = if args.sections_only {
        serde_json::to_string_pretty(&project.sections)?
    } else {
        serde_json::to_string_pretty(&export::export_project(project, &ws.statuses))?
    };

    match args.path {
        Some(path) => {
            let mut target = PathBuf::from(&path);
            if target.is_dir() {
                target = target.join(export::export_filename(&project.name, Utc::now()));
            }
            std::fs::write(&target, format!("{}\n", text))?;
            println!("exported to {}", target.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if !mutate::set_status(&mut ws.sections, &args.key, &args.status) {
        return Err(missing_key_error(&args.key));
    }
    if !args.status.is_empty() && !ws.statuses.contains(&args.status) {
        eprintln!("note: '{}' is not in the status palette", args.status);
    }

    commit_workspace(&dir, &mut ws)?;
    println!("{} → {}", args.key, args.status);
    Ok(())
}

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if ws.sections.contains(&args.key) {
        eprintln!("note: key '{}' already exists", args.key);
    }

    let mut section = Section::new(&args.key, &args.name);
    if let Some(status) = args.status {
        section.status = status;
    }

    let applied = if let Some(ref parent) = args.under {
        if !ws.sections.contains(parent) {
            return Err(missing_key_error(parent));
        }
        mutate::insert_child(&mut ws.sections, parent, section)
    } else if let Some(ref after) = args.after {
        if !ws.sections.contains(after) {
            return Err(missing_key_error(after));
        }
        match ws.sections.parent_key(after).map(str::to_string) {
            Some(parent) => mutate::insert_sibling(&mut ws.sections, &parent, after, section),
            None => mutate::insert_root_after(&mut ws.sections, after, section),
        }
    } else {
        mutate::insert_root(&mut ws.sections, section)
    };
    if !applied {
        return Err(format!("cannot insert '{}' at that position", args.key).into());
    }

    commit_workspace(&dir, &mut ws)?;
    println!("{}", args.key);
    Ok(())
}

fn cmd_rm(args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    let removed = ws
        .sections
        .lookup(&args.key)
        .map(Section::subtree_len)
        .ok_or_else(|| missing_key_error(&args.key))?;
    mutate::delete(&mut ws.sections, &args.key);

    commit_workspace(&dir, &mut ws)?;
    if removed == 1 {
        println!("deleted {}", args.key);
    } else {
        println!("deleted {} and {} descendants", args.key, removed - 1);
    }
    Ok(())
}

fn cmd_swap(args: SwapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if !mutate::swap(&mut ws.sections, &args.key_a, &args.key_b) {
        if !ws.sections.contains(&args.key_a) {
            return Err(missing_key_error(&args.key_a));
        }
        if !ws.sections.contains(&args.key_b) {
            return Err(missing_key_error(&args.key_b));
        }
        return Err("cannot swap a section with itself or its own ancestor".into());
    }

    commit_workspace(&dir, &mut ws)?;
    println!("swapped {} and {}", args.key_a, args.key_b);
    Ok(())
}

fn cmd_rename(args: RenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if !mutate::rename(&mut ws.sections, &args.key, &args.name) {
        return Err(missing_key_error(&args.key));
    }

    commit_workspace(&dir, &mut ws)?;
    println!("{} renamed", args.key);
    Ok(())
}

fn cmd_rekey(args: RekeyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if ws.sections.contains(&args.new_key) {
        eprintln!("note: key '{}' already exists", args.new_key);
    }
    if !mutate::rekey(&mut ws.sections, &args.key, &args.new_key) {
        return Err(missing_key_error(&args.key));
    }

    commit_workspace(&dir, &mut ws)?;
    println!("{} → {}", args.key, args.new_key);
    Ok(())
}

fn cmd_collapse(args: CollapseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if !mutate::toggle_collapse(&mut ws.sections, &args.key) {
        return Err(missing_key_error(&args.key));
    }
    let collapsed = ws
        .sections
        .lookup(&args.key)
        .map(|s| s.is_collapsed)
        .unwrap_or(false);

    commit_workspace(&dir, &mut ws)?;
    println!(
        "{} {}",
        args.key,
        if collapsed { "collapsed" } else { "expanded" }
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Status palette handlers
// ---------------------------------------------------------------------------

fn cmd_statuses(args: StatusesCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        None => cmd_statuses_list(json),
        Some(StatusesAction::Add(a)) => cmd_statuses_add(a),
        Some(StatusesAction::Set(a)) => cmd_statuses_set(a),
        Some(StatusesAction::Rm(a)) => cmd_statuses_rm(a),
    }
}

fn cmd_statuses_list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());

    if json {
        println!("{}", serde_json::to_string_pretty(&status_slots(&ws.statuses))?);
    } else if ws.statuses.is_empty() {
        println!("(no statuses)");
    } else {
        for line in format_statuses(&ws.statuses) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_statuses_add(args: StatusesAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if ws.statuses.contains(&args.name) {
        return Err(format!("status '{}' already exists", args.name).into());
    }
    let color = args
        .color
        .unwrap_or_else(|| pastel_color(ws.statuses.len()).to_string());
    ws.statuses.push(&args.name, &color);

    commit_workspace(&dir, &mut ws)?;
    println!("added {} ({})", args.name, color);
    Ok(())
}

fn cmd_statuses_set(args: StatusesSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    if let Some(existing) = ws.statuses.rank(&args.name) {
        if existing != args.index {
            return Err(format!("status '{}' already exists", args.name).into());
        }
    }
    let current = ws
        .statuses
        .get(args.index)
        .ok_or_else(|| format!("no status at index {}", args.index))?;
    let color = args.color.unwrap_or(current.color);
    ws.statuses.update_at(args.index, &args.name, &color);

    // sections still carrying the old name keep it; `cn check` reports them
    commit_workspace(&dir, &mut ws)?;
    println!("{} → {} ({})", args.index, args.name, color);
    Ok(())
}

fn cmd_statuses_rm(args: StatusesRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    let removed = ws
        .statuses
        .get(args.index)
        .ok_or_else(|| format!("no status at index {}", args.index))?;
    ws.statuses.remove_at(args.index);

    let still_used = ws
        .sections
        .iter()
        .filter(|(s, _)| s.status == removed.name)
        .count();
    if still_used > 0 {
        eprintln!("note: {} sections still use '{}'", still_used, removed.name);
    }

    commit_workspace(&dir, &mut ws)?;
    println!("removed {}", removed.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Project handlers
// ---------------------------------------------------------------------------

fn cmd_projects(args: ProjectsCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        None | Some(ProjectsAction::List) => cmd_projects_list(json),
        Some(ProjectsAction::Use(a)) => cmd_projects_use(a),
        Some(ProjectsAction::Rename(a)) => cmd_projects_rename(a),
        Some(ProjectsAction::Rm(a)) => cmd_projects_rm(a),
    }
}

fn cmd_projects_list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ws = store_io::read_workspace(&store_dir());

    if json {
        let items: Vec<ProjectInfoJson> = ws
            .projects
            .iter()
            .map(|p| project_info(p, ws.current_project_id.as_deref() == Some(p.id.as_str())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if ws.projects.is_empty() {
        println!("No projects yet.");
        println!();
        println!("Run `cn load model blank` to start an empty project,");
        println!("or `cn load file <path>` to import one.");
        return Ok(());
    }

    let name_w = ws.projects.iter().map(|p| p.name.len()).max().unwrap_or(0).max(4);
    for p in &ws.projects {
        let marker = if ws.current_project_id.as_deref() == Some(p.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<name_w$}  {:<13}  {:>3} sections  {}",
            marker,
            p.name,
            p.id,
            p.sections.len(),
            relative_time(&p.created_at)
        );
    }
    Ok(())
}

fn cmd_projects_use(args: ProjectsUseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    let id = resolve_project_id(&ws, &args.project)
        .ok_or_else(|| format!("no project '{}'", args.project))?;
    normalize::switch_project(&mut ws, &id);
    store_io::write_workspace(&dir, &ws)?;

    let name = ws.current_project().map(|p| p.name.as_str()).unwrap_or("");
    println!("switched to {} ({} sections)", name, ws.sections.len());
    Ok(())
}

fn cmd_projects_rename(args: ProjectsRenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    let id = resolve_project_id(&ws, &args.project)
        .ok_or_else(|| format!("no project '{}'", args.project))?;
    let old = ws
        .project_by_id(&id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    ws.rename_project(&id, &args.name);
    store_io::write_workspace(&dir, &ws)?;

    println!("{} → {}", old, args.name);
    Ok(())
}

fn cmd_projects_rm(args: ProjectsRmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    let _lock = StoreLock::acquire_default(&dir)?;
    let mut ws = store_io::read_workspace(&dir);

    let id = resolve_project_id(&ws, &args.project)
        .ok_or_else(|| format!("no project '{}'", args.project))?;
    let name = ws
        .project_by_id(&id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let was_current = ws.current_project_id.as_deref() == Some(id.as_str());
    ws.remove_project(&id);

    // deleting the current project falls back to the first remaining,
    // run through the load pipeline like any other switch
    if was_current {
        if let Some(next) = ws.current_project_id.clone() {
            normalize::switch_project(&mut ws, &next);
        }
    }
    store_io::write_workspace(&dir, &ws)?;

    println!("deleted {}", name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Config handlers
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = store_dir();
    match args.action {
        None => {
            let (config, _) = config_io::read_config(&dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            let api_url = if config.fetch.api_url.is_empty() {
                "(unset)".to_string()
            } else {
                config.fetch.api_url.clone()
            };
            println!("fetch.api_url      = {}", api_url);
            println!("fetch.timeout_secs = {}", config.fetch.timeout_secs);
            println!("ui.display_label   = {}", config.ui.display_label);
            let mut colors: Vec<_> = config.ui.colors.iter().collect();
            colors.sort();
            for (slot, color) in colors {
                println!("ui.colors.{} = {}", slot, color);
            }
            Ok(())
        }
        Some(ConfigAction::Set(a)) => {
            let _lock = StoreLock::acquire_default(&dir)?;
            let (_, mut doc) = config_io::read_config(&dir)?;
            config_io::set_config_value(&mut doc, &a.key, &a.value)?;
            config_io::write_config(&dir, &doc)?;
            println!("{} = {}", a.key, a.value);
            Ok(())
        }
        Some(ConfigAction::Path) => {
            println!("{}", config_io::config_path(&dir).display());
            Ok(())
        }
    }
}
