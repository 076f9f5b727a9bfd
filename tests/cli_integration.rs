//! Integration tests for the `cn` CLI.
//!
//! Each test creates a temp store directory, runs `cn` as a subprocess
//! against it with `-S`, and verifies stdout and/or file contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `cn` binary.
fn cn_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cn");
    path
}

/// A small tree with one nested root. Statuses are discovered in
/// pre-order, so the palette becomes To Do, In Progress, Done.
const SEED_SECTIONS: &str = r#"[
  {"key": "1", "name": "Build", "children": [
    {"key": "1.1", "name": "Parser", "status": "To Do"},
    {"key": "1.2", "name": "Codegen", "status": "In Progress"}
  ]},
  {"key": "2", "name": "Deploy", "status": "Done"}
]"#;

/// Run `cn -S <store>` with the given args, returning (stdout, stderr, success).
fn run_cn(store: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(cn_bin())
        .arg("-S")
        .arg(store)
        .args(args)
        .output()
        .expect("failed to run cn");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `cn` expecting success, return stdout.
fn run_cn_ok(store: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_cn(store, args);
    if !success {
        panic!(
            "cn {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Fresh temp store seeded with SEED_SECTIONS as project "demo".
fn seeded_store() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    run_cn_ok(tmp.path(), &["load", "json", SEED_SECTIONS, "--name", "demo"]);
    tmp
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_json_creates_project() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_cn_ok(tmp.path(), &["load", "json", SEED_SECTIONS, "--name", "demo"]);
    assert!(out.contains("created project: demo (4 sections)"));
    assert!(tmp.path().join("workspace.json").exists());
}

#[test]
fn test_load_json_from_stdin() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut child = Command::new(cn_bin())
        .arg("-S")
        .arg(tmp.path())
        .args(["load", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(SEED_SECTIONS.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created project: User Input Project (4 sections)"));
}

#[test]
fn test_load_file_names_project_from_stem() {
    let tmp = tempfile::TempDir::new().unwrap();
    let file = tmp.path().join("roadmap.json");
    fs::write(&file, SEED_SECTIONS).unwrap();

    let out = run_cn_ok(tmp.path(), &["load", "file", file.to_str().unwrap()]);
    assert!(out.contains("created project: roadmap (4 sections)"));
}

#[test]
fn test_load_file_project_wrapper_uses_embedded_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    let file = tmp.path().join("export.json");
    fs::write(
        &file,
        r##"{
          "name": "Wrapped",
          "sections": [{"key": "1", "name": "Only"}],
          "statuses": [{"name": "Odd", "color": "#123456"}]
        }"##,
    )
    .unwrap();

    let out = run_cn_ok(tmp.path(), &["load", "file", file.to_str().unwrap()]);
    assert!(out.contains("created project: Wrapped (1 sections)"));

    // the embedded palette replaces the default one
    let statuses = run_cn_ok(tmp.path(), &["statuses"]);
    assert!(statuses.contains("Odd"));
    assert!(statuses.contains("#123456"));
    assert!(!statuses.contains("To Do"));
}

#[test]
fn test_load_builtin_models() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_cn_ok(tmp.path(), &["load", "model", "blank"]);
    assert!(out.contains("created project: blank (0 sections)"));

    let out = run_cn_ok(tmp.path(), &["load", "model", "bug-tracking", "--name", "bugs"]);
    assert!(out.contains("created project: bugs (9 sections)"));
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("Triage queue"));
}

#[test]
fn test_load_local_model_shadows_builtin() {
    let tmp = tempfile::TempDir::new().unwrap();
    let models = tmp.path().join("models");
    fs::create_dir_all(&models).unwrap();
    fs::write(
        models.join("blank.json"),
        r#"[{"key": "custom", "name": "Custom Root"}]"#,
    )
    .unwrap();

    let out = run_cn_ok(tmp.path(), &["load", "model", "blank"]);
    assert!(out.contains("created project: blank (1 sections)"));
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("Custom Root"));
}

#[test]
fn test_load_unknown_model_without_endpoint_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_out, stderr, success) = run_cn(tmp.path(), &["load", "model", "mystery"]);
    assert!(!success);
    assert!(stderr.contains("unknown model"));
    assert!(stderr.contains("api_url"));
}

#[test]
fn test_load_rejects_invalid_sections() {
    let tmp = tempfile::TempDir::new().unwrap();

    // an object without a sections field is not an import shape
    let (_out, stderr, success) = run_cn(tmp.path(), &["load", "json", r#"{"not": "sections"}"#]);
    assert!(!success);
    assert!(stderr.contains("expected a JSON array"));

    // a section missing its name fails validation with its position
    let (_out, stderr, success) = run_cn(tmp.path(), &["load", "json", r#"[{"key": "1"}]"#]);
    assert!(!success);
    assert!(stderr.contains("missing `name`"));

    // nothing was created by either attempt
    let projects = run_cn_ok(tmp.path(), &["projects"]);
    assert!(projects.contains("No projects yet."));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_show_tree_with_aggregated_root() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["show"]);

    // interior status is computed from children: To Do beats In Progress
    assert!(out.contains("1  Build  [To Do]"));
    assert!(out.contains("  1.1  Parser  [To Do]"));
    assert!(out.contains("  1.2  Codegen  [In Progress]"));
    assert!(out.contains("2  Deploy  [Done]"));
}

#[test]
fn test_show_subtree() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["show", "1"]);
    assert!(out.contains("Parser"));
    assert!(out.contains("Codegen"));
    assert!(!out.contains("Deploy"));
}

#[test]
fn test_show_json() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["show", "1.1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["key"], "1.1");
    assert_eq!(parsed["name"], "Parser");
    assert_eq!(parsed["status"], "To Do");
}

#[test]
fn test_show_missing_key() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["show", "9.9"]);
    assert!(!success);
    assert!(stderr.contains("no section with key '9.9'"));
}

#[test]
fn test_show_empty_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_cn_ok(tmp.path(), &["show"]);
    assert!(out.contains("(no sections loaded)"));
}

#[test]
fn test_list_with_status_filter() {
    let tmp = seeded_store();

    let out = run_cn_ok(tmp.path(), &["list"]);
    assert!(out.contains("Build"));
    assert!(out.contains("Deploy"));

    let out = run_cn_ok(tmp.path(), &["list", "--status", "To Do"]);
    assert!(out.contains("Build"));
    assert!(out.contains("Parser"));
    assert!(!out.contains("Codegen"));
    assert!(!out.contains("Deploy"));
}

#[test]
fn test_list_json() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["key"], "1");
    assert_eq!(rows[0]["depth"], 0);
    assert_eq!(rows[1]["key"], "1.1");
    assert_eq!(rows[1]["depth"], 1);
}

#[test]
fn test_search_case_insensitive_with_trail() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["search", "parser"]);
    assert!(out.contains("1.1  Parser  (Build)"));
    assert!(!out.contains("Deploy"));
}

#[test]
fn test_search_json() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["search", "^de", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let hits = parsed.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["key"], "2");
    assert_eq!(hits[0]["field"], "name");
}

#[test]
fn test_search_bad_regex_fails() {
    let tmp = seeded_store();
    let (_out, _stderr, success) = run_cn(tmp.path(), &["search", "("]);
    assert!(!success);
}

#[test]
fn test_stats() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["stats"]);
    assert!(out.contains("sections: 4"));
    assert!(out.contains("roots 2"));
    assert!(out.contains("leaves 3"));
    assert!(out.contains("depth 2"));
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_status_set_reaggregates_ancestors() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["status", "1.1", "Done"]);
    assert!(out.contains("1.1 → Done"));

    // Build's children are now Done + In Progress; In Progress is less advanced
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("1  Build  [In Progress]"));
}

#[test]
fn test_status_unknown_name_warns() {
    let tmp = seeded_store();
    let (out, stderr, success) = run_cn(tmp.path(), &["status", "2", "Vaporware"]);
    assert!(success);
    assert!(out.contains("2 → Vaporware"));
    assert!(stderr.contains("not in the status palette"));

    // check flags it as a warning, not an error
    let (check_out, _stderr, check_ok) = run_cn(tmp.path(), &["check"]);
    assert!(check_ok);
    assert!(check_out.contains("unknown status 'Vaporware'"));
    assert!(check_out.contains("workspace is valid"));
}

#[test]
fn test_status_missing_key_fails() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["status", "9", "Done"]);
    assert!(!success);
    assert!(stderr.contains("no section with key '9'"));
}

#[test]
fn test_add_under_after_and_root() {
    let tmp = seeded_store();

    let out = run_cn_ok(tmp.path(), &["add", "1.3", "Tests", "--under", "1"]);
    assert_eq!(out.trim(), "1.3");

    run_cn_ok(tmp.path(), &["add", "1.1a", "Lexer", "--after", "1.1"]);
    run_cn_ok(tmp.path(), &["add", "3", "Docs", "--status", "Done"]);

    let out = run_cn_ok(tmp.path(), &["list", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let keys: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["1", "1.1", "1.1a", "1.2", "1.3", "2", "3"]);
}

#[test]
fn test_add_missing_parent_fails() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["add", "x", "X", "--under", "9"]);
    assert!(!success);
    assert!(stderr.contains("no section with key '9'"));
}

#[test]
fn test_add_unset_status_by_default() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["add", "3", "Docs"]);
    let out = run_cn_ok(tmp.path(), &["show", "3", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["status"], "");
}

#[test]
fn test_rm_reports_descendants() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["rm", "1"]);
    assert!(out.contains("deleted 1 and 2 descendants"));

    let out = run_cn_ok(tmp.path(), &["rm", "2"]);
    assert!(out.contains("deleted 2"));
    assert!(!out.contains("descendants"));

    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("(no sections loaded)"));
}

#[test]
fn test_rm_missing_key_fails() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["rm", "9"]);
    assert!(!success);
    assert!(stderr.contains("no section with key '9'"));
}

#[test]
fn test_swap_roots_reorders() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["swap", "1", "2"]);
    assert!(out.contains("swapped 1 and 2"));

    let show = run_cn_ok(tmp.path(), &["show"]);
    let deploy = show.find("Deploy").unwrap();
    let build = show.find("Build").unwrap();
    assert!(deploy < build);
}

#[test]
fn test_swap_across_parents_moves_subtrees() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["swap", "1.1", "2"]);

    // Deploy took Parser's slot under Build; Parser became a root
    let subtree = run_cn_ok(tmp.path(), &["show", "1"]);
    assert!(subtree.contains("Deploy"));
    assert!(!subtree.contains("Parser"));
    let parser = run_cn_ok(tmp.path(), &["show", "1.1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&parser).unwrap();
    assert_eq!(parsed["name"], "Parser");
}

#[test]
fn test_swap_rejects_ancestor() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["swap", "1", "1.1"]);
    assert!(!success);
    assert!(stderr.contains("cannot swap"));

    let (_out, stderr, success) = run_cn(tmp.path(), &["swap", "1", "9"]);
    assert!(!success);
    assert!(stderr.contains("no section with key '9'"));
}

#[test]
fn test_rename() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["rename", "1.1", "Tokenizer"]);
    assert!(out.contains("1.1 renamed"));
    let show = run_cn_ok(tmp.path(), &["show", "1"]);
    assert!(show.contains("Tokenizer"));
    assert!(!show.contains("Parser"));
}

#[test]
fn test_rekey_keeps_children_attached() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["rekey", "1", "build"]);
    assert!(out.contains("1 → build"));

    let subtree = run_cn_ok(tmp.path(), &["show", "build"]);
    assert!(subtree.contains("Parser"));
    assert!(subtree.contains("Codegen"));

    let (check_out, _stderr, check_ok) = run_cn(tmp.path(), &["check"]);
    assert!(check_ok, "index should follow a rekey: {}", check_out);
}

#[test]
fn test_rekey_to_existing_key_warns_and_check_flags_it() {
    let tmp = seeded_store();
    let (out, stderr, success) = run_cn(tmp.path(), &["rekey", "1.1", "2"]);
    assert!(success);
    assert!(out.contains("1.1 → 2"));
    assert!(stderr.contains("key '2' already exists"));

    let (check_out, _stderr, check_ok) = run_cn(tmp.path(), &["check"]);
    assert!(!check_ok);
    assert!(check_out.contains("key '2' appears 2 times"));
    assert!(check_out.contains("workspace has errors"));
}

#[test]
fn test_collapse_toggles() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["collapse", "1"]);
    assert!(out.contains("1 collapsed"));

    // the flag persists and shows up in the tree listing
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("▸"));

    let out = run_cn_ok(tmp.path(), &["collapse", "1"]);
    assert!(out.contains("1 expanded"));
}

// ---------------------------------------------------------------------------
// Status palette
// ---------------------------------------------------------------------------

#[test]
fn test_statuses_listed_in_import_order() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["statuses"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("To Do"));
    assert!(lines[1].contains("In Progress"));
    assert!(lines[2].contains("Done"));
    // imported names keep their default palette colors
    assert!(lines[0].contains("#FFB3BA"));
}

#[test]
fn test_statuses_add_appends_most_advanced() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["statuses", "add", "Shipped", "#ABCDEF"]);
    assert!(out.contains("added Shipped (#ABCDEF)"));

    let out = run_cn_ok(tmp.path(), &["statuses", "--json"]);
    let slots: serde_json::Value = serde_json::from_str(&out).unwrap();
    let last = slots.as_array().unwrap().last().unwrap();
    assert_eq!(last["index"], 3);
    assert_eq!(last["name"], "Shipped");
    assert_eq!(last["color"], "#ABCDEF");

    let (_out, stderr, success) = run_cn(tmp.path(), &["statuses", "add", "Shipped"]);
    assert!(!success);
    assert!(stderr.contains("status 'Shipped' already exists"));
}

#[test]
fn test_statuses_set_keeps_color_by_default() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["statuses", "set", "0", "Queued"]);
    assert!(out.contains("0 → Queued (#FFB3BA)"));

    // sections still carrying the old name are reported by check
    let (check_out, _stderr, check_ok) = run_cn(tmp.path(), &["check"]);
    assert!(check_ok);
    assert!(check_out.contains("unknown status 'To Do'"));
}

#[test]
fn test_statuses_set_rejects_name_collision() {
    let tmp = seeded_store();
    let (_out, stderr, success) = run_cn(tmp.path(), &["statuses", "set", "0", "Done"]);
    assert!(!success);
    assert!(stderr.contains("status 'Done' already exists"));

    // renaming a slot to its own name is fine (color-only edit)
    run_cn_ok(tmp.path(), &["statuses", "set", "0", "To Do", "#111111"]);
    let out = run_cn_ok(tmp.path(), &["statuses"]);
    assert!(out.contains("#111111"));
}

#[test]
fn test_statuses_rm_warns_when_still_used() {
    let tmp = seeded_store();
    let (out, stderr, success) = run_cn(tmp.path(), &["statuses", "rm", "0"]);
    assert!(success);
    assert!(out.contains("removed To Do"));
    assert!(stderr.contains("2 sections still use 'To Do'"));

    let (_out, stderr, success) = run_cn(tmp.path(), &["statuses", "rm", "7"]);
    assert!(!success);
    assert!(stderr.contains("no status at index 7"));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[test]
fn test_projects_list_marks_current() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["load", "model", "blank", "--name", "second"]);

    let out = run_cn_ok(tmp.path(), &["projects"]);
    assert!(out.contains("demo"));
    assert!(out.contains("* second"));
    assert!(!out.contains("* demo"));
}

#[test]
fn test_projects_json() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["projects", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "demo");
    assert_eq!(items[0]["current"], true);
    assert_eq!(items[0]["sections"], 4);
}

#[test]
fn test_projects_use_switches_by_name() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["load", "model", "blank", "--name", "second"]);

    let out = run_cn_ok(tmp.path(), &["projects", "use", "demo"]);
    assert!(out.contains("switched to demo (4 sections)"));

    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("Build"));

    let (_out, stderr, success) = run_cn(tmp.path(), &["projects", "use", "nope"]);
    assert!(!success);
    assert!(stderr.contains("no project 'nope'"));
}

#[test]
fn test_projects_rename() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["projects", "rename", "demo", "roadmap"]);
    assert!(out.contains("demo → roadmap"));
    let out = run_cn_ok(tmp.path(), &["projects"]);
    assert!(out.contains("roadmap"));
    assert!(!out.contains("demo"));
}

#[test]
fn test_projects_rm_current_falls_back() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["load", "model", "blank", "--name", "second"]);

    // removing the current project falls back to the remaining one
    let out = run_cn_ok(tmp.path(), &["projects", "rm", "second"]);
    assert!(out.contains("deleted second"));

    let out = run_cn_ok(tmp.path(), &["projects"]);
    assert!(out.contains("* demo"));
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("Build"));
}

#[test]
fn test_projects_rm_last_clears_workspace() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["projects", "rm", "demo"]);

    let out = run_cn_ok(tmp.path(), &["projects"]);
    assert!(out.contains("No projects yet."));
    let show = run_cn_ok(tmp.path(), &["show"]);
    assert!(show.contains("(no sections loaded)"));
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn test_export_stdout_wrapper() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["export"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "demo");
    assert_eq!(parsed["sections"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["statuses"][0]["name"], "To Do");
    assert!(parsed["createdAt"].is_string());
}

#[test]
fn test_export_sections_only() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["export", "--sections-only"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(parsed.is_array());
    assert_eq!(parsed[0]["key"], "1");
    assert!(parsed.get("statuses").is_none());
}

#[test]
fn test_export_to_directory_writes_file() {
    let tmp = seeded_store();
    let dest = tmp.path().join("exports");
    fs::create_dir_all(&dest).unwrap();

    let out = run_cn_ok(tmp.path(), &["export", dest.to_str().unwrap()]);
    assert!(out.contains("exported to"));

    let entries: Vec<_> = fs::read_dir(&dest).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("demo-"));
    assert!(name.ends_with(".json"));
}

#[test]
fn test_export_without_project_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_out, stderr, success) = run_cn(tmp.path(), &["export"]);
    assert!(!success);
    assert!(stderr.contains("no current project"));
}

#[test]
fn test_export_then_load_round_trips() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["status", "1.1", "Done"]);
    run_cn_ok(tmp.path(), &["collapse", "2"]);
    let exported = run_cn_ok(tmp.path(), &["export"]);

    let other = tempfile::TempDir::new().unwrap();
    let file = other.path().join("demo.json");
    fs::write(&file, &exported).unwrap();
    run_cn_ok(other.path(), &["load", "file", file.to_str().unwrap()]);

    let reexported = run_cn_ok(other.path(), &["export"]);
    let a: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let b: serde_json::Value = serde_json::from_str(&reexported).unwrap();
    assert_eq!(a["sections"], b["sections"]);
    assert_eq!(a["statuses"], b["statuses"]);
    assert_eq!(a["name"], b["name"]);
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

#[test]
fn test_check_valid_store() {
    let tmp = seeded_store();
    let out = run_cn_ok(tmp.path(), &["check"]);
    assert!(out.contains("workspace is valid"));
}

#[test]
fn test_check_json() {
    let tmp = seeded_store();
    run_cn_ok(tmp.path(), &["rename", "1.1", "Deploy"]);

    let out = run_cn_ok(tmp.path(), &["check", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["warnings"][0]["type"], "duplicate_name");
    assert_eq!(parsed["warnings"][0]["name"], "Deploy");
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_and_show() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_cn_ok(tmp.path(), &["config"]);
    assert!(out.contains("fetch.api_url      = (unset)"));
    assert!(out.contains("ui.display_label   = name"));

    run_cn_ok(tmp.path(), &["config", "set", "ui.display_label", "key"]);
    run_cn_ok(tmp.path(), &["config", "set", "ui.colors.Done", "#00FF00"]);

    let out = run_cn_ok(tmp.path(), &["config"]);
    assert!(out.contains("ui.display_label   = key"));
    assert!(out.contains("ui.colors.Done = #00FF00"));

    let (_out, stderr, success) = run_cn(tmp.path(), &["config", "set", "ui.display_label", "emoji"]);
    assert!(!success);
    assert!(stderr.contains("invalid value"));
}

#[test]
fn test_config_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_cn_ok(tmp.path(), &["config", "path"]);
    assert!(out.trim().ends_with("config.toml"));
}
