use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cn", about = concat!("[~] canopy v", env!("CARGO_PKG_VERSION"), " - status trees for project hierarchies"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different store directory
    #[arg(short = 'S', long = "store", global = true)]
    pub store: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load sections into a new project
    Load(LoadCmd),
    /// Print the section tree, or a subtree
    Show(ShowArgs),
    /// List sections as flat rows
    List(ListArgs),
    /// Set a section's status
    Status(StatusArgs),
    /// List or edit the status palette
    Statuses(StatusesCmd),
    /// Add a section
    Add(AddArgs),
    /// Delete a section and its subtree
    Rm(RmArgs),
    /// Swap the positions of two sections
    Swap(SwapArgs),
    /// Rename a section
    Rename(RenameArgs),
    /// Change a section's key
    Rekey(RekeyArgs),
    /// Toggle a section's collapsed flag
    Collapse(CollapseArgs),
    /// List or manage projects
    Projects(ProjectsCmd),
    /// Export the current project as JSON
    Export(ExportArgs),
    /// Validate workspace integrity
    Check,
    /// Search sections by regex
    Search(SearchArgs),
    /// Show status counts and tree shape
    Stats,
    /// View or edit configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoadCmd {
    #[command(subcommand)]
    pub source: LoadSource,
}

#[derive(Subcommand)]
pub enum LoadSource {
    /// Load a named model (local models dir, built-in, or remote)
    Model(LoadModelArgs),
    /// Fetch a section array from a URL
    Url(LoadUrlArgs),
    /// Read sections from a JSON file
    File(LoadFileArgs),
    /// Parse sections from a JSON argument (or stdin)
    Json(LoadJsonArgs),
}

#[derive(Args)]
pub struct LoadModelArgs {
    /// Model name (try `blank` or `bug-tracking`)
    pub model: String,
    /// Project name (default: the model name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct LoadUrlArgs {
    /// URL returning a JSON section array
    pub url: String,
    /// Project name (default: the last path segment)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct LoadFileArgs {
    /// JSON file: a bare section array or an exported project
    pub file: String,
    /// Project name (default: the file stem)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct LoadJsonArgs {
    /// JSON text (omit to read from stdin)
    pub text: Option<String>,
    /// Project name (default: "User Input Project")
    #[arg(long)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Subtree root key (default: the whole tree)
    pub key: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status name (empty string matches unset)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern, matched case-insensitively against keys and names
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StatusArgs {
    /// Section key
    pub key: String,
    /// Status name to set
    pub status: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Key for the new section
    pub key: String,
    /// Display name
    pub name: String,
    /// Add as the last child of this section
    #[arg(long, conflicts_with_all = ["after", "root"])]
    pub under: Option<String>,
    /// Add directly after this sibling
    #[arg(long, conflicts_with = "root")]
    pub after: Option<String>,
    /// Add as a new root section (the default placement)
    #[arg(long)]
    pub root: bool,
    /// Initial status (default: unset)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Key of the section to delete (descendants go with it)
    pub key: String,
}

#[derive(Args)]
pub struct SwapArgs {
    /// First section key
    pub key_a: String,
    /// Second section key
    pub key_b: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Section key
    pub key: String,
    /// New display name
    pub name: String,
}

#[derive(Args)]
pub struct RekeyArgs {
    /// Current section key
    pub key: String,
    /// New section key
    pub new_key: String,
}

#[derive(Args)]
pub struct CollapseArgs {
    /// Section key
    pub key: String,
}

// ---------------------------------------------------------------------------
// Status palette
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StatusesCmd {
    #[command(subcommand)]
    pub action: Option<StatusesAction>,
}

#[derive(Subcommand)]
pub enum StatusesAction {
    /// Append a status (it becomes the most advanced)
    Add(StatusesAddArgs),
    /// Replace the status at an index, keeping its position
    Set(StatusesSetArgs),
    /// Remove the status at an index
    Rm(StatusesRmArgs),
}

#[derive(Args)]
pub struct StatusesAddArgs {
    /// Status name
    pub name: String,
    /// Hex color like #BAFFC9 (default: next palette color)
    pub color: Option<String>,
}

#[derive(Args)]
pub struct StatusesSetArgs {
    /// Index in the palette (0 = least advanced)
    pub index: usize,
    /// New status name
    pub name: String,
    /// New hex color (default: keep the current one)
    pub color: Option<String>,
}

#[derive(Args)]
pub struct StatusesRmArgs {
    /// Index in the palette (0 = least advanced)
    pub index: usize,
}

// ---------------------------------------------------------------------------
// Project management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: Option<ProjectsAction>,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects (default)
    List,
    /// Switch to a project by id or name
    Use(ProjectsUseArgs),
    /// Rename a project
    Rename(ProjectsRenameArgs),
    /// Delete a project
    Rm(ProjectsRmArgs),
}

#[derive(Args)]
pub struct ProjectsUseArgs {
    /// Project id or exact name
    pub project: String,
}

#[derive(Args)]
pub struct ProjectsRenameArgs {
    /// Project id or exact name
    pub project: String,
    /// New project name
    pub name: String,
}

#[derive(Args)]
pub struct ProjectsRmArgs {
    /// Project id or exact name
    pub project: String,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    pub path: Option<String>,
    /// Emit the bare section array instead of the full project
    #[arg(long)]
    pub sections_only: bool,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a config value (e.g. `cn config set fetch.api_url https://...`)
    Set(ConfigSetArgs),
    /// Print the absolute path to config.toml
    Path,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key: fetch.api_url, fetch.timeout_secs, ui.display_label,
    /// or ui.colors.<status>
    pub key: String,
    /// Value to set
    pub value: String,
}
