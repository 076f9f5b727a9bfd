pub mod section;
pub mod tree;
pub mod status;
pub mod project;
pub mod workspace;
pub mod config;

pub use section::*;
pub use tree::*;
pub use status::*;
pub use project::*;
pub use workspace::*;
pub use config::*;
