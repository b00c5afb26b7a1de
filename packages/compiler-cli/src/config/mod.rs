pub mod project;

pub use project::{read_configuration, ParsedConfiguration, ProjectConfig, PROJECT_FILE_NAME};
