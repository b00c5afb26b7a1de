use anyhow::{bail, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use template_compiler::CompileOptions;

/// Default project file looked up in a project directory
pub const PROJECT_FILE_NAME: &str = "tplc.json";

/// Contents of a `tplc.json` project file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub files: Vec<String>,
    pub out_dir: Option<String>,
    #[serde(default)]
    pub compiler_options: CompileOptions,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read project file {}", path.display()))?;
        let config: ProjectConfig = serde_json::from_str(&content)
            .with_context(|| format!("invalid project file {}", path.display()))?;
        config
            .compiler_options
            .validate()
            .with_context(|| format!("invalid compilerOptions in {}", path.display()))?;
        Ok(config)
    }
}

/// A project file with its paths resolved against the project directory.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfiguration {
    /// Path to the project file
    pub project: PathBuf,
    pub root_names: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub options: CompileOptions,
}

/// Read the project at `project`: either a project file or a directory
/// containing `tplc.json`.
pub fn read_configuration(project: &Path) -> anyhow::Result<ParsedConfiguration> {
    let (config_path, base_dir) = if project.is_dir() {
        (project.join(PROJECT_FILE_NAME), project.to_path_buf())
    } else if project.exists() {
        let base = project.parent().unwrap_or(Path::new(".")).to_path_buf();
        (project.to_path_buf(), base)
    } else {
        bail!("project path does not exist: {}", project.display());
    };

    let config = ProjectConfig::load(&config_path)?;
    log::debug!(
        target: "tplc",
        "loaded {} with {} files",
        config_path.display(),
        config.files.len()
    );

    Ok(ParsedConfiguration {
        project: config_path,
        root_names: config.files.iter().map(|f| base_dir.join(f)).collect(),
        out_dir: config.out_dir.as_ref().map(|d| base_dir.join(d)),
        options: config.compiler_options,
    })
}
