//! Perform Compile
//!
//! Per-file compilation, output naming and diagnostic formatting for `tplc`.

use anyhow::{bail, Context};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

use template_compiler::{compile, CompileOptions, ParseError, ParseErrorLevel};

use crate::compile::parallel_compile;
use crate::config::read_configuration;

/// What `tplc` writes for each template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitKind {
    /// JavaScript render function
    #[default]
    Js,
    /// Render function AST as JSON
    Ast,
}

impl EmitKind {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "js" => Ok(EmitKind::Js),
            "ast" => Ok(EmitKind::Ast),
            other => bail!("unknown emit kind {:?}, expected \"js\" or \"ast\"", other),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            EmitKind::Js => "js",
            EmitKind::Ast => "json",
        }
    }
}

/// A template that compiled, possibly with diagnostics.
#[derive(Debug, Clone)]
pub struct CompiledFile {
    pub output: String,
    pub diagnostics: Vec<ParseError>,
}

impl CompiledFile {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == ParseErrorLevel::Error)
    }
}

/// Results keyed by input path, in input order.
#[derive(Debug, Default)]
pub struct CompilationResult {
    pub files: IndexMap<PathBuf, CompiledFile>,
    /// Templates that could not be read or compiled
    pub failures: IndexMap<PathBuf, anyhow::Error>,
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Diagnostics of every compiled file, formatted for the terminal
    pub fn formatted_diagnostics(&self) -> Vec<String> {
        self.files
            .iter()
            .flat_map(|(path, file)| {
                file.diagnostics
                    .iter()
                    .map(move |diag| format_diagnostic(path, diag))
            })
            .collect()
    }
}

/// `file:line:col: level: message`
pub fn format_diagnostic(path: &Path, diagnostic: &ParseError) -> String {
    format!("{}:{}", path.display(), diagnostic)
}

pub fn compile_file(
    path: &Path,
    options: &CompileOptions,
    emit: EmitKind,
) -> anyhow::Result<CompiledFile> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let result = compile(&source, options)
        .with_context(|| format!("failed to compile {}", path.display()))?;

    let output = match emit {
        EmitKind::Js => format!("{}\n", result.code),
        EmitKind::Ast => {
            let json = result
                .render
                .to_json()
                .with_context(|| format!("failed to serialize {}", path.display()))?;
            format!("{}\n", json)
        }
    };

    Ok(CompiledFile {
        output,
        diagnostics: result.diagnostics,
    })
}

/// Path of the file written for `input` in `out_dir`.
pub fn output_path(input: &Path, out_dir: &Path, emit: EmitKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());
    out_dir.join(format!("{}.{}", stem, emit.extension()))
}

/// Write every compiled file to `out_dir`, returning the written paths.
pub fn write_outputs(
    result: &CompilationResult,
    out_dir: &Path,
    emit: EmitKind,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(result.files.len());
    for (input, file) in &result.files {
        let path = output_path(input, out_dir, emit);
        fs::write(&path, &file.output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!(target: "tplc", "{} -> {}", input.display(), path.display());
        written.push(path);
    }
    Ok(written)
}

/// Inputs for one `tplc` run, merged from the command line and an
/// optional project file.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    pub project: Option<PathBuf>,
    pub files: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub emit: EmitKind,
}

/// Resolve `request` against its project file and compile every template.
/// Files and output directory given on the command line take precedence.
pub fn perform_compilation(
    request: &CompileRequest,
) -> anyhow::Result<(CompilationResult, Option<PathBuf>)> {
    let (mut files, mut out_dir, options) = match &request.project {
        Some(project) => {
            let parsed = read_configuration(project)?;
            (parsed.root_names, parsed.out_dir, parsed.options)
        }
        None => (Vec::new(), None, CompileOptions::default()),
    };
    if !request.files.is_empty() {
        files = request.files.clone();
    }
    if request.out_dir.is_some() {
        out_dir = request.out_dir.clone();
    }
    if files.is_empty() {
        bail!("no input files; pass templates or a project with -p");
    }

    let result = parallel_compile(&files, &options, request.emit);
    Ok((result, out_dir))
}
