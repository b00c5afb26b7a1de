use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

use template_compiler::CompileOptions;

use crate::perform_compile::{compile_file, CompilationResult, EmitKind};

/// Compile `files` on the rayon pool. Results keep the order of `files`.
pub fn parallel_compile(
    files: &[PathBuf],
    options: &CompileOptions,
    emit: EmitKind,
) -> CompilationResult {
    let start = Instant::now();
    log::info!(target: "tplc", "compiling {} templates", files.len());

    let outcomes: Vec<_> = files
        .par_iter()
        .map(|path| (path.clone(), compile_file(path, options, emit)))
        .collect();

    let mut result = CompilationResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(file) => {
                result.files.insert(path, file);
            }
            Err(err) => {
                log::error!(target: "tplc", "{:#}", err);
                result.failures.insert(path, err);
            }
        }
    }

    log::info!(
        target: "tplc",
        "compiled {} templates ({} failed) in {:?}",
        result.files.len(),
        result.failures.len(),
        start.elapsed()
    );
    result
}
