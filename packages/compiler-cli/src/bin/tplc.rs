/**
 * Template Compiler CLI - tplc
 *
 * Compiles templates into render functions.
 */
use clap::{Arg, ArgAction, Command};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use template_compiler_cli::config::PROJECT_FILE_NAME;
use template_compiler_cli::logging;
use template_compiler_cli::perform_compile::{
    perform_compilation, write_outputs, CompileRequest, EmitKind,
};

fn command() -> Command {
    Command::new("tplc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Template compiler: HTML templates to render functions")
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .num_args(0..)
                .help("Template files to compile"),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PATH")
                .help("Path to tplc.json or a directory containing it"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .help("Write outputs to DIR instead of stdout"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .value_name("KIND")
                .value_parser(["js", "ast"])
                .default_value("js")
                .help("Emit JavaScript or the render function AST as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more; repeat for debug and trace output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Disable logging"),
        )
}

fn main() -> ExitCode {
    let matches = command().get_matches();

    let level = logging::level_from_flags(
        matches.get_count("verbose"),
        matches.get_flag("quiet"),
    );
    if let Err(err) = logging::init(level) {
        eprintln!("warning: {}", err);
    }

    let project = matches
        .get_one::<String>("project")
        .map(PathBuf::from)
        .or_else(|| {
            // Fall back to a project file in the working directory
            let default = Path::new(PROJECT_FILE_NAME);
            let has_files = matches.get_many::<String>("files").is_some();
            (!has_files && default.exists()).then(|| default.to_path_buf())
        });
    let emit = match matches.get_one::<String>("emit").map(|s| EmitKind::parse(s)) {
        Some(Ok(emit)) => emit,
        Some(Err(err)) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
        None => EmitKind::default(),
    };
    let request = CompileRequest {
        project,
        files: matches
            .get_many::<String>("files")
            .map(|files| files.map(PathBuf::from).collect())
            .unwrap_or_default(),
        out_dir: matches.get_one::<String>("out-dir").map(PathBuf::from),
        emit,
    };

    let (result, out_dir) = match perform_compilation(&request) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in result.formatted_diagnostics() {
        eprintln!("{}", diagnostic);
    }

    match out_dir {
        Some(dir) => {
            if let Err(err) = write_outputs(&result, &dir, emit) {
                eprintln!("error: {:#}", err);
                return ExitCode::FAILURE;
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let many = result.files.len() > 1;
            for (path, file) in &result.files {
                let written = if many {
                    writeln!(out, "// {}", path.display()).and_then(|_| out.write_all(file.output.as_bytes()))
                } else {
                    out.write_all(file.output.as_bytes())
                };
                if let Err(err) = written {
                    eprintln!("error: {}", err);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    for (path, err) in &result.failures {
        eprintln!("error: {}: {:#}", path.display(), err);
    }
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
