//! The event expression checker CLI.
//!
//! Provides the `evexprc` command with the following subcommands:
//!
//! - `evexprc check <expr>` - Parse and validate an expression
//! - `evexprc tokens <expr>` - Print the token stream
//! - `evexprc ast <expr>` - Print the syntax tree
//!
//! Options of `check`:
//! - `--expected` - Type the expression must have (default `number`)
//! - `--metadata` - Extra JSON metadata catalog (repeatable)
//! - `--project` - `evexpr.toml` manifest with catalogs and objects
//! - `--no-builtins` - Do not register the built-in extensions
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//!
//! Logging goes to stderr and is controlled by `EVEXPR_LOG` (default `warn`).

mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use evexpr_check::diagnostics::{render_diagnostic, DiagnosticOptions};
use evexpr_check::{check_expression, SemanticType};
use evexpr_lexer::Lexer;
use evexpr_metadata::{MetadataError, ObjectsScope, Platform};

use crate::manifest::{Manifest, ManifestError};

#[derive(Parser)]
#[command(name = "evexprc", version, about = "Checker for event sheet expressions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate an expression
    Check {
        /// The expression text
        expression: String,

        /// Type the expression must have: number, string, number|string,
        /// variable, object, boolean, unknown or empty
        #[arg(long, default_value = "number")]
        expected: SemanticType,

        /// Extra JSON metadata catalog (repeatable)
        #[arg(long = "metadata", value_name = "FILE")]
        metadata: Vec<PathBuf>,

        /// Project manifest listing catalogs and declared objects
        #[arg(long, value_name = "EVEXPR_TOML")]
        project: Option<PathBuf>,

        /// Do not register the built-in extensions
        #[arg(long = "no-builtins")]
        no_builtins: bool,

        /// Output diagnostics as JSON (one object per line) instead of human-readable format
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long = "no-color")]
        no_color: bool,
    },
    /// Print the tokens of an expression
    Tokens {
        /// The expression text
        expression: String,
    },
    /// Print the syntax tree of an expression
    Ast {
        /// The expression text
        expression: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("EVEXPR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            expression,
            expected,
            metadata,
            project,
            no_builtins,
            json,
            no_color,
        } => {
            let diag_opts = DiagnosticOptions {
                color: !no_color && !json,
                json,
            };
            let context = match load_context(project.as_deref(), &metadata, no_builtins) {
                Ok(context) => context,
                Err(e) => {
                    if json {
                        // In JSON mode, emit the setup error as JSON too.
                        let msg = serde_json::json!({
                            "code": "setup_error",
                            "severity": "error",
                            "message": e.to_string(),
                            "file": "",
                            "spans": [],
                            "fix": null
                        });
                        eprintln!("{}", msg);
                    } else {
                        eprintln!("error: {}", e);
                    }
                    process::exit(1);
                }
            };
            let has_errors = check(&expression, expected, &context, &diag_opts);
            if has_errors {
                process::exit(1);
            }
        }
        Commands::Tokens { expression } => {
            for token in Lexer::tokenize(&expression) {
                println!(
                    "{:?} {:?} {}..{}",
                    token.kind, token.text, token.span.start, token.span.end
                );
            }
        }
        Commands::Ast { expression } => {
            let parse = evexpr_parser::parse(&expression);
            print!("{}", evexpr_parser::debug_tree(parse.root()));
            for error in parse.errors() {
                eprintln!("{}", error.to_diagnostic());
            }
            if !parse.ok() {
                process::exit(1);
            }
        }
    }
}

/// Everything an expression is checked against.
struct Context {
    platform: Platform,
    objects: ObjectsScope,
}

/// Build the platform and declared objects from the manifest (if any) and
/// the catalogs given on the command line.
fn load_context(
    project: Option<&Path>,
    metadata: &[PathBuf],
    no_builtins: bool,
) -> Result<Context, CliError> {
    let manifest = project.map(Manifest::from_file).transpose()?;

    let builtins = !no_builtins && manifest.as_ref().map_or(true, |m| m.builtins);
    let mut platform = if builtins {
        Platform::with_builtins()
    } else {
        Platform::new()
    };

    let mut catalogs = Vec::new();
    if let (Some(manifest), Some(path)) = (&manifest, project) {
        let manifest_dir = path.parent().unwrap_or_else(|| Path::new("."));
        catalogs.extend(manifest.metadata_paths(manifest_dir));
    }
    catalogs.extend(metadata.iter().cloned());
    for catalog in &catalogs {
        debug!(path = %catalog.display(), "loading catalog");
        platform.load(catalog)?;
    }

    let objects = manifest
        .as_ref()
        .map(Manifest::objects_scope)
        .unwrap_or_default();

    info!(
        extensions = platform.extensions().len(),
        expressions = platform.expression_count(),
        "platform ready"
    );
    Ok(Context { platform, objects })
}

/// Check one expression and report its diagnostics on stderr. The resolved
/// type goes to stdout. Returns true if there are any errors.
fn check(
    expression: &str,
    expected: SemanticType,
    context: &Context,
    diag_opts: &DiagnosticOptions,
) -> bool {
    let report = check_expression(expression, expected, &context.platform, &context.objects);

    for diagnostic in &report.diagnostics {
        let rendered = render_diagnostic(diagnostic, expression, "<expression>", diag_opts);
        if diag_opts.json {
            eprintln!("{}", rendered);
        } else {
            eprint!("{}", rendered);
        }
    }

    if diag_opts.json {
        let summary = serde_json::json!({
            "type": report.ty,
            "errors": report.errors().count(),
            "warnings": report.warnings().count(),
        });
        println!("{}", summary);
    } else {
        println!("type: {}", report.ty);
    }

    report.has_errors()
}
