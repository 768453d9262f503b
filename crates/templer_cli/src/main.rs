//! templer CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Context error
//! - 4: Template error

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use templer_context::{process_env, ContextError, ContextLoader, ResolveOptions};
use templer_core::UndefinedMode;
use templer_templates::{render_templates, RenderOptions, TemplateError};

mod cli;

use cli::Cli;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONTEXT_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let verbose = cli.verbose;
    match run(cli) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            if verbose >= 2 {
                eprintln!("Error: {:?}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(categorize_error(&e))
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let mut env = process_env();
    env.extend(cli.defines.iter().cloned());

    let undefined = UndefinedMode::from_ignore_flag(cli.ignore_undefined_variables);

    // Context is fully resolved before any template is touched
    let resolve = ResolveOptions::new()
        .type_check(cli.defaults_type_check)
        .dynamic(cli.dynamic_contextfiles)
        .undefined(undefined);
    let ns = ContextLoader::new(resolve)
        .load(&cli.contextfiles, &env)
        .context("Failed to resolve context")?;
    debug!("Resolved {} variable(s)", ns.flat().len());

    let options = RenderOptions::new()
        .force_overwrite(cli.force_overwrite)
        .remove_templates(cli.remove_templates)
        .file_mode(cli.file_mode)
        .undefined(undefined);
    let created = render_templates(&cli.templates, &cli.destination, &ns, &options)
        .context("Failed to render templates")?;

    info!("Rendered {} template(s)", created.len());
    Ok(())
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<ContextError>() {
        match err.root() {
            ContextError::Io(_) => ExitCodes::GENERAL_ERROR,
            _ => ExitCodes::CONTEXT_ERROR,
        }
    } else if let Some(err) = e.downcast_ref::<TemplateError>() {
        match err {
            TemplateError::Io { .. } => ExitCodes::GENERAL_ERROR,
            TemplateError::NoTemplatePaths => ExitCodes::INVALID_ARGS,
            _ => ExitCodes::TEMPLATE_ERROR,
        }
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
