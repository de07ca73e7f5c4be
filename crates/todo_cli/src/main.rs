//! `todo` executable.
//!
//! # Responsibility
//! - Load configuration, start logging, open the database.
//! - Run one command under a request deadline and print JSON.

mod commands;
mod settings;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use commands::Cli;
use log::{info, warn};
use settings::Settings;
use std::process::ExitCode;
use todo_core::db::open_db;
use todo_core::{init_logging, RequestContext};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", serde_json::json!({ "error": "startup", "message": format!("{err:#}") }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = Settings::load().context("failed to load configuration")?;
    if let Some(path) = cli.db {
        settings.database.path = path;
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(dir) = cli.log_dir {
        settings.logging.dir = Some(dir);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        settings.request.timeout_ms = timeout_ms;
    }

    if let Some(dir) = settings.logging.dir.as_deref() {
        init_logging(&settings.logging.level, dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    let conn = open_db(&settings.database.path).with_context(|| {
        format!(
            "failed to open database `{}`",
            settings.database.path.display()
        )
    })?;

    let ctx = RequestContext::with_timeout(settings.request.timeout());
    match cli.command.execute(&conn, &ctx) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            info!("event=cli_command module=cli status=ok");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("{}", failure.to_json());
            warn!(
                "event=cli_command module=cli status=error error_code={}",
                failure.kind.code()
            );
            Ok(ExitCode::from(failure.exit_code()))
        }
    }
}
