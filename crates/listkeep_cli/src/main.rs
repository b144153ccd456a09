//! Operator entry point for a listkeep database.
//!
//! # Responsibility
//! - Verify `listkeep_core` linkage (`ping`).
//! - Run cross-owner maintenance against one database file.

use clap::{Parser, Subcommand};
use listkeep_core::{
    default_log_level, init_logging, open_db, MaintenanceService, SqliteStorage,
};
use log::{error, LevelFilter};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Maintenance tool for a listkeep database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(global = true, long, default_value = "listkeep.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(global = true, long)]
    log_dir: Option<PathBuf>,

    /// off|error|warn|info|debug|trace. Defaults to debug in debug builds and
    /// info in release builds.
    #[arg(global = true, long)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print core linkage and version.
    Ping,
    /// Delete every association of every owner.
    PurgeAssociations,
    /// Delete every association, item and list.
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("listkeep: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error command={:?} error={err}",
                cli.command
            );
            eprintln!("listkeep: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Ping => {
            println!("listkeep_core ping={}", listkeep_core::ping());
            println!("listkeep_core version={}", listkeep_core::core_version());
        }
        Command::PurgeAssociations => {
            let conn = open_db(&cli.db)?;
            let maintenance = MaintenanceService::new(SqliteStorage::try_new(&conn)?);
            println!("{}", maintenance.purge_all()?.message);
        }
        Command::Reset => {
            let conn = open_db(&cli.db)?;
            let maintenance = MaintenanceService::new(SqliteStorage::try_new(&conn)?);
            println!("{}", maintenance.reset()?.message);
        }
    }
    Ok(())
}
