//! `lorrylog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Own the process lifetime of logging and the SQLite connection.
//! - Dispatch to one-shot commands or the interactive shell.

mod commands;
mod output;
mod shell;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::info;
use lorrylog_core::db::{close_db, open_db, Connection};
use lorrylog_core::{
    default_log_level, init_logging, parse_part_name, parse_repair_date, parse_repair_type,
    PartName, RepairType, DEFAULT_HASH_COST,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "lorry_repair.db";

#[derive(Debug, Parser)]
#[command(name = "lorrylog", version, about = "Log and search lorry part repairs")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "LORRYLOG_DB", default_value = DEFAULT_DB_FILE, global = true)]
    db: PathBuf,

    /// Directory for rolling log files. Defaults to `logs/` next to the database.
    #[arg(long, env = "LORRYLOG_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "LORRYLOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// bcrypt work factor for new passwords.
    #[arg(
        long,
        env = "LORRYLOG_HASH_COST",
        default_value_t = DEFAULT_HASH_COST,
        global = true,
        hide = true
    )]
    hash_cost: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and exit.
    Register(Credentials),
    /// Add one repair record.
    Add(AddArgs),
    /// Import repair records from a spreadsheet.
    Import(ImportArgs),
    /// Show the repair history of a vehicle.
    Search(SearchArgs),
    /// Interactive login and menu screens.
    Shell,
}

#[derive(Debug, Clone, Args)]
struct Credentials {
    /// 10-digit phone number.
    #[arg(long)]
    phone: String,

    /// Prompted without echo when omitted.
    #[arg(long, env = "LORRYLOG_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    credentials: Credentials,

    #[arg(long)]
    vehicle: String,

    /// Air Filter, Diesel Filter, Gearbox, Hub, King Pin, Adblue Filter or Others.
    #[arg(long, value_parser = parse_part_name)]
    part: PartName,

    /// Kilometer reading.
    #[arg(long)]
    km: u32,

    /// YYYY-MM-DD, defaults to today.
    #[arg(long, value_parser = parse_repair_date)]
    date: Option<NaiveDate>,

    /// repair or replacement.
    #[arg(long, value_parser = parse_repair_type)]
    repair_type: RepairType,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[command(flatten)]
    credentials: Credentials,

    /// .xlsx/.xls/.xlsm/.xlsb/.ods file with a header row.
    file: PathBuf,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[command(flatten)]
    credentials: Credentials,

    /// Print records as JSON.
    #[arg(long)]
    json: bool,

    vehicle: String,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = absolute(&cli.db)?;
    let log_dir = match &cli.log_dir {
        Some(dir) => absolute(dir)?,
        None => db_path
            .parent()
            .map(|parent| parent.join("logs"))
            .context("database path has no parent directory")?,
    };
    let log_level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
    if let Err(err) = init_logging(log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut conn = open_db(&db_path)
        .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
    info!("event=cli_start module=cli status=ok");

    let outcome = dispatch(&mut conn, cli.command, cli.hash_cost);
    let closed = close_db(conn);
    outcome?;
    closed?;
    Ok(())
}

fn dispatch(conn: &mut Connection, command: Command, hash_cost: u32) -> anyhow::Result<()> {
    match command {
        Command::Register(credentials) => {
            commands::register(conn, &credentials.phone, credentials.password, hash_cost)
        }
        Command::Add(args) => {
            let session = commands::login(conn, &args.credentials, hash_cost)?;
            let date = args
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            commands::add(
                conn,
                &session,
                lorrylog_core::RepairEntry {
                    vehicle_no: args.vehicle,
                    part: args.part,
                    km_reading: args.km,
                    repair_date: date,
                    repair_type: args.repair_type,
                },
            )
        }
        Command::Import(args) => {
            let session = commands::login(conn, &args.credentials, hash_cost)?;
            commands::import(conn, &session, &args.file)
        }
        Command::Search(args) => {
            let session = commands::login(conn, &args.credentials, hash_cost)?;
            commands::search(conn, &session, &args.vehicle, args.json)
        }
        Command::Shell => shell::run(conn, hash_cost),
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}
