//! One-shot subcommands. Each record command logs in first and goes through
//! the session gate before touching the repair store.

use anyhow::Context;
use dialoguer::Password;
use lorrylog_core::db::Connection;
use lorrylog_core::{
    import_rows, read_repair_rows, RepairEntry, RepairService, Session, SqliteRepairRepository,
    SqliteUserRepository, UserService,
};
use std::path::Path;

use crate::output;
use crate::Credentials;

pub fn register(
    conn: &Connection,
    phone: &str,
    password: Option<String>,
    hash_cost: u32,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password (min 8 characters)")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let users = UserService::with_hash_cost(SqliteUserRepository::try_new(conn)?, hash_cost);
    let mut session = Session::new();
    session.register(&users, phone, &password)?;
    println!("{}", output::registered(phone));
    Ok(())
}

pub fn login(
    conn: &Connection,
    credentials: &Credentials,
    hash_cost: u32,
) -> anyhow::Result<Session> {
    let password = match &credentials.password {
        Some(password) => password.clone(),
        None => Password::new().with_prompt("Password").interact()?,
    };

    let users = UserService::with_hash_cost(SqliteUserRepository::try_new(conn)?, hash_cost);
    let mut session = Session::new();
    session.login(&users, &credentials.phone, &password)?;
    Ok(session)
}

pub fn add(conn: &Connection, session: &Session, entry: RepairEntry) -> anyhow::Result<()> {
    session.require_login()?;
    let repairs = RepairService::new(SqliteRepairRepository::try_new(conn)?);
    repairs.record_repair(&entry)?;
    println!("{}", output::added(&entry.to_new_repair()));
    Ok(())
}

pub fn import(conn: &mut Connection, session: &Session, file: &Path) -> anyhow::Result<()> {
    session.require_login()?;
    let rows = read_repair_rows(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let report = import_rows(conn, &rows)?;
    println!("{}", output::uploaded(report.inserted()));
    Ok(())
}

pub fn search(
    conn: &Connection,
    session: &Session,
    vehicle_no: &str,
    json: bool,
) -> anyhow::Result<()> {
    session.require_login()?;
    let repairs = RepairService::new(SqliteRepairRepository::try_new(conn)?);
    let history = repairs.history(vehicle_no)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        for line in output::history(vehicle_no, &history) {
            println!("{line}");
        }
    }
    Ok(())
}
