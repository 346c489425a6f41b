//! Interactive screens: a login/registration gate followed by the three
//! record pages (manual entry, spreadsheet upload, vehicle search).

use dialoguer::{Input, Password, Select};
use log::warn;
use lorrylog_core::db::Connection;
use lorrylog_core::{
    import_rows, parse_repair_date, read_repair_rows, PartName, RepairEntry, RepairService,
    RepairType, Session, SqliteRepairRepository, SqliteUserRepository, UserService,
};

use crate::output;

const GATE_ITEMS: [&str; 3] = ["Login", "Register", "Quit"];
const MENU_ITEMS: [&str; 4] = [
    "Add Data One by One",
    "Upload Excel File",
    "Search Vehicle History",
    "Quit",
];

pub fn run(conn: &mut Connection, hash_cost: u32) -> anyhow::Result<()> {
    let mut session = Session::new();
    if !login_screen(conn, &mut session, hash_cost)? {
        return Ok(());
    }

    loop {
        let choice = Select::new()
            .with_prompt("Go to")
            .items(&MENU_ITEMS)
            .default(0)
            .interact()?;

        // A failed page is reported and the menu shown again.
        let outcome = match choice {
            0 => add_page(conn, &session),
            1 => upload_page(conn, &session),
            2 => search_page(conn, &session),
            _ => return Ok(()),
        };
        if let Err(err) = outcome {
            warn!("event=shell_page module=cli status=error page={choice}");
            eprintln!("error: {err:#}");
        }
    }
}

/// Returns `false` when the user quits before logging in.
fn login_screen(
    conn: &Connection,
    session: &mut Session,
    hash_cost: u32,
) -> anyhow::Result<bool> {
    let users = UserService::with_hash_cost(SqliteUserRepository::try_new(conn)?, hash_cost);

    while !session.is_logged_in() {
        let choice = Select::new()
            .with_prompt("Login or register")
            .items(&GATE_ITEMS)
            .default(0)
            .interact()?;
        if choice == 2 {
            return Ok(false);
        }

        let phone: String = Input::new()
            .with_prompt("Phone number (10 digits)")
            .interact_text()?;
        let attempt = if choice == 0 {
            let password = Password::new().with_prompt("Password").interact()?;
            session.login(&users, &phone, &password)
        } else {
            let password = Password::new()
                .with_prompt("Password (min 8 characters)")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?;
            session.register(&users, &phone, &password)
        };

        match attempt {
            Ok(()) => println!("Logged in as {phone}"),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(true)
}

fn add_page(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    session.require_login()?;

    let vehicle_no: String = Input::new()
        .with_prompt("Vehicle Number")
        .allow_empty(true)
        .interact_text()?;
    let part_labels = PartName::ALL.map(PartName::label);
    let part = PartName::ALL[Select::new()
        .with_prompt("Part")
        .items(&part_labels)
        .default(0)
        .interact()?];
    let km_reading: u32 = Input::new()
        .with_prompt("Kilometer Reading")
        .default(0)
        .interact_text()?;
    let today = chrono::Local::now().date_naive();
    let date_text: String = Input::new()
        .with_prompt("Repair/Change Date (YYYY-MM-DD)")
        .default(today.to_string())
        .validate_with(|input: &String| parse_repair_date(input).map(|_| ()))
        .interact_text()?;
    let type_labels = RepairType::ALL.map(RepairType::label);
    let repair_type = RepairType::ALL[Select::new()
        .with_prompt("Repair Type")
        .items(&type_labels)
        .default(0)
        .interact()?];

    let entry = RepairEntry {
        vehicle_no,
        part,
        km_reading,
        repair_date: parse_repair_date(&date_text)?,
        repair_type,
    };
    let repairs = RepairService::new(SqliteRepairRepository::try_new(conn)?);
    repairs.record_repair(&entry)?;
    println!("{}", output::added(&entry.to_new_repair()));
    Ok(())
}

fn upload_page(conn: &mut Connection, session: &Session) -> anyhow::Result<()> {
    session.require_login()?;

    let path: String = Input::new()
        .with_prompt("Excel file path")
        .interact_text()?;
    let rows = read_repair_rows(path.trim())?;
    let report = import_rows(conn, &rows)?;
    println!("{}", output::uploaded(report.inserted()));
    Ok(())
}

fn search_page(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    session.require_login()?;

    let vehicle_no: String = Input::new()
        .with_prompt("Enter Vehicle Number to Search")
        .allow_empty(true)
        .interact_text()?;
    let repairs = RepairService::new(SqliteRepairRepository::try_new(conn)?);
    for line in output::history(&vehicle_no, &repairs.history(&vehicle_no)?) {
        println!("{line}");
    }
    Ok(())
}
