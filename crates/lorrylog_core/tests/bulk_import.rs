use lorrylog_core::db::open_db_in_memory;
use lorrylog_core::{
    import_rows, ImportError, NewRepair, RepairRepository, RepoError, SqliteRepairRepository,
};

fn row(vehicle_no: &str, part_name: &str, km_reading: u32, repair_date: &str) -> NewRepair {
    NewRepair {
        vehicle_no: vehicle_no.to_string(),
        part_name: part_name.to_string(),
        km_reading,
        repair_date: repair_date.to_string(),
        repair_type: "Replacement".to_string(),
    }
}

#[test]
fn three_rows_are_appended_in_order_verbatim() {
    let mut conn = open_db_in_memory().unwrap();
    let rows = vec![
        row("TN01AB1234", "Air Filter", 10000, "2024-01-01"),
        row("TN01AB1234", "Brake Drum", 20000, "15/02/2024"),
        row("MH12CD5678", "Hub", 30000, "2024-03-01 00:00:00"),
    ];

    let report = import_rows(&mut conn, &rows).unwrap();
    assert_eq!(report.inserted(), 3);

    let repo = SqliteRepairRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 3);
    let first_vehicle = repo.list_by_vehicle("TN01AB1234").unwrap();
    assert_eq!(
        first_vehicle
            .iter()
            .map(|record| record.to_new_repair())
            .collect::<Vec<_>>(),
        rows[..2].to_vec()
    );
    assert_eq!(
        first_vehicle
            .iter()
            .map(|record| record.id)
            .collect::<Vec<_>>(),
        report.record_ids[..2].to_vec()
    );
    let second_vehicle = repo.list_by_vehicle("MH12CD5678").unwrap();
    assert_eq!(second_vehicle[0].to_new_repair(), rows[2]);
}

#[test]
fn empty_import_commits_nothing() {
    let mut conn = open_db_in_memory().unwrap();

    let report = import_rows(&mut conn, &[]).unwrap();

    assert_eq!(report.inserted(), 0);
    let repo = SqliteRepairRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn failing_row_rolls_back_whole_import() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_blocked_vehicle
         BEFORE INSERT ON repairs
         WHEN NEW.vehicle_no = 'BLOCKED'
         BEGIN
             SELECT RAISE(ABORT, 'blocked vehicle');
         END;",
    )
    .unwrap();

    let rows = vec![
        row("TN01AB1234", "Gearbox", 100, "2024-01-01"),
        row("BLOCKED", "Gearbox", 200, "2024-01-02"),
        row("TN01AB1234", "Gearbox", 300, "2024-01-03"),
    ];

    let err = import_rows(&mut conn, &rows).unwrap_err();
    match err {
        ImportError::Row { row, source } => {
            assert_eq!(row, 2);
            assert!(matches!(source, RepoError::Db(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    let repo = SqliteRepairRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn import_after_rollback_still_succeeds() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_blocked_vehicle
         BEFORE INSERT ON repairs
         WHEN NEW.vehicle_no = 'BLOCKED'
         BEGIN
             SELECT RAISE(ABORT, 'blocked vehicle');
         END;",
    )
    .unwrap();

    import_rows(&mut conn, &[row("BLOCKED", "Hub", 1, "2024-01-01")]).unwrap_err();
    let report = import_rows(&mut conn, &[row("TN01AB1234", "Hub", 1, "2024-01-01")]).unwrap();

    assert_eq!(report.inserted(), 1);
}
