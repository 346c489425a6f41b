use lorrylog_core::db::open_db_in_memory;
use lorrylog_core::{
    import_rows, read_repair_rows, RepairRepository, SheetError, SqliteRepairRepository,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

// Style 1 is the built-in short date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;

const HEADER: [&str; 5] = [
    "Vehicle Number",
    "Part Name",
    "KM Reading",
    "Repair Date",
    "Repair Type",
];

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Date(f64),
}

fn write_workbook(path: &Path, date1904: bool, rows: &[[Cell<'_>; 5]]) {
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr date1904="{}"/>
<sheets><sheet name="Repairs" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
        if date1904 { "1" } else { "0" }
    );

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    let header: [Cell<'_>; 5] = HEADER.map(Cell::Text);
    for (index, cells) in std::iter::once(&header).chain(rows).enumerate() {
        let row = index + 1;
        sheet.push_str(&format!(r#"<row r="{row}">"#));
        for (col, cell) in cells.iter().enumerate() {
            let reference = format!("{}{row}", char::from(b'A' + col as u8));
            let xml = match cell {
                Cell::Text(value) => {
                    format!(r#"<c r="{reference}" t="inlineStr"><is><t>{value}</t></is></c>"#)
                }
                Cell::Number(value) => format!(r#"<c r="{reference}"><v>{value}</v></c>"#),
                Cell::Date(serial) => {
                    format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#)
                }
            };
            sheet.push_str(&xml);
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", ROOT_RELS),
        ("xl/workbook.xml", workbook.as_str()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
        ("xl/styles.xml", STYLES),
        ("xl/worksheets/sheet1.xml", sheet.as_str()),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn three_row_workbook_is_read_and_imported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("repairs.xlsx");
    write_workbook(
        &path,
        false,
        &[
            [
                Cell::Text("TN01AB1234"),
                Cell::Text("Hub"),
                Cell::Number(45000.0),
                Cell::Date(45306.0),
                Cell::Text("Repair"),
            ],
            [
                Cell::Text("TN01AB1234"),
                Cell::Text("Gearbox"),
                Cell::Number(47500.0),
                Cell::Text("2024-03-02"),
                Cell::Text("Replacement"),
            ],
            [
                Cell::Text("KA05XY9999"),
                Cell::Text("Air Filter"),
                Cell::Number(12000.0),
                Cell::Text("2024-04-10"),
                Cell::Text("Replacement"),
            ],
        ],
    );

    let rows = read_repair_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);

    let mut conn = open_db_in_memory().unwrap();
    let report = import_rows(&mut conn, &rows).unwrap();
    assert_eq!(report.inserted(), 3);

    let repo = SqliteRepairRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 3);
    let history = repo.list_by_vehicle("TN01AB1234").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].part_name, "Hub");
    assert_eq!(history[0].km_reading, 45000);
    assert_eq!(history[0].repair_date, "2024-01-15");
    assert_eq!(history[1].repair_date, "2024-03-02");
}

#[test]
fn workbook_in_1904_date_system_keeps_calendar_dates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mac.xlsx");
    write_workbook(
        &path,
        true,
        &[[
            Cell::Text("MH12CD5678"),
            Cell::Text("King Pin"),
            Cell::Number(80000.0),
            Cell::Date(43844.0),
            Cell::Text("Repair"),
        ]],
    );

    let rows = read_repair_rows(&path).unwrap();
    assert_eq!(rows[0].repair_date, "2024-01-15");
}

#[test]
fn missing_workbook_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_repair_rows(dir.path().join("absent.xlsx")).unwrap_err();
    assert!(matches!(err, SheetError::Open(_)), "{err}");
}
