//! Login data files for data-driven scenarios
//!
//! Every reader returns rows in file order. A file that cannot be read or
//! parsed is logged and yields no rows.

use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook_auto, Reader};
use serde::Deserialize;
use std::path::Path;

/// One data-driven login case
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRow {
    #[serde(rename = "testName")]
    pub test_name: String,
    pub email: String,
    pub password: String,
    /// `success` when the login is expected to reach My Account
    pub expected: String,
}

impl LoginRow {
    pub fn expects_success(&self) -> bool {
        self.expected.trim().eq_ignore_ascii_case("success")
    }
}

pub fn read_csv_data(path: &Path) -> Vec<LoginRow> {
    match try_read_csv(path) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error reading CSV file: {:#}", e);
            Vec::new()
        }
    }
}

pub fn read_json_data(path: &Path) -> Vec<LoginRow> {
    match try_read_json(path) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error reading JSON file: {:#}", e);
            Vec::new()
        }
    }
}

/// Rows of a spreadsheet; `sheet` defaults to the first sheet.
/// The header row is skipped; columns are testName, email, password, expected.
pub fn read_excel_data(path: &Path, sheet: Option<&str>) -> Vec<LoginRow> {
    match try_read_excel(path, sheet) {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error reading Excel file: {:#}", e);
            Vec::new()
        }
    }
}

/// Pick the reader from the file extension
pub fn read_login_data(path: &Path) -> Vec<LoginRow> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => read_json_data(path),
        Some("csv") => read_csv_data(path),
        Some("xlsx") => read_excel_data(path, None),
        other => {
            log::error!(
                "Unsupported data file type {:?}: {}",
                other.unwrap_or(""),
                path.display()
            );
            Vec::new()
        }
    }
}

fn try_read_csv(path: &Path) -> Result<Vec<LoginRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Invalid row {} in {}", i + 1, path.display())))
        .collect()
}

fn try_read_json(path: &Path) -> Result<Vec<LoginRow>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn try_read_excel(path: &Path, sheet: Option<&str>) -> Result<Vec<LoginRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let sheet = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("No sheets in {}", path.display()))?,
    };
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet '{}'", sheet))?;

    let mut rows = Vec::new();
    for (i, row) in range.rows().enumerate().skip(1) {
        let cells: Vec<String> = row.iter().map(|c| c.to_string().trim().to_string()).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let [test_name, email, password, expected] = match cells.get(..4) {
            Some([a, b, c, d]) => [a.clone(), b.clone(), c.clone(), d.clone()],
            _ => bail!("Row {} of sheet '{}' has {} columns, expected 4", i + 1, sheet, cells.len()),
        };
        rows.push(LoginRow {
            test_name,
            email,
            password,
            expected,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_rows_in_order() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "testName,email,password,expected").unwrap();
        writeln!(file, "valid,user@example.com,secret,success").unwrap();
        writeln!(file, "bad password, user@example.com ,nope,failure").unwrap();

        let rows = read_login_data(file.path());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].test_name, "valid");
        assert!(rows[0].expects_success());
        assert_eq!(rows[1].email, "user@example.com");
        assert!(!rows[1].expects_success());
    }

    fn write_workbook(path: &Path, sheet: &str, rows: &[[&str; 4]]) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_excel_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logindata.xlsx");
        write_workbook(
            &path,
            "Logins",
            &[
                ["testName", "email", "password", "expected"],
                ["valid", "user@example.com", "secret", "success"],
                ["wrong_pw", " user@example.com ", "nope", "failure"],
            ],
        );

        let rows = read_login_data(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].test_name, "valid");
        assert!(rows[0].expects_success());
        assert_eq!(rows[1].test_name, "wrong_pw");
        assert_eq!(rows[1].email, "user@example.com");
        assert!(!rows[1].expects_success());

        assert_eq!(read_excel_data(&path, Some("Logins")), rows);
        assert!(read_excel_data(&path, Some("Missing")).is_empty());
    }

    #[test]
    fn test_json_rows() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"testName":"valid","email":"a@b.c","password":"pw","expected":"success"}}]"#
        )
        .unwrap();

        let rows = read_login_data(file.path());
        assert_eq!(
            rows,
            vec![LoginRow {
                test_name: "valid".into(),
                email: "a@b.c".into(),
                password: "pw".into(),
                expected: "success".into(),
            }]
        );
    }

    #[test]
    fn test_unreadable_file_yields_no_rows() {
        assert!(read_csv_data(Path::new("/no/such/logindata.csv")).is_empty());
        assert!(read_json_data(Path::new("/no/such/logindata.json")).is_empty());

        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "not a workbook").unwrap();
        assert!(read_login_data(file.path()).is_empty());

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "testName,email,password,expected").unwrap();
        assert!(read_login_data(file.path()).is_empty());
    }
}
