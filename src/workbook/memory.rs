//! Implements the `Workbook` trait over grids held in memory, for tests.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Cell, Grid};
use crate::workbook::{Edit, Workbook};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Cursor;

/// Sheets keyed by name. `fail_saves` makes every `modify` fail after its edit has run, the way a
/// save to a read-only or vanished file would. `fail_sheet` does the same for one sheet only.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryWorkbook {
    pub(crate) sheets: HashMap<String, Grid>,
    pub(crate) fail_saves: bool,
    pub(crate) fail_sheet: Option<String>,
    pub(crate) saves: usize,
}

impl MemoryWorkbook {
    pub(crate) fn new(sheets: HashMap<String, Grid>) -> Self {
        Self {
            sheets,
            ..Default::default()
        }
    }

    /// Adds (or replaces) a sheet parsed from CSV text. See `parse_cell` for how fields map to
    /// cells.
    pub(crate) fn with_csv(mut self, sheet_name: &str, csv_data: &str) -> Self {
        self.sheets
            .insert(sheet_name.to_string(), load_csv(csv_data).unwrap());
        self
    }

    pub(crate) fn sheet(&self, sheet_name: &str) -> &Grid {
        self.sheets.get(sheet_name).unwrap()
    }
}

#[async_trait::async_trait]
impl Workbook for MemoryWorkbook {
    async fn get(&mut self, sheet_name: &str) -> Result<Grid> {
        self.sheets
            .get(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))
            .pub_result(ErrorType::FileAccess)
            .cloned()
    }

    async fn modify(&mut self, sheet_name: &str, edit: Edit) -> Result<()> {
        let mut grid = self.get(sheet_name).await?;
        edit(&mut grid)
            .with_context(|| format!("Unable to update the sheet '{sheet_name}'"))
            .pub_result(ErrorType::Write)?;
        if self.fail_saves || self.fail_sheet.as_deref() == Some(sheet_name) {
            return Err(Error::new(
                ErrorType::Write,
                anyhow::anyhow!("Unable to save the workbook"),
            ));
        }
        self.sheets.insert(sheet_name.to_string(), grid);
        self.saves += 1;
        Ok(())
    }
}

/// Loads a grid from CSV text. Every record is a row, the first one included.
fn load_csv(csv_data: &str) -> Result<Grid> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Bad CSV").pub_result(ErrorType::Internal)?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok(Grid::new(rows))
}

/// Empty -> `Empty`, `TRUE`/`FALSE` -> `Bool`, `YYYY-MM-DD` -> `Date`, numbers -> `Number`,
/// anything else -> `Text`.
fn parse_cell(field: &str) -> Cell {
    match field {
        "" => Cell::Empty,
        "TRUE" => Cell::Bool(true),
        "FALSE" => Cell::Bool(false),
        _ => {
            if let Ok(d) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
                Cell::Date(d)
            } else if let Ok(n) = field.parse::<f64>() {
                Cell::Number(n)
            } else {
                Cell::from(field)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Res;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(""), Cell::Empty);
        assert_eq!(parse_cell("FALSE"), Cell::Bool(false));
        assert_eq!(parse_cell("12.5"), Cell::Number(12.5));
        assert_eq!(
            parse_cell("2025-01-15"),
            Cell::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
        );
        assert_eq!(parse_cell("Checking"), Cell::from("Checking"));
    }

    #[tokio::test]
    async fn test_modify_is_all_or_nothing() {
        let mut book = MemoryWorkbook::default().with_csv("S", "a,b\n1,2\n");

        let err = book
            .modify(
                "S",
                Box::new(|g: &mut Grid| -> Res<()> {
                    g.set(1, 0, Cell::from("x"));
                    anyhow::bail!("no")
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Write);
        assert_eq!(book.sheet("S").get(1, 0), &Cell::Number(1.0));

        book.fail_saves = true;
        let err = book
            .modify(
                "S",
                Box::new(|g: &mut Grid| -> Res<()> {
                    g.set(1, 0, Cell::from("x"));
                    Ok(())
                }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Write);
        assert_eq!(book.sheet("S").get(1, 0), &Cell::Number(1.0));
        assert_eq!(book.saves, 0);
    }

    #[tokio::test]
    async fn test_missing_sheet() {
        let mut book = MemoryWorkbook::default();
        let err = book.get("Tx").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::FileAccess);
    }
}
