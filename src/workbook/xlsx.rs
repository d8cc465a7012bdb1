//! Implements the `Workbook` trait for `.xlsx` and `.xlsm` files on disk.
//!
//! Reads go through `calamine`, which returns the values the workbook last computed (formulas
//! are seen as their cached results). Writes go through `umya-spreadsheet`, which rewrites the file
//! while keeping the other sheets, the styles and the VBA project of an `.xlsm` intact.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Cell, Grid};
use crate::workbook::lock::LockFile;
use crate::workbook::{Edit, Workbook};
use crate::Result;
use anyhow::Context;
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use umya_spreadsheet::{Spreadsheet, Worksheet};
use uuid::Uuid;

const DATE_FORMAT_CODE: &str = "yyyy-mm-dd";

/// A workbook file on disk.
#[derive(Debug, Clone)]
pub(crate) struct XlsxWorkbook {
    path: PathBuf,
}

impl XlsxWorkbook {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Workbook for XlsxWorkbook {
    async fn get(&mut self, sheet_name: &str) -> Result<Grid> {
        trace!("get for {sheet_name}");
        let path = self.path.clone();
        let sheet_name = sheet_name.to_string();
        blocking(move || read_grid(&path, &sheet_name)).await
    }

    async fn modify(&mut self, sheet_name: &str, edit: Edit) -> Result<()> {
        trace!("modify for {sheet_name}");
        let path = self.path.clone();
        let sheet_name = sheet_name.to_string();
        blocking(move || modify_sheet(&path, &sheet_name, edit)).await
    }
}

/// Runs blocking file work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("The workbook task did not complete")
        .pub_result(ErrorType::Internal)?
}

/// Reads a sheet into a `Grid` whose row 0 is the sheet's first row.
fn read_grid(path: &Path, sheet_name: &str) -> Result<Grid> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Unable to open the workbook {}", path.display()))
        .pub_result(ErrorType::FileAccess)?;
    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| {
            format!(
                "Unable to read a sheet named '{sheet_name}' in {}",
                path.display()
            )
        })
        .pub_result(ErrorType::FileAccess)?;
    Ok(grid_from_range(&range))
}

fn grid_from_range(range: &Range<Data>) -> Grid {
    let mut grid = Grid::default();
    let Some((row0, col0)) = range.start() else {
        return grid;
    };
    for (r, row) in range.rows().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let cell = cell_from_data(value);
            if !cell.is_empty() {
                grid.set(row0 as usize + r, col0 as usize + c, cell);
            }
        }
    }
    if let Some((end_row, _)) = range.end() {
        grid.pad_to(end_row as usize + 1);
    }
    grid
}

fn cell_from_data(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::Date(dt.date()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// Locks the workbook, applies `edit` to the sheet, and saves. The original file is only replaced
/// once the complete new file has been written.
fn modify_sheet(path: &Path, sheet_name: &str, edit: Edit) -> Result<()> {
    let _lock = LockFile::acquire(path)?;

    let mut grid = read_grid(path, sheet_name)?;
    let (rows_before, cols_before) = (grid.len(), grid.width());

    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .with_context(|| format!("Unable to open the workbook {}", path.display()))
        .pub_result(ErrorType::FileAccess)?;

    edit(&mut grid)
        .with_context(|| format!("Unable to update the sheet '{sheet_name}'"))
        .pub_result(ErrorType::Write)?;

    let sheet = book.get_sheet_by_name_mut(sheet_name).ok_or_else(|| {
        Error::new(
            ErrorType::FileAccess,
            anyhow::anyhow!("No sheet named '{sheet_name}' in {}", path.display()),
        )
    })?;
    write_grid(sheet, &grid, rows_before, cols_before);
    save(&book, path)?;
    debug!(
        "Saved '{sheet_name}' ({} rows) to {}",
        grid.len(),
        path.display()
    );
    Ok(())
}

/// Writes every cell of `grid` into `sheet`. Cells inside the previous `rows_before` x
/// `cols_before` extent that are empty in `grid` are removed. Date cells keep a date format they
/// already have and get `yyyy-mm-dd` otherwise.
pub(super) fn write_grid(sheet: &mut Worksheet, grid: &Grid, rows_before: usize, cols_before: usize) {
    let rows = grid.len().max(rows_before);
    let cols = grid.width().max(cols_before);
    for r in 0..rows {
        for c in 0..cols {
            let coordinate = (c as u32 + 1, r as u32 + 1);
            let cell = grid.get(r, c);
            if cell.is_empty() {
                sheet.remove_cell(coordinate);
                continue;
            }
            let target = sheet.get_cell_mut(coordinate);
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    target.set_value_string(s.clone());
                }
                Cell::Number(n) => {
                    target.set_value_number(*n);
                }
                Cell::Bool(b) => {
                    target.set_value_bool(*b);
                }
                Cell::Date(d) => {
                    target.set_value_number(excel_serial(*d));
                    if !has_date_format(target) {
                        target
                            .get_style_mut()
                            .get_number_format_mut()
                            .set_format_code(DATE_FORMAT_CODE);
                    }
                }
            }
        }
    }
    if let Some(range) = grid.auto_filter() {
        sheet.set_auto_filter(range.to_string());
    }
}

/// Whether the cell is already formatted as a date, either by a built-in date format (ids 14 to
/// 22) or by a custom code with a year or day part.
fn has_date_format(cell: &umya_spreadsheet::Cell) -> bool {
    let Some(format) = cell.get_style().get_number_format() else {
        return false;
    };
    if (14..=22).contains(format.get_number_format_id()) {
        return true;
    }
    let code = format.get_format_code().to_lowercase();
    code.contains('y') || code.contains('d')
}

/// Days since 1899-12-30, the epoch of the 1900 date system.
fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    (date - epoch).num_days() as f64
}

/// Writes the workbook to a temporary file next to `path` and renames it over `path`.
fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{name}", Uuid::new_v4().simple()));

    let result = umya_spreadsheet::writer::xlsx::write(book, &tmp)
        .with_context(|| format!("Unable to write {}", tmp.display()))
        .and_then(|_| {
            std::fs::rename(&tmp, path).with_context(|| {
                format!(
                    "Unable to replace {}, is it open in another program?",
                    path.display()
                )
            })
        })
        .pub_result(ErrorType::Write);

    if result.is_err() && tmp.exists() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
