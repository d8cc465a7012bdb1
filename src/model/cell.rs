//! Cells, raw sheet grids and header-addressed tables.

use crate::model::{Amount, CellRange, CellRef};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// An empty string counts as empty, the same as a cell that was never written.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interprets the cell as a calendar date. Text is accepted in ISO form, with or without a
    /// time component.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<Amount> for Cell {
    fn from(value: Amount) -> Self {
        Cell::Number(value.to_f64())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Orders rows by the date found in column `col`, newest first. Rows without a date go last and
/// the sort is stable, so rows with equal dates keep their relative order.
pub(crate) fn sort_rows_by_date_desc(rows: &mut [Vec<Cell>], col: usize) {
    rows.sort_by(|a, b| {
        let a = a.get(col).and_then(Cell::as_date);
        let b = b.get(col).and_then(Cell::as_date);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// The raw content of one sheet: every row up to the sheet's reported last row, including the
/// header row and any trailing blank rows. Row and column indexes are 0-based.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    auto_filter: Option<CellRange>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows,
            auto_filter: None,
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The number of rows the sheet reports, blank or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The widest row's length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Sets a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let r = &mut self.rows[row];
        if r.len() <= col {
            r.resize(col + 1, Cell::Empty);
        }
        r[col] = cell;
    }

    /// Writes `cells` into row `row` starting at column 0.
    pub fn set_row(&mut self, row: usize, cells: Vec<Cell>) {
        for (col, cell) in cells.into_iter().enumerate() {
            self.set(row, col, cell);
        }
    }

    /// Adds blank rows until the grid reports at least `len` rows.
    pub fn pad_to(&mut self, len: usize) {
        if self.rows.len() < len {
            self.rows.resize_with(len, Vec::new);
        }
    }

    /// Appends a row after the last reported row.
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Scans backward from the last reported row and returns the index of the last row whose
    /// cell in column `col` is non-empty.
    pub fn last_row_with_value(&self, col: usize) -> Option<usize> {
        (0..self.rows.len())
            .rev()
            .find(|&row| !self.get(row, col).is_empty())
    }

    /// Returns the index of the last row in which any cell is non-empty.
    pub fn last_used_row(&self) -> Option<usize> {
        (0..self.rows.len())
            .rev()
            .find(|&row| self.rows[row].iter().any(|c| !c.is_empty()))
    }

    /// Sorts every row below the header by the date in column `col`, newest first.
    pub fn sort_body_by_date_desc(&mut self, col: usize) {
        if self.rows.len() > 1 {
            sort_rows_by_date_desc(&mut self.rows[1..], col);
        }
    }

    pub fn auto_filter(&self) -> Option<CellRange> {
        self.auto_filter
    }

    /// Replaces any existing auto-filter with one covering `A1` through the last reported row of
    /// column `cols`.
    pub fn reset_auto_filter(&mut self, cols: usize) {
        let last_row = u32::try_from(self.rows.len().max(1)).unwrap_or(u32::MAX);
        let last_col = u32::try_from(cols.max(1)).unwrap_or(u32::MAX);
        self.auto_filter = Some(CellRange::new(
            CellRef::new(1, 1),
            CellRef::new(last_row, last_col),
        ));
    }
}

/// A header-addressed view of a sheet: the first row of the grid becomes the column headers and
/// trailing blank rows are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_grid(grid: &Grid) -> Self {
        let mut rows = grid.rows().iter();
        let headers = rows
            .next()
            .map(|r| r.iter().map(Cell::as_text).collect())
            .unwrap_or_default();
        let mut body: Vec<Vec<Cell>> = rows.cloned().collect();
        while body
            .last()
            .is_some_and(|r| r.iter().all(Cell::is_empty))
        {
            body.pop();
        }
        Self::new(headers, body)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a column by header, ignoring case and surrounding whitespace.
    pub fn column(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// The non-empty values of a column, in row order.
    pub fn values(&self, col: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.get(col))
            .filter(|c| !c.is_empty())
            .map(Cell::as_text)
            .collect()
    }

    /// A copy of the table sorted newest first by column `col`.
    pub fn sorted_by_date_desc(&self, col: usize) -> Self {
        let mut rows = self.rows.clone();
        sort_rows_by_date_desc(&mut rows, col);
        Self::new(self.headers.clone(), rows)
    }

    /// A copy with only the body rows in `range`, clamped to the table's length.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Self::new(self.headers.clone(), self.rows[start..end].to_vec())
    }

    /// Renders the table as a markdown table.
    pub fn to_markdown(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let escape = |s: String| s.replace('|', "\\|");
        let header = (0..width)
            .map(|i| escape(self.headers.get(i).cloned().unwrap_or_default()))
            .collect::<Vec<_>>();
        let mut out = format!("| {} |\n", header.join(" | "));
        out.push_str(&format!("|{}\n", "---|".repeat(width)));
        for row in &self.rows {
            let cells = (0..width)
                .map(|i| escape(row.get(i).map(Cell::as_text).unwrap_or_default()))
                .collect::<Vec<_>>();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }
}
