//! Appends transaction rows to the transactions sheet.

use crate::error::Res;
use crate::model::{
    Cell, Grid, TransactionRow, DATE_IDX, DATE_STR, ID_IDX, TX_COL_COUNT, TX_HEADERS,
};
use crate::workbook::Workbook;
use crate::Result;
use tracing::{debug, info};

/// Appends `rows` below the last row that has an identifier, re-applies the auto-filter over the
/// whole table and sorts the body by date, newest first. All of it is saved as one change.
///
/// Returns the number of rows written.
///
/// # Errors
/// - `ErrorType::FileAccess` if the workbook cannot be opened or locked.
/// - `ErrorType::Write` if it cannot be saved. The stored workbook is then unchanged.
pub(crate) async fn append(
    book: &mut dyn Workbook,
    sheet_name: &str,
    rows: Vec<TransactionRow>,
) -> Result<u32> {
    let count = rows.len() as u32;
    if rows.is_empty() {
        debug!("Nothing to append to '{sheet_name}'");
        return Ok(0);
    }
    book.modify(
        sheet_name,
        Box::new(move |grid: &mut Grid| append_rows(grid, &rows)),
    )
    .await?;
    info!("Appended {count} row(s) to '{sheet_name}'");
    Ok(count)
}

fn append_rows(grid: &mut Grid, rows: &[TransactionRow]) -> Res<()> {
    if grid.is_empty() {
        grid.push_row(TX_HEADERS.iter().map(|&h| Cell::from(h)).collect());
    }
    let first = insertion_row(grid);
    debug!("Writing {} row(s) starting at grid row {first}", rows.len());
    for (i, row) in rows.iter().enumerate() {
        grid.set_row(first + i, row.to_cells());
    }

    let date_col = header_index(grid, DATE_STR).unwrap_or(DATE_IDX);
    grid.reset_auto_filter(TX_COL_COUNT);
    grid.sort_body_by_date_desc(date_col);
    Ok(())
}

/// One past the last row with an identifier, or the row under the header if there is none.
fn insertion_row(grid: &Grid) -> usize {
    match grid.last_row_with_value(ID_IDX) {
        Some(0) | None => 1,
        Some(last) => last + 1,
    }
}

fn header_index(grid: &Grid, name: &str) -> Option<usize> {
    grid.rows().first().and_then(|header| {
        header
            .iter()
            .position(|c| c.as_text().trim().eq_ignore_ascii_case(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::model::{Amount, Currency, Table, TransactionType};
    use crate::test::TestEnv;
    use crate::workbook::MemoryWorkbook;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(id: &str, at: NaiveDate, amount: &str) -> TransactionRow {
        let amount: Amount = amount.parse().unwrap();
        TransactionRow {
            id: id.into(),
            date: at,
            r#type: TransactionType::Expense,
            sub_type: "Expense".into(),
            billed_where: String::new(),
            is_split_item: false,
            category: "Groceries".into(),
            account: "Checking".into(),
            total_amount: Some(amount),
            item_amount: amount,
            currency: Currency::Usd,
            comment: String::new(),
        }
    }

    fn ids(grid: &Grid) -> Vec<String> {
        grid.rows()
            .iter()
            .skip(1)
            .map(|r| r[ID_IDX].as_text())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn assert_sorted(grid: &Grid) {
        let table = Table::from_grid(grid);
        let dates: Vec<_> = table.rows().iter().map(|r| r[DATE_IDX].as_date()).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn test_append_sorts_and_writes_once() {
        let env = TestEnv::new().await;
        let mut book = env.workbook();
        let before = ids(book.sheet("Tx")).len();

        let written = append(
            &mut book,
            "Tx",
            vec![
                row("new.one", date(2025, 1, 18), "3.00"),
                row("new.two", date(2024, 12, 1), "4.00"),
            ],
        )
        .await
        .unwrap();

        assert_eq!(written, 2);
        let grid = book.sheet("Tx");
        let ids = ids(grid);
        assert_eq!(ids.len(), before + 2);
        assert_eq!(ids.iter().filter(|id| *id == "new.one").count(), 1);
        assert_eq!(ids.iter().filter(|id| *id == "new.two").count(), 1);
        assert_eq!(ids.last().unwrap(), "new.two");
        assert_sorted(grid);
        assert_eq!(
            grid.auto_filter().unwrap().to_string(),
            format!("A1:M{}", grid.len())
        );
        assert_eq!(book.saves, 1);
    }

    #[test]
    fn test_append_skips_trailing_blank_rows() {
        let mut grid = Grid::new(vec![
            TX_HEADERS.iter().map(|&h| Cell::from(h)).collect(),
            row("a", date(2025, 1, 2), "1.00").to_cells(),
            vec![Cell::Empty; TX_COL_COUNT],
            vec![Cell::Empty; TX_COL_COUNT],
        ]);
        assert_eq!(insertion_row(&grid), 2);
        append_rows(&mut grid, &[row("b", date(2025, 1, 1), "2.00")]).unwrap();
        assert_eq!(grid.get(2, ID_IDX), &Cell::from("b"));
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_append_to_empty_sheet_writes_header() {
        let mut grid = Grid::default();
        append_rows(&mut grid, &[row("a", date(2025, 1, 2), "1.00")]).unwrap();
        assert_eq!(grid.get(0, 0), &Cell::from("unique_id"));
        assert_eq!(grid.get(1, 0), &Cell::from("a"));
    }

    #[test]
    fn test_header_only_sheet() {
        let grid = Grid::new(vec![TX_HEADERS.iter().map(|&h| Cell::from(h)).collect()]);
        assert_eq!(insertion_row(&grid), 1);
    }

    #[tokio::test]
    async fn test_failed_save_writes_nothing() {
        let env = TestEnv::new().await;
        let mut book = env.workbook();
        book.fail_saves = true;
        let before = book.sheet("Tx").clone();

        let err = append(&mut book, "Tx", vec![row("x", date(2025, 1, 1), "1.00")])
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Write);
        assert_eq!(book.sheet("Tx"), &before);
    }

    #[tokio::test]
    async fn test_nothing_to_append() {
        let mut book = MemoryWorkbook::default();
        assert_eq!(append(&mut book, "Tx", Vec::new()).await.unwrap(), 0);
    }
}
