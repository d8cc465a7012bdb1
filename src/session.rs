//! The session owns the workbook handle and the catalog snapshot read from it.

use crate::model::{Catalog, Grid, Table, TransactionRow};
use crate::workbook::{Edit, Workbook, XlsxWorkbook};
use crate::{writer, Config, Result};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, warn};

/// Grid rows (0-based, so sheet rows 6 to 30) of the balance sheet's column A that hold the
/// account names.
const ACCOUNT_NAME_ROWS: RangeInclusive<usize> = 5..=29;
const ACCOUNT_NAME_COL: usize = 0;

/// One user's working session against the workbook. The catalog is loaded lazily, shared as an
/// `Arc` snapshot, and replaced after every successful write.
pub struct Session {
    config: Config,
    book: Box<dyn Workbook>,
    snapshot: Option<Arc<Catalog>>,
}

impl Session {
    /// Opens a session against the workbook named in `config`. Nothing is read until the catalog
    /// is first needed.
    pub fn open(config: Config) -> Self {
        let book = XlsxWorkbook::new(config.workbook_path());
        Self::with_workbook(config, Box::new(book))
    }

    pub(crate) fn with_workbook(config: Config, book: Box<dyn Workbook>) -> Self {
        Self {
            config,
            book,
            snapshot: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current snapshot, loading it from the workbook if there is none.
    ///
    /// # Errors
    /// An `ErrorType::FileAccess` error if the workbook or one of its sheets cannot be read.
    pub async fn catalog(&mut self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = &self.snapshot {
            return Ok(catalog.clone());
        }
        let catalog = Arc::new(self.load().await?);
        self.snapshot = Some(catalog.clone());
        Ok(catalog)
    }

    /// Drops the snapshot so that the next `catalog` call reads the workbook again.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Appends `rows` to the transactions sheet and refreshes the snapshot. Returns the number of
    /// rows written.
    pub async fn append(&mut self, rows: Vec<TransactionRow>) -> Result<u32> {
        let sheet = self.config.sheets().transactions.clone();
        let written = writer::append(self.book.as_mut(), &sheet, rows).await?;
        self.refresh().await;
        Ok(written)
    }

    /// Applies `edit` to any sheet and refreshes the snapshot.
    pub(crate) async fn modify(&mut self, sheet_name: &str, edit: Edit) -> Result<()> {
        self.book.modify(sheet_name, edit).await?;
        self.refresh().await;
        Ok(())
    }

    /// Reloads the snapshot after a write. The write already succeeded, so a failed reload only
    /// leaves the snapshot empty for the next reader to retry.
    async fn refresh(&mut self) {
        self.invalidate();
        if let Err(e) = self.catalog().await {
            warn!("The workbook was saved but could not be read back: {e}");
        }
    }

    async fn load(&mut self) -> Result<Catalog> {
        let sheets = self.config.sheets().clone();
        debug!("Loading the catalog from {}", self.config.workbook_path().display());

        let transactions = self.book.get(&sheets.transactions).await?;
        let balances = self.book.get(&sheets.balance).await?;
        let resources = self.book.get(&sheets.resources).await?;
        let account_names = account_names(&balances);

        debug!(
            "Loaded {} transactions, {} balance rows, {} resource rows and {} accounts",
            transactions.len().saturating_sub(1),
            balances.len().saturating_sub(1),
            resources.len().saturating_sub(1),
            account_names.len()
        );

        Ok(Catalog::new(
            Table::from_grid(&transactions),
            Table::from_grid(&balances),
            Table::from_grid(&resources),
            account_names,
        ))
    }
}

/// The non-empty labels of `Balance!A6:A30`, in sheet order.
fn account_names(balances: &Grid) -> Vec<String> {
    ACCOUNT_NAME_ROWS
        .map(|row| balances.get(row, ACCOUNT_NAME_COL))
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.as_text().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::model::Cell;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_catalog_loads_and_caches() {
        let env = TestEnv::new().await;
        let mut session = env.session();

        let first = session.catalog().await.unwrap();
        let second = session.catalog().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert_eq!(first.transactions().headers()[0], "unique_id");
        assert_eq!(
            first.account_names(),
            &["Checking", "Savings", "Credit Card", "Brokerage Account"]
        );
        assert!(first.resource_lists().contains(
            crate::model::ResourceKind::Category,
            "Groceries"
        ));
    }

    #[tokio::test]
    async fn test_invalidate_rereads() {
        let env = TestEnv::new().await;
        let mut session = env.session();
        let first = session.catalog().await.unwrap();
        session.invalidate();
        let second = session.catalog().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn test_missing_sheet_is_file_access() {
        let env = TestEnv::new().await;
        let mut book = env.workbook();
        book.sheets.remove("Balance");
        let mut session = Session::with_workbook(env.config(), Box::new(book));
        let err = session.catalog().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::FileAccess);
    }

    #[test]
    fn test_account_names_range() {
        let mut grid = Grid::default();
        grid.set(4, 0, Cell::from("above the range"));
        grid.set(5, 0, Cell::from("First"));
        grid.set(6, 0, Cell::from("  "));
        grid.set(29, 0, Cell::from("Last"));
        grid.set(30, 0, Cell::from("below the range"));
        assert_eq!(account_names(&grid), vec!["First", "Last"]);
    }
}
