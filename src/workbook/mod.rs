//! Access to the workbook file that holds all persisted state.
//!
//! The `Workbook` trait has two operations: read a sheet, and modify a sheet as one scoped
//! change. `XlsxWorkbook` implements it against an `.xlsx`/`.xlsm` file on disk. Tests use an
//! in-memory implementation.

mod lock;
#[cfg(test)]
mod memory;
mod xlsx;

use crate::model::Grid;
use crate::Result;

#[cfg(test)]
pub(crate) use memory::MemoryWorkbook;
pub(crate) use xlsx::XlsxWorkbook;

/// A change to one sheet. It receives the sheet's current grid and edits it in place. Returning an
/// error abandons the change and nothing is saved.
pub(crate) type Edit = Box<dyn FnOnce(&mut Grid) -> crate::error::Res<()> + Send>;

#[async_trait::async_trait]
pub(crate) trait Workbook: Send {
    /// Reads every row of the named sheet, header included.
    ///
    /// # Errors
    /// A missing workbook or sheet is an `ErrorType::FileAccess` error.
    async fn get(&mut self, sheet_name: &str) -> Result<Grid>;

    /// Applies `edit` to the named sheet and persists the workbook.
    ///
    /// Implementations hold exclusive access to the workbook for the whole call and either persist
    /// the complete change or leave the stored workbook as it was.
    ///
    /// # Errors
    /// - `ErrorType::FileAccess` if the workbook cannot be opened or locked or the sheet is missing.
    /// - `ErrorType::Write` if the edit fails or the workbook cannot be saved.
    async fn modify(&mut self, sheet_name: &str, edit: Edit) -> Result<()>;
}
