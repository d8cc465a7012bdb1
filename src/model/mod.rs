//! Types that represent the core data model, such as `TransactionRow` and `Catalog`.
mod amount;
mod catalog;
mod cell;
mod cell_ref;
mod identifier;
mod resources;
mod transaction;

pub use amount::{round2, Amount, AmountFormat, DISPLAY_FORMAT};
pub use catalog::{Catalog, ACCOUNT_ROWS, OVERALL_ROWS};
pub use cell::{Cell, Grid, Table};
pub use cell_ref::{column_letters, CellRange, CellRef};
pub use identifier::{generate_id, MAX_ID_LEN};
pub use resources::{ResourceKind, ResourceLists, BILLED_WHERE_STR, CATEGORY_STR};
pub use transaction::{
    Currency, TransactionRow, TransactionType, DATE_IDX, DATE_STR, ID_IDX, TX_COL_COUNT,
    TX_HEADERS,
};
