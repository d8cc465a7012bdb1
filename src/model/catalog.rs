use crate::model::{ResourceLists, Table, DATE_IDX, DATE_STR};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Body rows of the balance sheet shown as the overall balance.
pub const OVERALL_ROWS: Range<usize> = 0..3;
/// Body rows of the balance sheet shown as per-account balances.
pub const ACCOUNT_ROWS: Range<usize> = 5..30;

/// An in-memory snapshot of everything the forms and views read from the workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub(crate) transactions: Table,
    pub(crate) balances: Table,
    pub(crate) resources: Table,
    pub(crate) account_names: Vec<String>,
}

impl Catalog {
    pub fn new(
        transactions: Table,
        balances: Table,
        resources: Table,
        account_names: Vec<String>,
    ) -> Self {
        Self {
            transactions,
            balances,
            resources,
            account_names,
        }
    }

    pub fn transactions(&self) -> &Table {
        &self.transactions
    }

    pub fn balances(&self) -> &Table {
        &self.balances
    }

    pub fn resources(&self) -> &Table {
        &self.resources
    }

    pub fn account_names(&self) -> &[String] {
        &self.account_names
    }

    pub fn resource_lists(&self) -> ResourceLists {
        ResourceLists::from_table(&self.resources)
    }

    /// The transactions table, newest first. The date column is found by its header and falls
    /// back to column B.
    pub fn transactions_by_date(&self) -> Table {
        let col = self.transactions.column(DATE_STR).unwrap_or(DATE_IDX);
        self.transactions.sorted_by_date_desc(col)
    }

    pub fn overall_balance(&self) -> Table {
        self.balances.slice(OVERALL_ROWS)
    }

    pub fn account_balances(&self) -> Table {
        self.balances.slice(ACCOUNT_ROWS)
    }
}
