use crate::model::{Amount, Cell};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of a transaction, written to both the type and sub-type columns.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[default]
    #[serde(alias = "expense")]
    Expense,
    #[serde(alias = "income")]
    Income,
    #[serde(alias = "transfer")]
    Transfer,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "inr")]
    Inr,
}

serde_plain::derive_display_from_serialize!(Currency);
serde_plain::derive_fromstr_from_deserialize!(Currency);

/// One row of the transactions sheet.
///
/// When `is_split_item` is true the row is one line of a bill breakdown: `total_amount` is `None`
/// and `item_amount` is that line's share of the parent row's total.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionRow {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub sub_type: String,
    pub billed_where: String,
    pub is_split_item: bool,
    pub category: String,
    pub account: String,
    pub total_amount: Option<Amount>,
    pub item_amount: Amount,
    pub currency: Currency,
    pub comment: String,
}

impl TransactionRow {
    /// The row's cells in sheet column order. The last column is reserved and always blank.
    pub fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::from(self.id.as_str()),
            Cell::from(self.date),
            Cell::from(self.r#type.to_string()),
            Cell::from(self.sub_type.as_str()),
            Cell::from(self.billed_where.as_str()),
            Cell::from(self.is_split_item),
            Cell::from(self.category.as_str()),
            Cell::from(self.account.as_str()),
            Cell::from(self.total_amount),
            Cell::from(self.item_amount),
            Cell::from(self.currency.to_string()),
            Cell::from(self.comment.as_str()),
            Cell::Empty,
        ]
    }
}

/// Header names of the transactions sheet, in column order. Only written when a sheet has no
/// header row yet; existing headers are never touched.
pub const TX_HEADERS: [&str; TX_COL_COUNT] = [
    "unique_id",
    "date",
    "type",
    "sub_type",
    "billed_where",
    "split_item",
    "category",
    "account",
    "total_amount",
    "amount",
    "currency",
    "comments",
    "reserved",
];

pub const ID_IDX: usize = 0;
pub const DATE_IDX: usize = 1;
pub const DATE_STR: &str = "date";
pub const TX_COL_COUNT: usize = 13;
