//! The two data-entry forms: a transaction (optionally broken down into bill items) and a salary
//! deposit across up to three accounts. Each form validates its input and turns it into the rows
//! that are appended to the transactions sheet.

use crate::model::{generate_id, round2, Amount, Currency, TransactionRow, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The salary form has this many account/amount slots.
pub const SALARY_SLOTS: usize = 3;

pub const SALARY_CATEGORY: &str = "Salary / Income";
pub const SALARY_COMMENT: &str = "Paycheck";

/// The reasons a form is rejected. Only the first failing rule is reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ValidationError {
    MissingBilledWhere,
    MissingCategory,
    BillDoesNotTally,
    TooManySalaryAccounts,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingBilledWhere => {
                f.write_str("Expand Bill is checked, but Billed Where is empty.")
            }
            ValidationError::MissingCategory => f.write_str("Category field is required."),
            ValidationError::BillDoesNotTally => {
                f.write_str("Bill amount does not tally with breakdown.")
            }
            ValidationError::TooManySalaryAccounts => write!(
                f,
                "At most {SALARY_SLOTS} accounts can be entered for a salary."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// One line of a bill breakdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub amount: Amount,
    pub category: String,
    pub comment: String,
}

/// The fields of the Add Transaction form.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub date: NaiveDate,
    pub tx_type: TransactionType,
    pub category: String,
    pub account: String,
    pub amount: Amount,
    pub comment: String,
    pub billed_where: String,
    pub currency: Currency,
    /// Whether the bill is broken down into `items`. Items are ignored when this is false.
    pub expanded: bool,
    pub items: Vec<BillItem>,
}

impl TransactionForm {
    /// Applies the form rules in order and returns the first one that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tx_type != TransactionType::Transfer
            && self.expanded
            && self.billed_where.trim().is_empty()
        {
            return Err(ValidationError::MissingBilledWhere);
        }
        if self.category.trim().is_empty() && !self.expanded {
            return Err(ValidationError::MissingCategory);
        }
        if self.expanded && !self.tallies() {
            return Err(ValidationError::BillDoesNotTally);
        }
        Ok(())
    }

    /// Whether the items, each rounded to cents, add up to the rounded amount.
    pub fn tallies(&self) -> bool {
        let sum: Decimal = self.items.iter().map(|i| i.amount.round2()).sum();
        round2(sum) == self.amount.round2()
    }

    /// Validates the form and builds its rows: the parent row and, for an expanded bill, one split
    /// row per item. Every row shares one identifier, derived from `today`.
    pub fn into_rows(self, today: NaiveDate) -> Result<Vec<TransactionRow>, ValidationError> {
        self.validate()?;
        let id = generate_id(&self.account, self.amount, today);
        let parent = TransactionRow {
            id: id.clone(),
            date: self.date,
            r#type: self.tx_type,
            sub_type: self.tx_type.to_string(),
            billed_where: self.billed_where.clone(),
            is_split_item: false,
            category: self.category.clone(),
            account: self.account.clone(),
            total_amount: Some(self.amount),
            item_amount: self.amount,
            currency: self.currency,
            comment: self.comment.clone(),
        };

        let mut rows = vec![parent];
        if self.expanded {
            rows.extend(self.items.into_iter().map(|item| TransactionRow {
                id: id.clone(),
                date: self.date,
                r#type: self.tx_type,
                sub_type: self.tx_type.to_string(),
                billed_where: self.billed_where.clone(),
                is_split_item: true,
                category: item.category,
                account: self.account.clone(),
                total_amount: None,
                item_amount: item.amount,
                currency: self.currency,
                comment: item.comment,
            }));
        }
        Ok(rows)
    }
}

/// The fields of the Salary form.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SalaryForm {
    pub date: NaiveDate,
    /// `(account, amount)` pairs. Pairs with a blank account or an amount that is not positive are
    /// skipped.
    pub pays: Vec<(String, Amount)>,
}

impl SalaryForm {
    /// Builds one Income row per qualifying pair, each with its own identifier. The result is
    /// empty when no pair qualifies.
    pub fn into_rows(self, today: NaiveDate) -> Result<Vec<TransactionRow>, ValidationError> {
        if self.pays.len() > SALARY_SLOTS {
            return Err(ValidationError::TooManySalaryAccounts);
        }
        let date = self.date;
        Ok(self
            .pays
            .into_iter()
            .filter(|(account, amount)| !account.trim().is_empty() && amount.is_positive())
            .map(|(account, amount)| TransactionRow {
                id: generate_id(&account, amount, today),
                date,
                r#type: TransactionType::Income,
                sub_type: TransactionType::Income.to_string(),
                billed_where: String::new(),
                is_split_item: false,
                category: SALARY_CATEGORY.to_string(),
                account,
                total_amount: Some(amount),
                item_amount: amount,
                currency: Currency::Usd,
                comment: SALARY_COMMENT.to_string(),
            })
            .collect())
    }
}
