use crate::model::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const CATEGORY_STR: &str = "Category";
pub const BILLED_WHERE_STR: &str = "Billed Where";

/// Which of the two lookup lists a value belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Category,
    BilledWhere,
}

serde_plain::derive_display_from_serialize!(ResourceKind);
serde_plain::derive_fromstr_from_deserialize!(ResourceKind);

impl ResourceKind {
    /// The header of the column holding this list.
    pub fn header(&self) -> &'static str {
        match self {
            ResourceKind::Category => CATEGORY_STR,
            ResourceKind::BilledWhere => BILLED_WHERE_STR,
        }
    }

    /// The row appended to the resources sheet to add `value` to this list.
    pub fn new_row(&self, value: &str) -> Vec<Cell> {
        match self {
            ResourceKind::Category => vec![Cell::from(value)],
            ResourceKind::BilledWhere => vec![Cell::Empty, Cell::from(value)],
        }
    }
}

/// The Category and Billed Where options, de-duplicated and sorted. A list whose column is missing
/// from the sheet is empty.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResourceLists {
    categories: BTreeSet<String>,
    billed_where: BTreeSet<String>,
}

impl ResourceLists {
    pub fn from_table(table: &Table) -> Self {
        let collect = |header: &str| -> BTreeSet<String> {
            table
                .column(header)
                .map(|col| table.values(col).into_iter().collect())
                .unwrap_or_default()
        };
        Self {
            categories: collect(CATEGORY_STR),
            billed_where: collect(BILLED_WHERE_STR),
        }
    }

    pub fn list(&self, kind: ResourceKind) -> &BTreeSet<String> {
        match kind {
            ResourceKind::Category => &self.categories,
            ResourceKind::BilledWhere => &self.billed_where,
        }
    }

    pub fn contains(&self, kind: ResourceKind, value: &str) -> bool {
        self.list(kind).contains(value)
    }

    /// Returns the values that are not yet in their list. Blank values are never new.
    pub fn unknown<'a>(
        &self,
        values: impl IntoIterator<Item = (ResourceKind, &'a str)>,
    ) -> Vec<(ResourceKind, String)> {
        let mut seen = BTreeSet::new();
        values
            .into_iter()
            .map(|(kind, value)| (kind, value.trim()))
            .filter(|(kind, value)| !value.is_empty() && !self.contains(*kind, value))
            .filter(|(kind, value)| seen.insert((*kind, value.to_string())))
            .map(|(kind, value)| (kind, value.to_string()))
            .collect()
    }
}
