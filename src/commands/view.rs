//! The read-only views: transactions, balances and account names.

use crate::args::TransactionsArgs;
use crate::commands::Out;
use crate::model::{round2, Amount, Cell, Table, DISPLAY_FORMAT};
use crate::{Config, Result, Session};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// The two slices of the balance sheet.
#[derive(Debug, Clone, Serialize)]
pub struct Balances {
    pub overall: Table,
    pub accounts: Table,
}

/// Renders the transactions newest first, optionally only the first `limit` of them.
pub async fn transactions(config: Config, args: TransactionsArgs) -> Result<Out<Table>> {
    transactions_with(&mut Session::open(config), args).await
}

pub(super) async fn transactions_with(
    session: &mut Session,
    args: TransactionsArgs,
) -> Result<Out<Table>> {
    let catalog = session.catalog().await?;
    let mut table = catalog.transactions_by_date();
    let total = table.len();
    if let Some(limit) = args.limit {
        table = table.slice(0..limit);
    }
    let message = format!(
        "{}\n{} of {total} transaction(s)",
        table.to_markdown(),
        table.len()
    );
    Ok(Out::new(message, table))
}

/// Renders the "Overall Balance" and "Account-wise Balances" slices of the balance sheet.
pub async fn balances(config: Config) -> Result<Out<Balances>> {
    balances_with(&mut Session::open(config)).await
}

pub(super) async fn balances_with(session: &mut Session) -> Result<Out<Balances>> {
    let catalog = session.catalog().await?;
    let balances = Balances {
        overall: money(&catalog.overall_balance()),
        accounts: money(&catalog.account_balances()),
    };
    let message = format!(
        "## Overall Balance\n\n{}\n## Account-wise Balances\n\n{}",
        balances.overall.to_markdown(),
        balances.accounts.to_markdown()
    );
    Ok(Out::new(message, balances))
}

/// Lists the account names from the balance sheet, one per line.
pub async fn accounts(config: Config) -> Result<Out<Vec<String>>> {
    accounts_with(&mut Session::open(config)).await
}

pub(super) async fn accounts_with(session: &mut Session) -> Result<Out<Vec<String>>> {
    let names = session.catalog().await?.account_names().to_vec();
    Ok(Out::new(names.join("\n"), names))
}

/// Renders numeric cells as amounts with thousands separators and two decimals.
fn money(table: &Table) -> Table {
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Number(n) => match Decimal::from_f64(*n) {
                        Some(d) => Cell::Text(
                            Amount::new(round2(d))
                                .with_format(DISPLAY_FORMAT)
                                .to_string(),
                        ),
                        None => cell.clone(),
                    },
                    other => other.clone(),
                })
                .collect()
        })
        .collect();
    Table::new(table.headers().to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DATE_IDX, ID_IDX};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_transactions_newest_first_with_limit() {
        let env = TestEnv::new().await;
        let mut session = env.session();

        let out = transactions_with(&mut session, TransactionsArgs { limit: Some(2) })
            .await
            .unwrap();
        let table = out.structure().unwrap();
        assert_eq!(table.len(), 2);
        let dates: Vec<_> = table.rows().iter().map(|r| r[DATE_IDX].as_date()).collect();
        assert!(dates[0] >= dates[1]);
        assert_eq!(table.rows()[0][ID_IDX], Cell::from("20250118.checking.54.10"));
        assert!(out.message().starts_with("| unique_id | date |"));
        assert!(out.message().ends_with(&format!("2 of {} transaction(s)", env.tx_count())));
    }

    #[tokio::test]
    async fn test_balances_slices() {
        let env = TestEnv::new().await;
        let mut session = env.session();

        let out = balances_with(&mut session).await.unwrap();
        let balances = out.structure().unwrap();
        assert_eq!(balances.overall.len(), 3);
        assert_eq!(balances.overall.rows()[0][0], Cell::from("Net Worth"));
        assert_eq!(balances.overall.rows()[0][1], Cell::from("13,250.75"));
        assert_eq!(balances.accounts.rows()[0][0], Cell::from("Checking"));
        assert!(out.message().contains("## Account-wise Balances"));
    }

    #[tokio::test]
    async fn test_accounts() {
        let env = TestEnv::new().await;
        let out = accounts_with(&mut env.session()).await.unwrap();
        assert_eq!(
            out.message(),
            "Checking\nSavings\nCredit Card\nBrokerage Account"
        );
    }

    #[test]
    fn test_money_formats_numbers_only() {
        let table = Table::new(
            vec!["Account".into(), "Balance".into()],
            vec![vec![Cell::from("Checking"), Cell::Number(1234.5)]],
        );
        let formatted = money(&table);
        assert_eq!(formatted.rows()[0][0], Cell::from("Checking"));
        assert_eq!(formatted.rows()[0][1], Cell::from("1,234.50"));
    }
}
