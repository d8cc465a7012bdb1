use crate::args::SalaryArgs;
use crate::commands::{today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::SalaryForm;
use crate::model::TransactionRow;
use crate::{Config, Result, Session};
use chrono::NaiveDate;

/// Records a salary deposit as one Income row per account that received a positive amount. All
/// rows are appended in one write. When no account qualifies nothing is written.
///
/// # Errors
/// - `ErrorType::Validation` if more than three accounts are given.
/// - `ErrorType::FileAccess` or `ErrorType::Write` if the workbook cannot be updated.
pub async fn salary(config: Config, args: SalaryArgs) -> Result<Out<Vec<TransactionRow>>> {
    let mut session = Session::open(config);
    salary_with(&mut session, args, today()).await
}

pub(super) async fn salary_with(
    session: &mut Session,
    args: SalaryArgs,
    today: NaiveDate,
) -> Result<Out<Vec<TransactionRow>>> {
    let form = SalaryForm {
        date: args.date.unwrap_or(today),
        pays: args
            .pays
            .into_iter()
            .map(|p| (p.account, p.amount))
            .collect(),
    };
    let rows = form.into_rows(today).pub_result(ErrorType::Validation)?;
    if rows.is_empty() {
        return Ok(Out::new(
            "No account received a positive amount, nothing was recorded",
            rows,
        ));
    }
    let written = session.append(rows.clone()).await?;
    Ok(Out::new(
        format!("Salary recorded for {written} account(s)"),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::PayArg;
    use crate::model::{Amount, ID_IDX};
    use crate::test::TestEnv;
    use std::str::FromStr;

    fn pay(account: &str, amount: &str) -> PayArg {
        PayArg {
            account: account.into(),
            amount: Amount::from_str(amount).unwrap(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    #[tokio::test]
    async fn test_salary_two_accounts() {
        let env = TestEnv::new().await;
        let mut session = env.session();
        let args = SalaryArgs {
            date: None,
            pays: vec![
                pay("Checking", "2000"),
                pay("Savings", "500.25"),
                pay("Brokerage Account", "-5"),
            ],
        };

        let out = salary_with(&mut session, args, day()).await.unwrap();
        assert_eq!(out.message(), "Salary recorded for 2 account(s)");

        let catalog = session.catalog().await.unwrap();
        let ids = catalog.transactions().values(ID_IDX);
        assert!(ids.contains(&"20250131.checking.2000.00".to_string()));
        assert!(ids.contains(&"20250131.savings.500.25".to_string()));
        assert!(!ids.iter().any(|id| id.contains("brokerage")));
    }

    #[tokio::test]
    async fn test_salary_nothing_qualifies() {
        let env = TestEnv::new().await;
        let mut session = env.session();
        let before = session.catalog().await.unwrap();
        let args = SalaryArgs {
            date: None,
            pays: vec![pay("", "100"), pay("Checking", "0")],
        };

        let out = salary_with(&mut session, args, day()).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        let after = session.catalog().await.unwrap();
        assert!(std::sync::Arc::ptr_eq(&before, &after));
    }
}
