//! The `add` command: records one transaction, or one bill broken down into items.

use crate::args::AddArgs;
use crate::commands::resources::remember;
use crate::commands::{today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::form::{BillItem, TransactionForm};
use crate::model::{ResourceKind, TransactionRow};
use crate::{Config, Result, Session};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Validates the transaction described by `args`, appends its rows to the transactions sheet and,
/// with `--remember`, adds any new category or billed-where to the resource lists.
///
/// # Errors
/// - `ErrorType::Validation` if the form is rejected; nothing is written.
/// - `ErrorType::FileAccess` or `ErrorType::Write` if the transaction cannot be saved. Failing to
///   update the resource lists afterwards is only logged.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Vec<TransactionRow>>> {
    let mut session = Session::open(config);
    add_with(&mut session, args, today()).await
}

pub(super) async fn add_with(
    session: &mut Session,
    args: AddArgs,
    today: NaiveDate,
) -> Result<Out<Vec<TransactionRow>>> {
    let remember_new = args.remember;
    let form = form_from_args(args, today);

    let rows = form.clone().into_rows(today).pub_result(ErrorType::Validation)?;

    if !form.account.is_empty() {
        let catalog = session.catalog().await?;
        if !catalog.account_names().iter().any(|a| a == &form.account) {
            warn!(
                "'{}' is not one of the accounts on the balance sheet, recording it anyway",
                form.account
            );
        }
    }
    let written = session.append(rows.clone()).await?;

    let mut message = format!("Transaction {} saved ({written} row(s))", rows[0].id);
    if remember_new {
        let values = std::iter::once((ResourceKind::Category, form.category.as_str()))
            .chain(
                form.items
                    .iter()
                    .filter(|_| form.expanded)
                    .map(|i| (ResourceKind::Category, i.category.as_str())),
            )
            .chain(std::iter::once((
                ResourceKind::BilledWhere,
                form.billed_where.as_str(),
            )));
        // The transaction is already saved; a failure here must not report it as lost.
        match remember(session, values).await {
            Ok(added) => {
                for (kind, value) in &added {
                    info!("Added {} '{value}' to the resource lists", kind.header());
                }
                if !added.is_empty() {
                    message.push_str(&format!(", {} new list value(s) remembered", added.len()));
                }
            }
            Err(e) => {
                warn!("The transaction was saved but the resource lists were not updated: {e}");
                message.push_str(", but the new list values could not be remembered");
            }
        }
    }
    Ok(Out::new(message, rows))
}

fn form_from_args(args: AddArgs, today: NaiveDate) -> TransactionForm {
    TransactionForm {
        date: args.date.unwrap_or(today),
        tx_type: args.tx_type,
        category: args.category.trim().to_string(),
        account: args.account.trim().to_string(),
        amount: args.amount,
        comment: args.comment,
        billed_where: args.billed_where.trim().to_string(),
        currency: args.currency,
        expanded: args.expand,
        items: args
            .items
            .into_iter()
            .map(|i| BillItem {
                amount: i.amount,
                category: i.category,
                comment: i.comment,
            })
            .collect(),
    }
}
