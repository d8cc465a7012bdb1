//! Listing and extending the Category and Billed Where lists.

use crate::args::ResourcesAddArgs;
use crate::commands::Out;
use crate::error::Res;
use crate::model::{Cell, Grid, ResourceKind, ResourceLists};
use crate::{Config, Result, Session};
use tracing::debug;

/// Prints both lists, one value per line under a heading each.
pub async fn resources_list(config: Config) -> Result<Out<ResourceLists>> {
    let mut session = Session::open(config);
    let lists = session.catalog().await?.resource_lists();

    let mut message = String::new();
    for kind in [ResourceKind::Category, ResourceKind::BilledWhere] {
        message.push_str(&format!("{}:\n", kind.header()));
        for value in lists.list(kind) {
            message.push_str(&format!("  {value}\n"));
        }
    }
    Ok(Out::new(message.trim_end(), lists))
}

/// Appends the given values to the resources sheet, skipping any already present.
///
/// # Errors
/// - Returns an error if the workbook cannot be read, locked or saved.
pub async fn resources_add(
    config: Config,
    args: ResourcesAddArgs,
) -> Result<Out<Vec<(ResourceKind, String)>>> {
    let mut session = Session::open(config);
    resources_add_with(&mut session, args).await
}

pub(super) async fn resources_add_with(
    session: &mut Session,
    args: ResourcesAddArgs,
) -> Result<Out<Vec<(ResourceKind, String)>>> {
    let values = args
        .category
        .iter()
        .map(|v| (ResourceKind::Category, v.as_str()))
        .chain(
            args.billed_where
                .iter()
                .map(|v| (ResourceKind::BilledWhere, v.as_str())),
        );
    let added = remember(session, values).await?;
    let message = if added.is_empty() {
        "Nothing to add, every value is already in the lists".to_string()
    } else {
        format!("Added {}", describe(&added))
    };
    Ok(Out::new(message, added))
}

/// Appends the values that are not yet in their list to the resources sheet and returns them.
/// Nothing is written when every value is already known.
pub(super) async fn remember<'a>(
    session: &mut Session,
    values: impl IntoIterator<Item = (ResourceKind, &'a str)>,
) -> Result<Vec<(ResourceKind, String)>> {
    let unknown = session.catalog().await?.resource_lists().unknown(values);
    if unknown.is_empty() {
        return Ok(unknown);
    }
    debug!("Adding {} to the resources sheet", describe(&unknown));

    let sheet = session.config().sheets().resources.clone();
    let rows = unknown.clone();
    session
        .modify(
            &sheet,
            Box::new(move |grid: &mut Grid| append_resources(grid, &rows)),
        )
        .await?;
    Ok(unknown)
}

/// Appends one row per value below the last used row, putting each value in the column headed by
/// its list's name. If the sheet has no such header the value goes in column A for a category and
/// column B for a billed-where.
fn append_resources(grid: &mut Grid, values: &[(ResourceKind, String)]) -> Res<()> {
    if grid.is_empty() {
        grid.push_row(vec![
            Cell::from(ResourceKind::Category.header()),
            Cell::from(ResourceKind::BilledWhere.header()),
        ]);
    }
    let mut next = grid.last_used_row().map_or(0, |r| r + 1);
    for (kind, value) in values {
        match header_col(grid, kind.header()) {
            Some(col) => grid.set(next, col, Cell::from(value.as_str())),
            None => grid.set_row(next, kind.new_row(value)),
        }
        next += 1;
    }
    Ok(())
}

fn header_col(grid: &Grid, header: &str) -> Option<usize> {
    grid.rows()
        .first()?
        .iter()
        .position(|c| c.as_text().trim().eq_ignore_ascii_case(header))
}

fn describe(values: &[(ResourceKind, String)]) -> String {
    values
        .iter()
        .map(|(kind, value)| format!("{} '{value}'", kind.header()))
        .collect::<Vec<_>>()
        .join(", ")
}
