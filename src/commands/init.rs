use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` that points at `workbook`.
///
/// # Arguments
/// - `minty_home` - The directory that will be the root of data directory, e.g. `$HOME/minty`
/// - `workbook` - The `.xlsm`/`.xlsx` file holding the `Tx`, `Balance` and `Resources` sheets. A
///   relative path is resolved against `minty_home`. The workbook does not need to exist yet.
///
/// # Errors
/// - Returns an error if the directory cannot be created or a config already exists there.
pub async fn init(minty_home: &Path, workbook: &Path) -> Result<Out<()>> {
    let config = Config::create(minty_home, workbook)
        .await
        .context("Unable to create the data directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the minty directory and config for {}",
        config.workbook_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_init_again() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("minty");

        let out = init(&home, Path::new("Accounts.xlsm")).await.unwrap();
        assert!(out.message().contains("Accounts.xlsm"));
        assert!(home.join("config.json").is_file());

        let err = init(&home, Path::new("Accounts.xlsm")).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
