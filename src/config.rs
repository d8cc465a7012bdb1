//! Configuration file handling for minty.
//!
//! The configuration file is stored at `$MINTY_HOME/config.json` and names the workbook that holds
//! the finance data along with the names of the sheets inside it.

use crate::error::Res;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "minty";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

pub const TX_SHEET: &str = "Tx";
pub const BALANCE_SHEET: &str = "Balance";
pub const RESOURCES_SHEET: &str = "Resources";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$MINTY_HOME` and from there it loads `$MINTY_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    workbook_path: PathBuf,
}

impl Config {
    /// Creates the home directory and an initial `config.json` that points at `workbook`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/minty`
    /// - `workbook` - The path to the `.xlsm` or `.xlsx` workbook. A relative path is stored as
    ///   given and resolved against `dir` whenever the config is loaded.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a config file already exists.
    pub async fn create(dir: impl Into<PathBuf>, workbook: &Path) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the minty home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let config_file = ConfigFile {
            workbook_path: workbook.to_path_buf(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;
        let workbook_path = resolve(&root, &config_file.workbook_path);

        Ok(Self {
            root,
            config_path,
            config_file,
            workbook_path,
        })
    }

    /// This will
    /// - validate that `minty_home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    ///
    /// The workbook itself is not opened here; a missing workbook surfaces when it is first read.
    pub async fn load(minty_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = minty_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The minty home directory is missing, run 'minty init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let workbook_path = resolve(&root, &config_file.workbook_path);

        Ok(Self {
            root,
            config_path,
            config_file,
            workbook_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The absolute path of the workbook.
    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }

    pub fn sheets(&self) -> &SheetNames {
        &self.config_file.sheets
    }
}

/// Returns `p` unchanged if it is absolute, otherwise joins it onto `root`.
fn resolve(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    root.join(p)
}

/// The names of the sheets inside the workbook.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SheetNames {
    pub transactions: String,
    pub balance: String,
    pub resources: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            transactions: TX_SHEET.to_string(),
            balance: BALANCE_SHEET.to_string(),
            resources: RESOURCES_SHEET.to_string(),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "minty",
///   "config_version": 1,
///   "workbook_path": "Accounts 2025.xlsm",
///   "sheets": { "transactions": "Tx", "balance": "Balance", "resources": "Resources" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "minty"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the workbook, relative to `$MINTY_HOME` or absolute
    workbook_path: PathBuf,

    /// Sheet names, each defaulting to the standard layout when omitted
    #[serde(default)]
    sheets: SheetNames,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            workbook_path: PathBuf::new(),
            sheets: SheetNames::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            !config.workbook_path.as_os_str().is_empty(),
            "The config file at {} does not name a workbook",
            path.display()
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
