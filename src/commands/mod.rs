//! Command handlers for the minty CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod init;
mod resources;
mod salary;
mod view;

use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use add::add;
pub use init::init;
pub use resources::{resources_add, resources_list};
pub use salary::salary;
pub use view::{accounts, balances, transactions, Balances};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        self.debug_structure();
    }

    /// Print the message to stdout, for output that is the point of the command (a table, a list)
    /// and should be pipeable. The structured data still goes to `debug!`.
    pub fn print_stdout(&self) {
        println!("{}", self.message);
        self.debug_structure();
    }

    fn debug_structure(&self) {
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the configuration in `minty_home` for the commands that need one.
///
/// # Errors
/// An `ErrorType::Config` error if the directory or its `config.json` is missing or malformed.
pub async fn load_config(minty_home: &Path) -> Result<Config> {
    Config::load(minty_home)
        .await
        .context("Unable to load the configuration")
        .pub_result(ErrorType::Config)
}

/// The day an entry is recorded on. Identifiers are derived from it.
fn today() -> NaiveDate {
    Local::now().date_naive()
}
