//! These structs provide the CLI interface for the minty CLI.

use crate::model::{Amount, Currency, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// minty: record transactions and salary deposits in your personal finance workbook.
///
/// All data lives in an Excel workbook (`.xlsm` or `.xlsx`) with a `Tx` sheet of transactions, a
/// `Balance` sheet computed by the workbook's own formulas, and a `Resources` sheet holding the
/// Category and Billed Where lists. minty appends rows to `Tx`, keeps it sorted by date, and
/// shows the other sheets. Macros and every other sheet are left as they are.
///
/// Close the workbook in Excel before adding anything, Excel holds its own lock on the file.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file that points at your workbook.
    ///
    /// This is the first command to run. By default the data directory is $HOME/minty, pass
    /// --minty-home (or set MINTY_HOME) to put it elsewhere.
    Init(InitArgs),
    /// Record a transaction, optionally broken down into bill items.
    Add(Box<AddArgs>),
    /// Record a salary deposit into up to three accounts.
    Salary(SalaryArgs),
    /// Show the transactions, newest first.
    Transactions(TransactionsArgs),
    /// Show the overall and per-account balances.
    Balances,
    /// List the account names from the balance sheet.
    Accounts,
    /// Show or extend the Category and Billed Where lists.
    Resources(ResourcesArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the minty configuration is held. Defaults to ~/minty
    #[arg(long, env = "MINTY_HOME", default_value_t = default_minty_home())]
    minty_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, minty_home: PathBuf) -> Self {
        Self {
            log_level,
            minty_home: minty_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn minty_home(&self) -> &DisplayPath {
        &self.minty_home
    }
}

/// (Not shown): Args for the `minty init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The path to your workbook. A relative path is resolved against the minty home directory.
    #[arg(long)]
    workbook: PathBuf,
}

impl InitArgs {
    pub fn new(workbook: impl Into<PathBuf>) -> Self {
        Self {
            workbook: workbook.into(),
        }
    }

    pub fn workbook(&self) -> &Path {
        &self.workbook
    }
}

/// (Not shown): Args for the `minty add` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct AddArgs {
    /// The date of the transaction, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Expense, Income or Transfer.
    #[arg(long = "type", default_value_t = TransactionType::Expense)]
    pub tx_type: TransactionType,

    /// The category. Required unless the bill is expanded.
    #[arg(long, default_value = "")]
    pub category: String,

    /// The account, e.g. one of the names printed by `minty accounts`.
    #[arg(long, default_value = "")]
    pub account: String,

    /// The total amount, e.g. 42.50. Must not be negative.
    #[arg(long, value_parser = parse_non_negative)]
    pub amount: Amount,

    #[arg(long, default_value = "")]
    pub comment: String,

    /// Where the bill was paid, e.g. a store. Required for an expanded Expense or Income.
    #[arg(long, default_value = "")]
    pub billed_where: String,

    /// USD or INR.
    #[arg(long, default_value_t = Currency::Usd)]
    pub currency: Currency,

    /// Break the bill down into the items given with --item. Their amounts must add up to
    /// --amount.
    #[arg(long, requires = "items")]
    pub expand: bool,

    /// One bill item as AMOUNT[:CATEGORY[:COMMENT]], e.g. `17.50:Snacks:chips`. Repeat for each
    /// item.
    #[arg(long = "item", id = "items", value_parser = parse_bill_item)]
    pub items: Vec<BillItemArg>,

    /// Add a category or billed-where that is not yet in the Resources lists to those lists.
    #[arg(long)]
    pub remember: bool,
}

/// (Not shown): Args for the `minty salary` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct SalaryArgs {
    /// The date of the deposit, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// A deposit as ACCOUNT=AMOUNT, e.g. `Checking=2500`. Repeat for up to three accounts.
    /// Amounts that are zero or less are skipped.
    #[arg(long = "pay", value_parser = parse_pay)]
    pub pays: Vec<PayArg>,
}

/// (Not shown): Args for the `minty transactions` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct TransactionsArgs {
    /// Show only this many of the newest transactions.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// (Not shown): Args for the `minty resources` command.
#[derive(Debug, Parser, Clone)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    command: ResourcesCommand,
}

impl ResourcesArgs {
    pub fn new(command: ResourcesCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &ResourcesCommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourcesCommand {
    /// Print the Category and Billed Where lists.
    List,
    /// Append values to the lists. Values that are already present are skipped.
    Add(ResourcesAddArgs),
}

/// (Not shown): Args for the `minty resources add` command.
#[derive(Debug, Default, Parser, Clone)]
#[group(required = true, multiple = true)]
pub struct ResourcesAddArgs {
    /// A category to add. Repeatable.
    #[arg(long)]
    pub category: Vec<String>,

    /// A billed-where to add. Repeatable.
    #[arg(long)]
    pub billed_where: Vec<String>,
}

/// A bill item given on the command line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BillItemArg {
    pub amount: Amount,
    pub category: String,
    pub comment: String,
}

/// A salary deposit given on the command line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PayArg {
    pub account: String,
    pub amount: Amount,
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    Amount::from_str(s.trim()).map_err(|e| format!("'{s}' is not an amount: {e}"))
}

fn parse_non_negative(s: &str) -> Result<Amount, String> {
    let amount = parse_amount(s)?;
    if amount.is_negative() {
        return Err(format!("'{s}' is negative, amounts must be zero or more"));
    }
    Ok(amount)
}

/// `AMOUNT[:CATEGORY[:COMMENT]]`. The comment may itself contain colons.
fn parse_bill_item(s: &str) -> Result<BillItemArg, String> {
    let mut parts = s.splitn(3, ':');
    let amount = parse_non_negative(parts.next().unwrap_or_default())?;
    let category = parts.next().unwrap_or_default().trim().to_string();
    let comment = parts.next().unwrap_or_default().trim().to_string();
    Ok(BillItemArg {
        amount,
        category,
        comment,
    })
}

/// `ACCOUNT=AMOUNT`. The account is everything before the last `=`.
fn parse_pay(s: &str) -> Result<PayArg, String> {
    let (account, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("'{s}' should look like ACCOUNT=AMOUNT"))?;
    Ok(PayArg {
        account: account.trim().to_string(),
        amount: parse_amount(amount)?,
    })
}

fn default_minty_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("minty"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --minty-home or MINTY_HOME instead of relying on the default \
                minty home directory.",
            );
            PathBuf::from("minty")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
