use clap::Parser;
use minty::args::{Args, Command, ResourcesCommand};
use minty::commands::load_config;
use minty::{commands, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().minty_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.workbook()).await?.print(),

        Command::Add(add_args) => {
            let config = load_config(home).await?;
            commands::add(config, *add_args.clone()).await?.print()
        }

        Command::Salary(salary_args) => {
            let config = load_config(home).await?;
            commands::salary(config, salary_args.clone()).await?.print()
        }

        Command::Transactions(tx_args) => {
            let config = load_config(home).await?;
            commands::transactions(config, tx_args.clone())
                .await?
                .print_stdout()
        }

        Command::Balances => commands::balances(load_config(home).await?)
            .await?
            .print_stdout(),

        Command::Accounts => commands::accounts(load_config(home).await?)
            .await?
            .print_stdout(),

        Command::Resources(resources_args) => {
            let config = load_config(home).await?;
            match resources_args.command() {
                ResourcesCommand::List => commands::resources_list(config).await?.print_stdout(),
                ResourcesCommand::Add(add_args) => {
                    commands::resources_add(config, add_args.clone())
                        .await?
                        .print()
                }
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
