pub mod args;
pub mod commands;
mod config;
mod error;
pub mod form;
pub mod model;
mod session;
mod utils;
mod workbook;
mod writer;


pub use config::{Config, SheetNames};
pub use error::{Error, ErrorType, Result};
pub use session::Session;
