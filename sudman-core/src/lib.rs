pub mod config;
pub mod error;
pub mod unit;

// External manager boundary
pub mod invoker;
pub mod systemctl;

// Query + control services
pub mod control;
pub mod preflight;
pub mod query;

// Interactive dashboard
pub mod dashboard;
pub mod frame;

pub use error::{Result, SudmanError};
