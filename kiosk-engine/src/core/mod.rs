//! Core infrastructure: configuration and environment setup

pub mod config;

pub use config::Config;

/// Set up the process environment: load `.env`, initialize logging.
///
/// Called once by the embedding front end before building a session.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    crate::utils::logger::init_logger();
    Ok(())
}
