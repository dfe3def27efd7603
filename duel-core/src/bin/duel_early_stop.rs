//! Pair-counting benchmark that stops at the first trial the record engine
//! wins.
//!
//! Configured through `DUEL_*` environment variables, see
//! [`duel_core::config`]. Logging honors `RUST_LOG`.

use std::process::ExitCode;

use duel_core::app;
use duel_core::config::DuelConfig;
use duel_core::logging;
use duel_types::StopPolicy;
use tracing::error;

fn main() -> ExitCode {
    logging::init();

    let result =
        DuelConfig::from_env().and_then(|config| app::benchmark(&config, StopPolicy::EarlyStop));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(stage = %err.stage(), "{err}");
            ExitCode::FAILURE
        }
    }
}
