//! Pair-counting benchmark that runs every planned trial and tallies the
//! record engine's wins.

use std::process::ExitCode;

use duel_core::app;
use duel_core::config::DuelConfig;
use duel_core::logging;
use duel_types::StopPolicy;
use tracing::error;

fn main() -> ExitCode {
    logging::init();

    let result =
        DuelConfig::from_env().and_then(|config| app::benchmark(&config, StopPolicy::FixedTally));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(stage = %err.stage(), "{err}");
            ExitCode::FAILURE
        }
    }
}
