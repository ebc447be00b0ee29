use clap::Subcommand;
use tokio::runtime::Runtime;
use wavi_core::{Clock, Config, FailureReason, HabitGateway, HabitId, TodayController};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// Mark a habit done for today
    Success {
        id: HabitId,
    },
    /// Mark a habit failed for today
    Failure {
        id: HabitId,
        /// Failure reason id, repeatable (see `log reasons`)
        #[arg(long = "reason", required = true)]
        reasons: Vec<u8>,
        /// Free text, required with the "other" reason
        #[arg(long)]
        custom: Option<String>,
    },
    /// List failure reason ids
    Reasons,
}

pub fn run(action: LogAction, config: &Config) -> CliResult {
    match action {
        LogAction::Success { id } => {
            let rt = common::runtime()?;
            let mut today = common::controller(config)?;
            refresh(&rt, &mut today);
            rt.block_on(today.record_success(id))?;
            println!("habit {id} completed");
        }
        LogAction::Failure {
            id,
            reasons,
            custom,
        } => {
            let reasons = reasons
                .into_iter()
                .map(FailureReason::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            let rt = common::runtime()?;
            let mut today = common::controller(config)?;
            refresh(&rt, &mut today);
            rt.block_on(today.record_failure(id, &reasons, custom.as_deref()))?;
            println!("habit {id} marked failed");
        }
        LogAction::Reasons => {
            for reason in FailureReason::ALL {
                println!("{}  {reason}", reason.id());
            }
        }
    }
    Ok(())
}

/// Load today's habits so the overlay knows the logged one. The log call
/// goes ahead either way; returns whether the load worked.
fn refresh<G: HabitGateway, C: Clock>(rt: &Runtime, today: &mut TodayController<G, C>) -> bool {
    match rt.block_on(today.load()) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load today's habits");
            false
        }
    }
}
