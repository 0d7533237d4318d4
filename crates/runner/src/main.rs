//! Delphi binary - runs one full analysis cycle against sample data

use delphi_core::RunPhase;
use delphi_runner::{RunController, Settings, log_run_summary, sample_pipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;
    log::info!(
        "starting analysis cycle for {} ({} x {} days lookback)",
        settings.target_symbol,
        settings.interval.as_str(),
        settings.lookback_days,
    );

    let (pipeline, broker) = sample_pipeline(&settings)?;
    let controller = RunController::new();

    let run_id = controller.start_run(pipeline, &settings.target_symbol);
    let final_state = match controller.wait_for_terminal(run_id).await {
        Some(state) => state,
        None => return Err("run vanished from the registry".into()),
    };

    log_run_summary(&final_state);
    for order in broker.placed() {
        log::info!(
            "paper order placed: {} {} x {} @ {:.2}",
            order.side,
            order.symbol,
            order.quantity,
            order.price,
        );
    }

    if final_state.phase == RunPhase::Failed {
        return Err(final_state
            .run_error
            .unwrap_or_else(|| "run failed".to_string())
            .into());
    }
    Ok(())
}
