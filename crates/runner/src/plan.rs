//! Default pipeline plan
//!
//! Six stages: ingest runs alone so every analyst sees the same market
//! snapshot, the analyst and research stages fan out in parallel, and
//! the signal, risk and decision stages run sequentially because each
//! consumes its predecessor's section.

use crate::settings::Settings;
use delphi_analysts::{
    BearResearchTask, BullResearchTask, DecisionTask, ExecutionTask, FundamentalsTask,
    MarketDataTask, NewsTask, RiskTask, SentimentTask, SignalTask, TechnicalAnalysisTask,
};
use delphi_gateway::{MarketData, OrderGateway};
use delphi_indicators::IndicatorConfig;
use delphi_pipeline::{Pipeline, PipelineResult, Stage};
use std::sync::Arc;

/// Assemble the default six-stage analysis pipeline
pub fn default_pipeline(
    settings: &Settings,
    feed: Arc<dyn MarketData>,
    broker: Arc<dyn OrderGateway>,
) -> PipelineResult<Pipeline> {
    let indicator_config = IndicatorConfig {
        rsi_period: settings.rsi_period,
        ..IndicatorConfig::default()
    };

    let ingest = Stage::sequential(
        "ingest",
        vec![Arc::new(MarketDataTask::new(
            feed,
            settings.target_symbol.clone(),
            settings.interval,
            settings.lookback_days,
        ))],
    )?;

    let analysts = Stage::parallel(
        "analysts",
        vec![
            Arc::new(TechnicalAnalysisTask::new(
                indicator_config,
                settings.rsi_overbought,
                settings.rsi_oversold,
            )),
            Arc::new(FundamentalsTask),
            Arc::new(SentimentTask),
            Arc::new(NewsTask::with_sample_wire(&settings.target_symbol)),
        ],
    )?;

    let research = Stage::parallel(
        "research",
        vec![Arc::new(BullResearchTask), Arc::new(BearResearchTask)],
    )?;

    let signal = Stage::sequential(
        "signal",
        vec![Arc::new(SignalTask::new(
            settings.rsi_overbought,
            settings.rsi_oversold,
            settings.stop_loss_percent,
        ))],
    )?;

    let risk = Stage::sequential(
        "risk",
        vec![Arc::new(RiskTask::new(
            settings.account_balance,
            settings.max_position_size,
        ))],
    )?;

    let decision = Stage::sequential(
        "decision",
        vec![Arc::new(DecisionTask), Arc::new(ExecutionTask::new(broker))],
    )?;

    Pipeline::new(vec![ingest, analysts, research, signal, risk, decision])
}

#[cfg(test)]
mod tests {
    use super::*;
    use delphi_gateway::{PaperBroker, SampleFeed};
    use delphi_pipeline::StageMode;

    #[test]
    fn test_default_plan_shape() {
        let settings = Settings::default();
        let feed = Arc::new(SampleFeed::with_seed(1));
        let broker = Arc::new(PaperBroker::new());
        let pipeline = default_pipeline(&settings, feed, broker).unwrap();

        let stages = pipeline.stages();
        assert_eq!(stages.len(), 6);
        assert_eq!(
            stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            vec!["ingest", "analysts", "research", "signal", "risk", "decision"],
        );
        assert_eq!(stages[1].mode(), StageMode::Parallel);
        assert_eq!(stages[1].tasks().len(), 4);
        assert_eq!(stages[5].mode(), StageMode::Sequential);
        assert_eq!(stages[5].tasks().len(), 2);
    }
}
