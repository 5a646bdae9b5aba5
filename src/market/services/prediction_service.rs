use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::market::analysis::{
    analyze_attention_history, calculate_thresholds, classify_risk, RiskLevel, ThresholdSet,
};
use crate::market::model::{AttentionAnalysis, ObservationTable, PriceTable, UNKNOWN_NAME};

/// 门槛推算使用的K线窗口长度
const THRESHOLD_WINDOW: usize = 10;

/// 一支股票的处置预警
#[derive(Debug, Clone, Serialize)]
pub struct DisposalPrediction {
    pub instrument_id: String,
    pub display_name: String,
    pub risk: RiskLevel,
    pub analysis: AttentionAnalysis,
    pub thresholds: ThresholdSet,
}

/// 预测明日可能被处置的股票
///
/// 遍历注意股历史中的全部股票，命中升级条件者推算明日门槛并分级，
/// 结果按风险等级降序（同级维持代码序）。查无K线的股票跳过。
pub fn predict_disposal(
    today: NaiveDate,
    observations: &ObservationTable,
    prices: &PriceTable,
) -> Vec<DisposalPrediction> {
    let mut predictions = Vec::new();

    for instrument_id in observations.instruments() {
        let display_name = observations
            .display_name(instrument_id)
            .unwrap_or(UNKNOWN_NAME);
        let analysis = analyze_attention_history(
            instrument_id,
            display_name,
            observations.observations(instrument_id),
            today,
        );
        if !analysis.will_escalate {
            continue;
        }

        let bars = prices.bars(instrument_id);
        let window = &bars[..bars.len().min(THRESHOLD_WINDOW)];
        let thresholds = match calculate_thresholds(instrument_id, window) {
            Some(t) => t,
            None => {
                debug!("查无 {} 的K线数据，跳过门槛推算", instrument_id);
                continue;
            }
        };

        let risk = classify_risk(&analysis);
        predictions.push(DisposalPrediction {
            instrument_id: instrument_id.clone(),
            display_name: display_name.to_string(),
            risk,
            analysis,
            thresholds,
        });
    }

    predictions.sort_by(|a, b| b.risk.cmp(&a.risk));
    predictions
}
