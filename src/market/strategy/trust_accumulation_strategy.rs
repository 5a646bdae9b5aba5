use std::collections::BTreeMap;

use crate::market::model::flow::flows_of_class;
use crate::market::model::{InstitutionalFlow, InvestorClass, PriceBar};
use crate::market::strategy::{ScreenResult, Screener, StrategyType};

/// 投信连续买超：近5日至少4日净买超、日均买超达标、5日振幅受限、股价不超上限
pub struct TrustAccumulationStrategy {
    /// 5日日均净买超张数下限
    pub min_avg_lots: f64,
    /// 5日最高/最低振幅上限（比例）
    pub max_amplitude: f64,
    /// 最新收盘价上限（元）
    pub max_price: f64,
}

impl Default for TrustAccumulationStrategy {
    fn default() -> Self {
        Self {
            min_avg_lots: 500.0,
            max_amplitude: 0.14,
            max_price: 1000.0,
        }
    }
}

impl Screener for TrustAccumulationStrategy {
    fn strategy(&self) -> StrategyType {
        StrategyType::TrustAccumulation
    }

    fn screen(
        &self,
        instrument_id: &str,
        bars: &[PriceBar],
        flows: &[InstitutionalFlow],
    ) -> Vec<ScreenResult> {
        let trust_rows = flows_of_class(flows, &InvestorClass::InvestmentTrust);
        if trust_rows.is_empty() || bars.is_empty() {
            return vec![];
        }

        // 近5日买超统计，窗口固定按5日计算日均
        let window: Vec<&InstitutionalFlow> = trust_rows.iter().take(5).copied().collect();
        let buy_days = window.iter().filter(|f| f.net() > 0.0).count();
        let total_net = window.iter().map(|f| f.net()).sum::<f64>();
        let avg_lots = total_net / 1000.0 / 5.0;
        if buy_days < 4 || avg_lots < self.min_avg_lots {
            return vec![];
        }

        // 近5日价格波动
        let recent = &bars[..bars.len().min(5)];
        let max_high = recent.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let min_low = recent.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let latest_close = recent[0].close;
        if min_low <= 0.0 {
            return vec![];
        }
        let amplitude = (max_high - min_low) / min_low;
        if amplitude > self.max_amplitude || latest_close > self.max_price {
            return vec![];
        }

        let mut metrics = BTreeMap::new();
        metrics.insert("buy_days".to_string(), buy_days as f64);
        metrics.insert("total_net_lots".to_string(), (total_net / 1000.0).trunc());
        metrics.insert("avg_net_lots".to_string(), avg_lots.trunc());
        metrics.insert("high_5d".to_string(), max_high);
        metrics.insert("low_5d".to_string(), min_low);
        metrics.insert("amplitude_pct".to_string(), amplitude * 100.0);
        metrics.insert("close".to_string(), latest_close);

        vec![ScreenResult {
            instrument_id: instrument_id.to_string(),
            strategy: self.strategy(),
            date: recent[0].date,
            metrics,
            rank_key: avg_lots.trunc(),
        }]
    }
}
