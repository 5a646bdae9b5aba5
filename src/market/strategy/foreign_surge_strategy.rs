use std::collections::BTreeMap;

use crate::market::model::flow::flows_of_class;
use crate::market::model::{InstitutionalFlow, InvestorClass, PriceBar};
use crate::market::strategy::{ScreenResult, Screener, StrategyType};

/// 外资大量买超：当日单一法人净买超超过张数门槛，或净买超金额超过金额门槛
pub struct ForeignSurgeStrategy {
    pub investor_class: InvestorClass,
    /// 当日净买超张数门槛
    pub min_net_lots: f64,
    /// 当日净买超金额门槛（元）
    pub min_notional: f64,
}

impl Default for ForeignSurgeStrategy {
    fn default() -> Self {
        Self {
            investor_class: InvestorClass::Foreign,
            min_net_lots: 5000.0,
            min_notional: 200_000_000.0,
        }
    }
}

impl Screener for ForeignSurgeStrategy {
    fn strategy(&self) -> StrategyType {
        StrategyType::ForeignSurge
    }

    fn screen(
        &self,
        instrument_id: &str,
        bars: &[PriceBar],
        flows: &[InstitutionalFlow],
    ) -> Vec<ScreenResult> {
        let anchor = match bars.first() {
            Some(bar) => bar,
            None => return vec![],
        };
        let class_rows = flows_of_class(flows, &self.investor_class);
        // 只看锚定交易日当日的买卖超
        let latest = match class_rows.iter().find(|f| f.date == anchor.date) {
            Some(row) => *row,
            None => return vec![],
        };

        let net_lots = latest.net_lots();
        let notional = latest.net() * anchor.close;
        if net_lots <= self.min_net_lots && notional <= self.min_notional {
            return vec![];
        }

        let foreign_stats = class_window_stats(&flows_of_class(flows, &InvestorClass::Foreign));
        let trust_stats =
            class_window_stats(&flows_of_class(flows, &InvestorClass::InvestmentTrust));

        let mut metrics = BTreeMap::new();
        metrics.insert("net_notional".to_string(), notional);
        metrics.insert("foreign_day1_lots".to_string(), foreign_stats.day1_lots);
        metrics.insert("foreign_day3_lots".to_string(), foreign_stats.day3_lots);
        metrics.insert("foreign_day5_lots".to_string(), foreign_stats.day5_lots);
        metrics.insert(
            "foreign_day5_buy_days".to_string(),
            foreign_stats.day5_buy_days,
        );
        metrics.insert("trust_day1_lots".to_string(), trust_stats.day1_lots);
        metrics.insert("trust_day3_lots".to_string(), trust_stats.day3_lots);
        metrics.insert("trust_day5_lots".to_string(), trust_stats.day5_lots);
        metrics.insert("trust_day5_buy_days".to_string(), trust_stats.day5_buy_days);

        vec![ScreenResult {
            instrument_id: instrument_id.to_string(),
            strategy: self.strategy(),
            date: anchor.date,
            metrics,
            rank_key: net_lots.trunc(),
        }]
    }
}

struct ClassWindowStats {
    day1_lots: f64,
    day3_lots: f64,
    day5_lots: f64,
    day5_buy_days: f64,
}

/// 近 1/3/5 日净买超张数与 5 日内买超天数
/// 记录不足对应窗口时该项计 0，与数据源的统计口径一致
fn class_window_stats(rows: &[&InstitutionalFlow]) -> ClassWindowStats {
    let sum_lots = |n: usize| -> f64 {
        (rows.iter().take(n).map(|f| f.net()).sum::<f64>() / 1000.0).trunc()
    };
    ClassWindowStats {
        day1_lots: if rows.is_empty() {
            0.0
        } else {
            rows[0].net_lots().trunc()
        },
        day3_lots: if rows.len() >= 3 { sum_lots(3) } else { 0.0 },
        day5_lots: if rows.len() >= 5 { sum_lots(5) } else { 0.0 },
        day5_buy_days: if rows.len() >= 5 {
            rows.iter().take(5).filter(|f| f.net() > 0.0).count() as f64
        } else {
            0.0
        },
    }
}
