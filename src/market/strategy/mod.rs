pub mod breakout_strategy;
pub mod foreign_surge_strategy;
pub mod intersection;
pub mod strong_stock_strategy;
pub mod trust_accumulation_strategy;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::market::model::{InstitutionalFlow, PriceBar};

pub use breakout_strategy::BreakoutStrategy;
pub use foreign_surge_strategy::ForeignSurgeStrategy;
pub use intersection::{find_intersections, IntersectionHit};
pub use strong_stock_strategy::StrongStockStrategy;
pub use trust_accumulation_strategy::TrustAccumulationStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StrategyType {
    ForeignSurge,
    TrustAccumulation,
    StrongStock,
    ConsolidationBreakout,
}

impl StrategyType {
    /// 报表中的策略名称
    pub fn label(&self) -> &'static str {
        match self {
            StrategyType::ForeignSurge => "外資大量買超",
            StrategyType::TrustAccumulation => "投信連續買超",
            StrategyType::StrongStock => "強勢股篩選",
            StrategyType::ConsolidationBreakout => "盤整突破",
        }
    }
}

/// 单支股票单策略的一笔命中
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenResult {
    pub instrument_id: String,
    pub strategy: StrategyType,
    /// 结果锚定的交易日，盘整突破为突破日
    pub date: NaiveDate,
    /// 诊断指标，BTreeMap 保证序列化顺序稳定
    pub metrics: BTreeMap<String, f64>,
    /// 策略内排序键，降序使用
    pub rank_key: f64,
}

/// 筛选策略的统一能力
///
/// 输入一支股票的有界历史窗口（K线与法人记录均按日期降序），
/// 输出零或多笔命中。历史不足是跳过，不是错误。
/// 各策略互不依赖、无共享状态，任意顺序执行结果一致。
pub trait Screener {
    fn strategy(&self) -> StrategyType;

    fn screen(
        &self,
        instrument_id: &str,
        bars: &[PriceBar],
        flows: &[InstitutionalFlow],
    ) -> Vec<ScreenResult>;
}
