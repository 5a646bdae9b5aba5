use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::market::analysis::{rank_categories, CategoryRank};
use crate::market::indicator::returns::n_session_return;
use crate::market::model::{FlowTable, InstrumentCatalog, PriceTable};
use crate::market::strategy::{
    find_intersections, BreakoutStrategy, ForeignSurgeStrategy, IntersectionHit, ScreenResult,
    Screener, StrategyType, StrongStockStrategy, TrustAccumulationStrategy,
};

/// 强势股的比较基准（台湾50 ETF）
pub const BENCHMARK_INSTRUMENT: &str = "0050";

/// 单一策略的命中集合
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResultSet {
    pub strategy: StrategyType,
    pub results: Vec<ScreenResult>,
}

/// 一次综合筛选的全部产出
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningOutcome {
    pub anchor_date: Option<NaiveDate>,
    pub strategy_results: Vec<StrategyResultSet>,
    pub category_ranks: Vec<CategoryRank>,
    pub intersections: Vec<IntersectionHit>,
}

impl ScreeningOutcome {
    fn empty() -> Self {
        Self {
            anchor_date: None,
            strategy_results: vec![],
            category_ranks: vec![],
            intersections: vec![],
        }
    }
}

/// 执行全部筛选策略 + 族群排名 + 多策略交集
///
/// 上游数据为空时返回空产出，等同"无符合条件的股票"，绝不报错。
/// 股票清单缺失时退化为对价格表内全部股票筛选（名称用占位）。
pub fn run_screening(
    catalog: &InstrumentCatalog,
    prices: &PriceTable,
    flows: &FlowTable,
    min_strategies: usize,
) -> ScreeningOutcome {
    let anchor = match prices.latest_date() {
        Some(date) => date,
        None => {
            warn!("价格表为空，筛选直接返回空结果");
            return ScreeningOutcome::empty();
        }
    };
    info!("实际使用交易日: {}", anchor);

    // 筛选范围：价格表与股票清单的交集；清单缺失则取价格表全集
    let universe: Vec<&String> = prices
        .instruments()
        .filter(|id| id.as_str() != BENCHMARK_INSTRUMENT)
        .filter(|id| catalog.is_empty() || catalog.contains(id))
        .collect();

    let benchmark_return_10d = n_session_return(prices.bars(BENCHMARK_INSTRUMENT), 10);
    if benchmark_return_10d.is_none() {
        warn!("无法计算基准 {} 的10日涨幅，强势股策略停用", BENCHMARK_INSTRUMENT);
    }

    let mut screeners: Vec<Box<dyn Screener>> = vec![
        Box::new(ForeignSurgeStrategy::default()),
        Box::new(TrustAccumulationStrategy::default()),
    ];
    if let Some(benchmark) = benchmark_return_10d {
        info!("基准 {} 十日涨幅: {:.2}%", BENCHMARK_INSTRUMENT, benchmark);
        screeners.push(Box::new(StrongStockStrategy::new(benchmark)));
    }
    screeners.push(Box::new(BreakoutStrategy::default()));

    let mut strategy_results = Vec::with_capacity(screeners.len());
    for screener in &screeners {
        let mut results: Vec<ScreenResult> = Vec::new();
        for instrument_id in &universe {
            results.extend(screener.screen(
                instrument_id,
                prices.bars(instrument_id),
                flows.flows(instrument_id),
            ));
        }
        sort_results(screener.strategy(), &mut results);
        info!(
            "策略 [{}] 命中 {} 笔",
            screener.strategy().label(),
            results.len()
        );
        strategy_results.push(StrategyResultSet {
            strategy: screener.strategy(),
            results,
        });
    }

    let category_ranks = rank_categories(anchor, catalog, prices, flows);

    let result_sets: Vec<(String, Vec<String>)> = strategy_results
        .iter()
        .map(|set| {
            let mut seen = std::collections::HashSet::new();
            let ids = set
                .results
                .iter()
                .map(|r| r.instrument_id.clone())
                .filter(|id| seen.insert(id.clone()))
                .collect();
            (set.strategy.label().to_string(), ids)
        })
        .collect();
    let intersections = find_intersections(&result_sets, min_strategies);

    ScreeningOutcome {
        anchor_date: Some(anchor),
        strategy_results,
        category_ranks,
        intersections,
    }
}

/// 策略内排序：外资买超按当日净买超降序，盘整突破按突破日降序，
/// 其余维持股票代码序（稳定排序，不打乱同键结果）
fn sort_results(strategy: StrategyType, results: &mut [ScreenResult]) {
    match strategy {
        StrategyType::ForeignSurge => {
            results.sort_by(|a, b| {
                b.rank_key
                    .partial_cmp(&a.rank_key)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        StrategyType::ConsolidationBreakout => {
            results.sort_by(|a, b| b.date.cmp(&a.date));
        }
        StrategyType::TrustAccumulation | StrategyType::StrongStock => {}
    }
}
