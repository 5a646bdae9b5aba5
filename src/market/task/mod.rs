use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, span, warn, Level};

use crate::market::analysis::analyze_attention_history;
use crate::market::analysis::RiskLevel;
use crate::market::model::{
    FlowTable, InstrumentCatalog, ObservationTable, PriceTable, UNKNOWN_NAME,
};
use crate::market::provider::{BarProvider, FinMindClient, ObservationProvider};
use crate::market::services::{predict_disposal, run_screening, DisposalPrediction};

/// 注意股历史回看天数（自然日）
const ATTENTION_LOOKBACK_DAYS: i64 = 30;
/// 综合筛选的K线回看天数，需覆盖60日均线
const PRICE_LOOKBACK_DAYS: i64 = 100;
/// 法人数据回看天数
const FLOW_LOOKBACK_DAYS: i64 = 10;
/// 门槛推算的K线回看天数，预留假日余量后取最近10根
const THRESHOLD_LOOKBACK_DAYS: i64 = 20;

/// 每日处置预警任务：拉公告 → 分析历史 → 推算门槛 → 输出报告
pub async fn run_daily_alert_job(
    today: NaiveDate,
    observation_provider: &impl ObservationProvider,
    bar_provider: &(impl BarProvider + Sync),
    out_dir: &Path,
) -> anyhow::Result<()> {
    let span = span!(Level::INFO, "run_daily_alert_job");
    let _enter = span.enter();

    let start = today - Duration::days(ATTENTION_LOOKBACK_DAYS);
    let rows = observation_provider.get_observations(start, today).await?;
    if rows.is_empty() {
        info!("近{}天无注意股票资料", ATTENTION_LOOKBACK_DAYS);
        save_json(out_dir, "disposal_alert.json", &Vec::<DisposalPrediction>::new())?;
        return Ok(());
    }

    let observations = ObservationTable::from_observations(rows);
    info!("涵盖 {} 档不同股票", observations.len());

    // 先只跑历史分析，确定候选股后再拉K线
    let escalated: Vec<String> = observations
        .instruments()
        .filter(|id| {
            analyze_attention_history(
                id,
                observations.display_name(id).unwrap_or(UNKNOWN_NAME),
                observations.observations(id),
                today,
            )
            .will_escalate
        })
        .cloned()
        .collect();

    if escalated.is_empty() {
        info!("目前无股票达到处置标准");
        save_json(out_dir, "disposal_alert.json", &Vec::<DisposalPrediction>::new())?;
        return Ok(());
    }
    info!("发现 {} 档候选股票，拉取最近K线...", escalated.len());

    let bar_start = today - Duration::days(THRESHOLD_LOOKBACK_DAYS);
    let fetches = escalated
        .iter()
        .map(|id| bar_provider.get_bars(id, bar_start, today));
    let mut all_bars = Vec::new();
    for (id, result) in escalated.iter().zip(join_all(fetches).await) {
        match result {
            Ok(bars) => all_bars.extend(bars),
            Err(e) => warn!("拉取 {} 的K线失败，跳过该股票: {:#}", id, e),
        }
    }
    let prices = PriceTable::from_bars(all_bars);

    let predictions = predict_disposal(today, &observations, &prices);
    render_alert_report(&predictions);
    save_json(out_dir, "disposal_alert.json", &predictions)?;
    Ok(())
}

fn render_alert_report(predictions: &[DisposalPrediction]) {
    if predictions.is_empty() {
        info!("目前无股票达到处置标准");
        return;
    }
    info!("发现 {} 档股票可能被处置", predictions.len());
    for p in predictions {
        info!(
            "{} {} 风险等级[{}] {} | 连续{}日 近10日{}日 近30日{}日 | 涨幅门槛 >{:.2} 跌幅门槛 <{:.2}",
            p.instrument_id,
            p.display_name,
            p.risk.label(),
            p.analysis.reason.as_deref().unwrap_or("-"),
            p.analysis.consecutive_days,
            p.analysis.days_in_10,
            p.analysis.days_in_30,
            p.thresholds.change_up_price,
            p.thresholds.change_down_price,
        );
    }
    for level in [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ] {
        let count = predictions.iter().filter(|p| p.risk == level).count();
        info!("{}风险: {} 档", level.label(), count);
    }
}

/// 综合筛选任务：批量拉行情与法人数据，跑四策略 + 族群排名 + 交集
pub async fn run_screening_job(
    today: NaiveDate,
    catalog: &InstrumentCatalog,
    finmind: &FinMindClient,
    min_strategies: usize,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let span = span!(Level::INFO, "run_screening_job");
    let _enter = span.enter();

    let flow_start = today - Duration::days(FLOW_LOOKBACK_DAYS);
    let price_start = today - Duration::days(PRICE_LOOKBACK_DAYS);

    let flow_rows = finmind.get_all_flows(flow_start, today).await?;
    let price_rows = finmind.get_all_bars(price_start, today).await?;
    info!(
        "获取价格资料 {} 笔，法人资料 {} 笔",
        price_rows.len(),
        flow_rows.len()
    );

    let prices = PriceTable::from_bars(price_rows);
    let flows = FlowTable::from_flows(flow_rows);

    let outcome = run_screening(catalog, &prices, &flows, min_strategies);

    for set in &outcome.strategy_results {
        info!("{}: {} 笔", set.strategy.label(), set.results.len());
        save_json(out_dir, strategy_file_name(set.strategy), &set.results)?;
    }
    if !outcome.category_ranks.is_empty() {
        info!("族群排名前列:");
        for rank in outcome.category_ranks.iter().take(10) {
            info!(
                "  #{} {} 平均涨幅 {:.2}% 上涨 {}/{}",
                rank.rank, rank.category, rank.avg_return, rank.up_count, rank.member_count
            );
        }
    }
    for hit in &outcome.intersections {
        info!(
            "{} {} 符合 {} 个策略: {}",
            hit.instrument_id,
            catalog.display_name(&hit.instrument_id),
            hit.strategy_count,
            hit.strategies.join(", ")
        );
    }
    if outcome.intersections.is_empty() {
        info!("目前没有股票同时符合 {} 个以上策略", min_strategies);
    }

    save_json(out_dir, "category_ranks.json", &outcome.category_ranks)?;
    save_json(out_dir, "intersections.json", &outcome.intersections)?;
    Ok(())
}

fn strategy_file_name(strategy: crate::market::strategy::StrategyType) -> &'static str {
    use crate::market::strategy::StrategyType;
    match strategy {
        StrategyType::ForeignSurge => "foreign_surge.json",
        StrategyType::TrustAccumulation => "trust_accumulation.json",
        StrategyType::StrongStock => "strong_stock.json",
        StrategyType::ConsolidationBreakout => "consolidation_breakout.json",
    }
}

/// 结果落地为 JSON 文件，目录不存在时先创建
fn save_json<T: Serialize>(out_dir: &Path, file_name: &str, value: &T) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("创建输出目录失败: {}", out_dir.display()))?;
    let path = out_dir.join(file_name);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, content)
        .with_context(|| format!("写入结果文件失败: {}", path.display()))?;
    info!("已保存 {}", path.display());
    Ok(())
}
