use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::market::indicator::returns::n_session_return;
use crate::market::model::{FlowTable, InstrumentCatalog, InvestorClass, PriceTable};

/// 族群横截面统计与排名
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRank {
    pub category: String,
    /// 成员当日涨跌幅均值（%）
    pub avg_return: f64,
    /// 上涨档数比例，0.0 ~ 1.0
    pub advance_ratio: f64,
    pub up_count: usize,
    pub member_count: usize,
    /// 近一日法人净买超金额（元），外资与投信合计
    pub flow_1d: f64,
    /// 近三个交易日法人净买超金额（元）
    pub flow_3d: f64,
    pub rank: usize,
}

/// 族群排名：按上涨档数比例降序，比例相同保持族群首次出现顺序
///
/// 族群隶属关系一对多，一支股票可计入多个族群。
/// 成员当日无K线或无前一日收盘时跳过该成员，不影响其余统计。
pub fn rank_categories(
    anchor: NaiveDate,
    catalog: &InstrumentCatalog,
    prices: &PriceTable,
    flows: &FlowTable,
) -> Vec<CategoryRank> {
    // 按族群归集成员当日涨跌幅，保持清单中族群首次出现的顺序
    let mut category_order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<(String, f64)>> = HashMap::new();

    for (instrument_id, category) in catalog.memberships() {
        let bars = prices.bars(instrument_id);
        let has_anchor_bar = bars.first().map(|b| b.date == anchor).unwrap_or(false);
        if !has_anchor_bar {
            continue;
        }
        let return_1d = match n_session_return(bars, 1) {
            Some(r) => r,
            None => continue,
        };
        if !members.contains_key(category) {
            category_order.push(category.to_string());
        }
        members
            .entry(category.to_string())
            .or_default()
            .push((instrument_id.to_string(), return_1d));
    }

    let mut ranks: Vec<CategoryRank> = Vec::with_capacity(category_order.len());
    for category in &category_order {
        let stats = &members[category];
        let member_count = stats.len();
        let avg_return = stats.iter().map(|(_, r)| r).sum::<f64>() / member_count as f64;
        let up_count = stats.iter().filter(|(_, r)| *r > 0.0).count();
        let advance_ratio = up_count as f64 / member_count as f64;

        let member_ids: Vec<&str> = stats.iter().map(|(id, _)| id.as_str()).collect();
        let (flow_1d, flow_3d) = aggregate_flow_notional(anchor, &member_ids, prices, flows);

        ranks.push(CategoryRank {
            category: category.clone(),
            avg_return,
            advance_ratio,
            up_count,
            member_count,
            flow_1d,
            flow_3d,
            rank: 0,
        });
    }

    // 稳定排序保证同比例族群维持出现顺序
    ranks.sort_by(|a, b| {
        b.advance_ratio
            .partial_cmp(&a.advance_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, rank) in ranks.iter_mut().enumerate() {
        rank.rank = i + 1;
    }
    ranks
}

/// 族群法人净买超金额：逐笔以当日收盘价换算为金额后求和
/// 近三日取族群内法人记录的最近 3 个不同交易日
fn aggregate_flow_notional(
    anchor: NaiveDate,
    member_ids: &[&str],
    prices: &PriceTable,
    flows: &FlowTable,
) -> (f64, f64) {
    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for id in member_ids {
        for flow in flows.flows(id) {
            let counted = matches!(
                flow.investor_class,
                InvestorClass::Foreign | InvestorClass::InvestmentTrust
            );
            if !counted {
                continue;
            }
            // 查无当日收盘价时该笔记录按 0 计
            let close = prices.close_on(id, flow.date).unwrap_or(0.0);
            rows.push((flow.date, flow.net() * close));
            dates.insert(flow.date);
        }
    }

    let recent_3: BTreeSet<NaiveDate> = dates.iter().rev().take(3).copied().collect();
    let flow_1d = rows
        .iter()
        .filter(|(d, _)| *d == anchor)
        .map(|(_, n)| n)
        .sum();
    let flow_3d = rows
        .iter()
        .filter(|(d, _)| recent_3.contains(d))
        .map(|(_, n)| n)
        .sum();
    (flow_1d, flow_3d)
}
