use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

/// 多策略交集中的一支股票
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionHit {
    pub instrument_id: String,
    /// 命中的不同策略数
    pub strategy_count: usize,
    /// 命中的策略名称，字典序
    pub strategies: Vec<String>,
}

/// 多策略交集分析：找出被至少 min_strategies 个策略同时命中的股票
///
/// result_sets 为 (策略名, 命中股票代码列表)。同一策略内重复出现的
/// 股票只计一次。结果按命中策略数降序，数量相同按首次出现顺序。
pub fn find_intersections(
    result_sets: &[(String, Vec<String>)],
    min_strategies: usize,
) -> Vec<IntersectionHit> {
    let mut encounter_order: Vec<String> = Vec::new();
    let mut hits: HashMap<String, BTreeSet<String>> = HashMap::new();

    for (strategy_name, instrument_ids) in result_sets {
        for instrument_id in instrument_ids {
            if !hits.contains_key(instrument_id) {
                encounter_order.push(instrument_id.clone());
            }
            hits.entry(instrument_id.clone())
                .or_default()
                .insert(strategy_name.clone());
        }
    }

    let mut result: Vec<IntersectionHit> = encounter_order
        .into_iter()
        .filter_map(|instrument_id| {
            let strategies = &hits[&instrument_id];
            if strategies.len() >= min_strategies {
                Some(IntersectionHit {
                    instrument_id,
                    strategy_count: strategies.len(),
                    strategies: strategies.iter().cloned().collect(),
                })
            } else {
                None
            }
        })
        .collect();

    // 稳定排序：数量相同维持首次出现顺序
    result.sort_by(|a, b| b.strategy_count.cmp(&a.strategy_count));
    result
}
