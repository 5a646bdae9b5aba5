use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 一笔注意股票公告记录
/// 日期为交易所公布的民国年格式（如 "114.05.12"），解析推迟到分析阶段，
/// 累计次数为交易所公布的累计值，非本地推算
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionObservation {
    pub instrument_id: String,
    pub display_name: String,
    pub date_roc: String,
    pub cumulative_count: u32,
}

/// 按股票归集的注意股票公告表
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    observations: BTreeMap<String, Vec<AttentionObservation>>,
}

impl ObservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations(rows: Vec<AttentionObservation>) -> Self {
        let mut table = Self::new();
        for obs in rows {
            table
                .observations
                .entry(obs.instrument_id.clone())
                .or_default()
                .push(obs);
        }
        table
    }

    pub fn observations(&self, instrument_id: &str) -> &[AttentionObservation] {
        self.observations
            .get(instrument_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn instruments(&self) -> impl Iterator<Item = &String> {
        self.observations.keys()
    }

    /// 公告中带的证券名称（取第一笔），查无时由调用方回退占位名
    pub fn display_name(&self, instrument_id: &str) -> Option<&str> {
        self.observations(instrument_id)
            .first()
            .map(|o| o.display_name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }
}

/// 注意股历史分析结果，每次运行重算、不落地
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionAnalysis {
    pub instrument_id: String,
    pub display_name: String,
    /// 累计被列入注意股的天数
    pub total_days: usize,
    /// 最近一段未中断的连续天数（容忍 ≤3 自然日的间隔）
    pub consecutive_days: usize,
    /// 近10个自然日内的注意股天数
    pub days_in_10: usize,
    /// 近30个自然日内的注意股天数
    pub days_in_30: usize,
    /// 是否预测将被处置
    pub will_escalate: bool,
    /// 预测处置原因
    pub reason: Option<String>,
}
