use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 法人类别，FinMind 的 name 字段
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestorClass {
    /// 外资（含陆资）
    Foreign,
    /// 投信
    InvestmentTrust,
    /// 自营商
    Dealer,
    /// 其余类别原样保留
    Other(String),
}

impl InvestorClass {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Foreign_Investor" => InvestorClass::Foreign,
            "Investment_Trust" => InvestorClass::InvestmentTrust,
            "Dealer_self" | "Dealer_Hedging" => InvestorClass::Dealer,
            other => InvestorClass::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            InvestorClass::Foreign => "外資",
            InvestorClass::InvestmentTrust => "投信",
            InvestorClass::Dealer => "自營商",
            InvestorClass::Other(name) => name,
        }
    }
}

/// 单一法人类别对一股票一交易日的买卖超，数量单位为股
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionalFlow {
    pub instrument_id: String,
    pub date: NaiveDate,
    pub investor_class: InvestorClass,
    pub buy_qty: f64,
    pub sell_qty: f64,
}

impl InstitutionalFlow {
    /// 净买超（股），买减卖
    pub fn net(&self) -> f64 {
        self.buy_qty - self.sell_qty
    }

    /// 净买超折算为张
    pub fn net_lots(&self) -> f64 {
        self.net() / 1000.0
    }
}

/// 按股票归集的法人买卖超表，每支股票的记录按日期降序
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    flows: BTreeMap<String, Vec<InstitutionalFlow>>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flows(rows: Vec<InstitutionalFlow>) -> Self {
        let mut table = Self::new();
        for flow in rows {
            table
                .flows
                .entry(flow.instrument_id.clone())
                .or_default()
                .push(flow);
        }
        for flows in table.flows.values_mut() {
            flows.sort_by(|a, b| b.date.cmp(&a.date));
        }
        table
    }

    /// 指定股票的全部法人记录（日期降序），查无返回空切片
    pub fn flows(&self, instrument_id: &str) -> &[InstitutionalFlow] {
        self.flows
            .get(instrument_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn instruments(&self) -> impl Iterator<Item = &String> {
        self.flows.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// 过滤出指定法人类别的记录，保持日期降序
pub fn flows_of_class<'a>(
    flows: &'a [InstitutionalFlow],
    class: &InvestorClass,
) -> Vec<&'a InstitutionalFlow> {
    flows.iter().filter(|f| &f.investor_class == class).collect()
}
