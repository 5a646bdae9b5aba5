use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一股票一交易日的日K线，成交量单位为股
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub instrument_id: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn builder() -> PriceBarBuilder {
        PriceBarBuilder::new()
    }

    /// 成交量折算为张（1张 = 1000股）
    pub fn volume_lots(&self) -> f64 {
        self.volume / 1000.0
    }
}

pub struct PriceBarBuilder {
    instrument_id: Option<String>,
    date: Option<NaiveDate>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl PriceBarBuilder {
    pub fn new() -> Self {
        Self {
            instrument_id: None,
            date: None,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    pub fn instrument_id(mut self, val: &str) -> Self {
        self.instrument_id = Some(val.to_string());
        self
    }

    pub fn date(mut self, val: NaiveDate) -> Self {
        self.date = Some(val);
        self
    }

    pub fn open(mut self, val: f64) -> Self {
        self.open = Some(val);
        self
    }

    pub fn high(mut self, val: f64) -> Self {
        self.high = Some(val);
        self
    }

    pub fn low(mut self, val: f64) -> Self {
        self.low = Some(val);
        self
    }

    pub fn close(mut self, val: f64) -> Self {
        self.close = Some(val);
        self
    }

    pub fn volume(mut self, val: f64) -> Self {
        self.volume = Some(val);
        self
    }

    pub fn build(self) -> anyhow::Result<PriceBar> {
        if let (Some(instrument_id), Some(date), Some(o), Some(h), Some(l), Some(c), Some(v)) = (
            self.instrument_id,
            self.date,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ) {
            // validate
            if l <= o && l <= c && l <= h && h >= o && h >= c && v >= 0.0 && l >= 0.0 {
                Ok(PriceBar {
                    instrument_id,
                    date,
                    open: o,
                    high: h,
                    low: l,
                    close: c,
                    volume: v,
                })
            } else {
                Err(anyhow::anyhow!("PriceBarInvalid"))
            }
        } else {
            Err(anyhow::anyhow!("PriceBarIncomplete"))
        }
    }
}

/// 按股票归集的日K线表，每支股票的K线按日期降序（最新在前）
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    bars: BTreeMap<String, Vec<PriceBar>>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 归集原始K线：按股票分组、按日期降序、同日去重
    pub fn from_bars(rows: Vec<PriceBar>) -> Self {
        let mut table = Self::new();
        for bar in rows {
            table
                .bars
                .entry(bar.instrument_id.clone())
                .or_default()
                .push(bar);
        }
        for bars in table.bars.values_mut() {
            bars.sort_by(|a, b| b.date.cmp(&a.date));
            bars.dedup_by(|a, b| a.date == b.date);
        }
        table
    }

    /// 指定股票的K线（日期降序），查无返回空切片
    pub fn bars(&self, instrument_id: &str) -> &[PriceBar] {
        self.bars
            .get(instrument_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, instrument_id: &str) -> bool {
        self.bars.contains_key(instrument_id)
    }

    pub fn instruments(&self) -> impl Iterator<Item = &String> {
        self.bars.keys()
    }

    /// 全表最新交易日（即实际使用的交易日，非自然日）
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars
            .values()
            .filter_map(|bars| bars.first().map(|b| b.date))
            .max()
    }

    /// 指定股票在指定日的收盘价
    pub fn close_on(&self, instrument_id: &str, date: NaiveDate) -> Option<f64> {
        self.bars(instrument_id)
            .iter()
            .find(|b| b.date == date)
            .map(|b| b.close)
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
