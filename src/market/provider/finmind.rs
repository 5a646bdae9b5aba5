use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::{debug, warn};

use crate::app_config::env::require_env;
use crate::error::AppError;
use crate::market::model::{InstitutionalFlow, InvestorClass, PriceBar};
use crate::market::provider::{BarProvider, FlowProvider, HTTP_CLIENT};
use crate::time_util;

const API_URL: &str = "https://api.finmindtrade.com/api/v4/data";
const DATASET_PRICE: &str = "TaiwanStockPrice";
const DATASET_INSTITUTIONAL: &str = "TaiwanStockInstitutionalInvestorsBuySell";

/// 失败重试次数与间隔
const RETRY_TIMES: usize = 3;
const RETRY_INTERVAL_MS: u64 = 1000;
/// 批量按日拉取时的请求间隔，避免触发限流
const BULK_REQUEST_DELAY_MS: u64 = 50;

#[derive(Debug, Deserialize)]
struct FinMindResponse {
    status: Option<i64>,
    msg: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
}

/// FinMind 行情数据客户端
pub struct FinMindClient {
    token: String,
}

impl FinMindClient {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    /// 从环境变量 FINMIND_TOKEN 构建
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(require_env("FINMIND_TOKEN")?))
    }

    /// 拉取一个数据集，带重试；API 层面报错视为无数据
    async fn fetch_dataset(
        &self,
        dataset: &str,
        data_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<Value>> {
        let start_date = time_util::format_date(start);
        let end_date = time_util::format_date(end);
        let retry_strategy = FixedInterval::from_millis(RETRY_INTERVAL_MS).take(RETRY_TIMES - 1);
        let body = Retry::spawn(retry_strategy, || async {
            let mut request = HTTP_CLIENT
                .get(API_URL)
                .bearer_auth(&self.token)
                .query(&[
                    ("dataset", dataset),
                    ("start_date", start_date.as_str()),
                    ("end_date", end_date.as_str()),
                ]);
            if let Some(id) = data_id {
                request = request.query(&[("data_id", id)]);
            }
            let response = request.send().await?;
            let text = response.text().await?;
            Ok::<String, anyhow::Error>(text)
        })
        .await?;

        let parsed: FinMindResponse = serde_json::from_str(&body)?;
        if parsed.status != Some(200) {
            warn!(
                "FinMind 接口返回异常 dataset={} status={:?} msg={:?}",
                dataset, parsed.status, parsed.msg
            );
            return Ok(vec![]);
        }
        Ok(parsed.data)
    }

    /// 按日批量拉取区间内全市场日K线
    pub async fn get_all_bars(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<PriceBar>> {
        let mut bars = Vec::new();
        for date in time_util::days_between(start, end) {
            // 单日失败只记日志不中断整批
            match self.fetch_dataset(DATASET_PRICE, None, date, date).await {
                Ok(rows) => bars.extend(rows.iter().filter_map(parse_price_row)),
                Err(e) => warn!("拉取 {} 日K线失败: {:#}", date, e),
            }
            tokio::time::sleep(std::time::Duration::from_millis(BULK_REQUEST_DELAY_MS)).await;
        }
        debug!("批量拉取日K线 {} ~ {}，共 {} 笔", start, end, bars.len());
        Ok(bars)
    }

    /// 按日批量拉取区间内全市场法人买卖超
    pub async fn get_all_flows(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<InstitutionalFlow>> {
        let mut flows = Vec::new();
        for date in time_util::days_between(start, end) {
            match self
                .fetch_dataset(DATASET_INSTITUTIONAL, None, date, date)
                .await
            {
                Ok(rows) => flows.extend(rows.iter().filter_map(parse_flow_row)),
                Err(e) => warn!("拉取 {} 法人数据失败: {:#}", date, e),
            }
            tokio::time::sleep(std::time::Duration::from_millis(BULK_REQUEST_DELAY_MS)).await;
        }
        debug!("批量拉取法人数据 {} ~ {}，共 {} 笔", start, end, flows.len());
        Ok(flows)
    }
}

#[async_trait]
impl BarProvider for FinMindClient {
    async fn get_bars(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<PriceBar>> {
        let rows = self
            .fetch_dataset(DATASET_PRICE, Some(instrument_id), start, end)
            .await?;
        Ok(rows.iter().filter_map(parse_price_row).collect())
    }
}

#[async_trait]
impl FlowProvider for FinMindClient {
    async fn get_flows(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<InstitutionalFlow>> {
        let rows = self
            .fetch_dataset(DATASET_INSTITUTIONAL, Some(instrument_id), start, end)
            .await?;
        Ok(rows.iter().filter_map(parse_flow_row).collect())
    }
}

/// 数值字段兼容 JSON number 与字符串两种形态
fn value_to_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_to_str(value: Option<&Value>) -> Option<&str> {
    value?.as_str()
}

/// 单笔日K线记录归一化，字段缺失或非法的整笔丢弃
fn parse_price_row(row: &Value) -> Option<PriceBar> {
    let instrument_id = value_to_str(row.get("stock_id"))?;
    let date = time_util::parse_date(value_to_str(row.get("date"))?)?;
    let bar = PriceBar::builder()
        .instrument_id(instrument_id)
        .date(date)
        .open(value_to_f64(row.get("open"))?)
        .high(value_to_f64(row.get("max"))?)
        .low(value_to_f64(row.get("min"))?)
        .close(value_to_f64(row.get("close"))?)
        .volume(value_to_f64(row.get("Trading_Volume"))?)
        .build();
    match bar {
        Ok(bar) => Some(bar),
        Err(e) => {
            warn!("日K线记录非法，丢弃: {} {} {}", instrument_id, date, e);
            None
        }
    }
}

fn parse_flow_row(row: &Value) -> Option<InstitutionalFlow> {
    let instrument_id = value_to_str(row.get("stock_id"))?;
    let date = time_util::parse_date(value_to_str(row.get("date"))?)?;
    let name = value_to_str(row.get("name"))?;
    Some(InstitutionalFlow {
        instrument_id: instrument_id.to_string(),
        date,
        investor_class: InvestorClass::from_name(name),
        buy_qty: value_to_f64(row.get("buy"))?,
        sell_qty: value_to_f64(row.get("sell"))?,
    })
}
