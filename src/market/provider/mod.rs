pub mod finmind;
pub mod twse;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;

use crate::market::model::{AttentionObservation, InstitutionalFlow, PriceBar};

pub use finmind::FinMindClient;
pub use twse::TwseNoticeClient;

/// 全局共享的 HTTP 客户端
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("build http client error")
});

/// 日K线数据源
/// 查无数据返回空集合，仅传输层故障才返回错误
#[async_trait]
pub trait BarProvider {
    async fn get_bars(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<PriceBar>>;
}

/// 法人买卖超数据源
#[async_trait]
pub trait FlowProvider {
    async fn get_flows(
        &self,
        instrument_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<InstitutionalFlow>>;
}

/// 注意股公告数据源，整批拉取区间内全部公告、不区分股票
#[async_trait]
pub trait ObservationProvider {
    async fn get_observations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<AttentionObservation>>;
}
