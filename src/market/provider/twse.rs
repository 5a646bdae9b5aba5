use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::market::model::AttentionObservation;
use crate::market::provider::{ObservationProvider, HTTP_CLIENT};
use crate::time_util;

const NOTICE_URL: &str = "https://www.twse.com.tw/rwd/zh/announcement/notice";
/// 证交所接口对无 UA 的请求会拒绝
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Deserialize)]
struct NoticeResponse {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// 证交所注意有价证券公告客户端
#[derive(Debug, Default)]
pub struct TwseNoticeClient;

impl TwseNoticeClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObservationProvider for TwseNoticeClient {
    async fn get_observations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<AttentionObservation>> {
        let start_date = time_util::format_date_compact(start);
        let end_date = time_util::format_date_compact(end);
        let response = HTTP_CLIENT
            .get(NOTICE_URL)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("response", "json"),
                ("startDate", start_date.as_str()),
                ("endDate", end_date.as_str()),
            ])
            .send()
            .await?;
        let text = response.text().await?;
        let parsed: NoticeResponse = serde_json::from_str(&text)?;

        if parsed.data.is_empty() {
            info!("查无 {} 至 {} 的注意股票资料", start, end);
            return Ok(vec![]);
        }

        // 按 fields 名称定位列，接口调整列序时不至于错位
        let col = |name: &str, fallback: usize| -> usize {
            parsed
                .fields
                .iter()
                .position(|f| f == name)
                .unwrap_or(fallback)
        };
        let id_col = col("證券代號", 1);
        let name_col = col("證券名稱", 2);
        let count_col = col("累計次數", 3);
        let date_col = col("日期", 5);

        let mut observations = Vec::with_capacity(parsed.data.len());
        for row in &parsed.data {
            match parse_notice_row(row, id_col, name_col, count_col, date_col) {
                Some(obs) => observations.push(obs),
                None => warn!("注意股公告记录解析失败，丢弃: {:?}", row),
            }
        }
        info!(
            "拉取注意股公告 {} ~ {}，共 {} 笔",
            start,
            end,
            observations.len()
        );
        Ok(observations)
    }
}

fn parse_notice_row(
    row: &[Value],
    id_col: usize,
    name_col: usize,
    count_col: usize,
    date_col: usize,
) -> Option<AttentionObservation> {
    let instrument_id = row.get(id_col)?.as_str()?.trim().to_string();
    let display_name = row.get(name_col)?.as_str()?.trim().to_string();
    let cumulative_count = match row.get(count_col)? {
        Value::Number(n) => n.as_u64()? as u32,
        Value::String(s) => s.trim().parse::<u32>().ok()?,
        _ => return None,
    };
    let date_roc = row.get(date_col)?.as_str()?.trim().to_string();
    if instrument_id.is_empty() || date_roc.is_empty() {
        return None;
    }
    Some(AttentionObservation {
        instrument_id,
        display_name,
        date_roc,
        cumulative_count,
    })
}
