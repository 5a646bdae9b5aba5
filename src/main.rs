use std::path::Path;

use anyhow::anyhow;
use chrono::Local;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};

use tw_quant::app_config::env::env_is_true;
use tw_quant::app_config::log::setup_logging;
use tw_quant::market::model::InstrumentCatalog;
use tw_quant::market::provider::{FinMindClient, TwseNoticeClient};
use tw_quant::market::task;
use tw_quant::time_util;

/// 台股处置预警与综合筛选
#[derive(Parser, Debug)]
#[command(name = "tw_quant")]
struct Args {
    /// 分析基准日（YYYY-MM-DD），默认今天
    #[arg(long)]
    date: Option<String>,

    /// 结果输出目录
    #[arg(long, default_value = "data/latest")]
    out_dir: String,

    /// 多策略交集的最低命中策略数
    #[arg(long, default_value_t = 3)]
    min_strategies: usize,

    /// 股票清单文件（JSON）
    #[arg(long, default_value = "config/instruments.json")]
    catalog: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    // 设置日志
    setup_logging().await?;

    let args = Args::parse();
    let today = match &args.date {
        Some(s) => time_util::parse_date(s).ok_or_else(|| anyhow!("日期格式错误: {}", s))?,
        None => Local::now().date_naive(),
    };
    let out_dir = Path::new(&args.out_dir);
    info!("分析基准日: {}", today);

    // 股票清单缺失时用空清单继续，名称回退占位
    let catalog = match InstrumentCatalog::load(&args.catalog) {
        Ok(catalog) => {
            info!("载入 {} 支股票", catalog.len());
            catalog
        }
        Err(e) => {
            warn!("{:#}，以空清单继续", e);
            InstrumentCatalog::default()
        }
    };

    let finmind = FinMindClient::from_env()?;

    // 每日处置预警
    if env_is_true("IS_RUN_DISPOSAL_JOB", true) {
        let twse = TwseNoticeClient::new();
        if let Err(e) = task::run_daily_alert_job(today, &twse, &finmind, out_dir).await {
            warn!("处置预警任务失败: {:#}", e);
        }
    }

    // 综合筛选
    if env_is_true("IS_RUN_SCREENING_JOB", true) {
        if let Err(e) =
            task::run_screening_job(today, &catalog, &finmind, args.min_strategies, out_dir).await
        {
            warn!("综合筛选任务失败: {:#}", e);
        }
    }

    Ok(())
}
