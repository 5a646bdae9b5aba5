use chrono::{Duration, NaiveDate};
use tw_quant::market::model::PriceBar;
use tw_quant::market::strategy::{Screener, StrongStockStrategy};

/// 构造按日期降序的K线：closes[0] 为最新一日
fn bars(closes: &[f64], volumes: &[f64]) -> Vec<PriceBar> {
    assert_eq!(closes.len(), volumes.len());
    let anchor = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| PriceBar {
            instrument_id: "2330".to_string(),
            date: anchor - Duration::days(i as i64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: v,
        })
        .collect()
}

/// 满足全部六个条件的行情：收盘线性走高、近5日爆量
fn passing_bars() -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..60).map(|i| 130.0 - 0.5 * i as f64).collect();
    let volumes: Vec<f64> = (0..60)
        .map(|i| if i < 5 { 20_000_000.0 } else { 5_000_000.0 })
        .collect();
    bars(&closes, &volumes)
}

#[test]
fn test_all_conditions_pass() {
    let strategy = StrongStockStrategy::new(1.0);
    let results = strategy.screen("2330", &passing_bars(), &[]);
    assert_eq!(results.len(), 1);
    let metrics = &results[0].metrics;
    assert!(metrics["ma_10"] > metrics["ma_20"]);
    assert!(metrics["ma_20"] > metrics["ma_60"]);
    assert!(metrics["return_10d"] > 1.0);
    assert!(metrics["volume_ratio"] >= 1.5);
    assert!(metrics["volume_lots"] > 10_000.0);
}

#[test]
fn test_incomplete_sixty_session_history_is_rejected() {
    // 仅59根K线，哪怕近期再强也直接淘汰
    let mut bars = passing_bars();
    bars.truncate(59);
    let strategy = StrongStockStrategy::new(-100.0);
    assert!(strategy.screen("2330", &bars, &[]).is_empty());
}

#[test]
fn test_rejects_when_not_ten_session_high() {
    let mut bars = passing_bars();
    // 把3日前的收盘抬高，让今日不再是近10日最高
    bars[3].close = 200.0;
    bars[3].high = 201.0;
    let strategy = StrongStockStrategy::new(1.0);
    assert!(strategy.screen("2330", &bars, &[]).is_empty());
}

#[test]
fn test_rejects_when_benchmark_outperforms() {
    let strategy = StrongStockStrategy::new(50.0);
    assert!(strategy.screen("2330", &passing_bars(), &[]).is_empty());
}

#[test]
fn test_rejects_low_volume() {
    let closes: Vec<f64> = (0..60).map(|i| 130.0 - 0.5 * i as f64).collect();
    // 量能比达标但绝对量不足1万张
    let volumes: Vec<f64> = (0..60)
        .map(|i| if i < 5 { 8_000_000.0 } else { 2_000_000.0 })
        .collect();
    let strategy = StrongStockStrategy::new(1.0);
    assert!(strategy.screen("2330", &bars(&closes, &volumes), &[]).is_empty());
}

#[test]
fn test_rejects_weak_volume_ratio() {
    let closes: Vec<f64> = (0..60).map(|i| 130.0 - 0.5 * i as f64).collect();
    // 全程均量一致，量能比 1.0 < 1.5
    let volumes = vec![20_000_000.0; 60];
    let strategy = StrongStockStrategy::new(1.0);
    assert!(strategy.screen("2330", &bars(&closes, &volumes), &[]).is_empty());
}
