use chrono::{Duration, NaiveDate};
use tw_quant::market::model::{InstitutionalFlow, InvestorClass, PriceBar};
use tw_quant::market::strategy::{Screener, TrustAccumulationStrategy};

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn flows(nets: &[f64]) -> Vec<InstitutionalFlow> {
    // nets[0] 为最新一日净买超（股）
    nets.iter()
        .enumerate()
        .map(|(i, &net)| InstitutionalFlow {
            instrument_id: "3231".to_string(),
            date: anchor() - Duration::days(i as i64),
            investor_class: InvestorClass::InvestmentTrust,
            buy_qty: if net >= 0.0 { net } else { 0.0 },
            sell_qty: if net < 0.0 { -net } else { 0.0 },
        })
        .collect()
}

fn bars(high: f64, low: f64, close: f64) -> Vec<PriceBar> {
    (0..5)
        .map(|i| PriceBar {
            instrument_id: "3231".to_string(),
            date: anchor() - Duration::days(i as i64),
            open: close,
            high,
            low,
            close,
            volume: 3_000_000.0,
        })
        .collect()
}

#[test]
fn test_accumulation_pass() {
    // 5日全数买超、日均600张、5日振幅5%、股价102元
    let flows = flows(&[600_000.0, 600_000.0, 600_000.0, 600_000.0, 600_000.0]);
    let strategy = TrustAccumulationStrategy::default();
    let results = strategy.screen("3231", &bars(105.0, 100.0, 102.0), &flows);
    assert_eq!(results.len(), 1);
    let metrics = &results[0].metrics;
    assert_eq!(metrics["buy_days"], 5.0);
    assert_eq!(metrics["avg_net_lots"], 600.0);
    assert_eq!(metrics["total_net_lots"], 3000.0);
}

#[test]
fn test_needs_four_buy_days() {
    // 仅3日买超
    let flows = flows(&[900_000.0, 900_000.0, 900_000.0, -100_000.0, -100_000.0]);
    let strategy = TrustAccumulationStrategy::default();
    assert!(strategy
        .screen("3231", &bars(105.0, 100.0, 102.0), &flows)
        .is_empty());
}

#[test]
fn test_needs_min_average_lots() {
    // 日均 400 张 < 500
    let flows = flows(&[400_000.0, 400_000.0, 400_000.0, 400_000.0, 400_000.0]);
    let strategy = TrustAccumulationStrategy::default();
    assert!(strategy
        .screen("3231", &bars(105.0, 100.0, 102.0), &flows)
        .is_empty());
}

#[test]
fn test_rejects_wide_amplitude() {
    // 5日振幅 (120-100)/100 = 20% > 14%
    let flows = flows(&[600_000.0, 600_000.0, 600_000.0, 600_000.0, 600_000.0]);
    let strategy = TrustAccumulationStrategy::default();
    assert!(strategy
        .screen("3231", &bars(120.0, 100.0, 110.0), &flows)
        .is_empty());
}

#[test]
fn test_rejects_price_above_ceiling() {
    let flows = flows(&[600_000.0, 600_000.0, 600_000.0, 600_000.0, 600_000.0]);
    let strategy = TrustAccumulationStrategy::default();
    assert!(strategy
        .screen("3231", &bars(1100.0, 1000.0, 1050.0), &flows)
        .is_empty());
}

#[test]
fn test_no_flows_is_skip() {
    let strategy = TrustAccumulationStrategy::default();
    assert!(strategy
        .screen("3231", &bars(105.0, 100.0, 102.0), &[])
        .is_empty());
}
