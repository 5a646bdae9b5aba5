use chrono::{Duration, NaiveDate};
use tw_quant::market::analysis::rank_categories;
use tw_quant::market::model::{
    FlowTable, InstitutionalFlow, InstrumentCatalog, InstrumentInfo, InvestorClass, PriceBar,
    PriceTable,
};

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn bars(id: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar {
            instrument_id: id.to_string(),
            date: anchor() - Duration::days(i as i64),
            open: c,
            high: c,
            low: c,
            close: c,
            volume: 1_000_000.0,
        })
        .collect()
}

fn catalog() -> InstrumentCatalog {
    InstrumentCatalog::from_infos(vec![
        InstrumentInfo {
            instrument_id: "2330".to_string(),
            display_name: "台積電".to_string(),
            categories: vec!["半導體".to_string(), "AI".to_string()],
        },
        InstrumentInfo {
            instrument_id: "2454".to_string(),
            display_name: "聯發科".to_string(),
            categories: vec!["半導體".to_string()],
        },
        InstrumentInfo {
            instrument_id: "2603".to_string(),
            display_name: "長榮".to_string(),
            categories: vec!["航運".to_string()],
        },
    ])
}

fn prices() -> PriceTable {
    let mut rows = bars("2330", &[110.0, 100.0]);
    rows.extend(bars("2454", &[95.0, 100.0]));
    rows.extend(bars("2603", &[105.0, 100.0]));
    PriceTable::from_bars(rows)
}

#[test]
fn test_category_stats_and_ranking() {
    let ranks = rank_categories(anchor(), &catalog(), &prices(), &FlowTable::new());
    // 航運 100% 上涨、AI 100%、半導體 50%；比例相同按首次出现顺序
    assert_eq!(ranks.len(), 3);
    assert_eq!(ranks[0].category, "AI");
    assert_eq!(ranks[0].rank, 1);
    assert_eq!(ranks[1].category, "航運");
    assert_eq!(ranks[2].category, "半導體");
    assert_eq!(ranks[2].up_count, 1);
    assert_eq!(ranks[2].member_count, 2);
    // 半導體平均涨幅 (10% + -5%) / 2
    assert!((ranks[2].avg_return - 2.5).abs() < 1e-9);
}

#[test]
fn test_flow_notional_joins_contemporaneous_close() {
    let flows = FlowTable::from_flows(vec![
        // 锚定日外资买超 1000 张，收盘 110：金额 1.1 亿
        InstitutionalFlow {
            instrument_id: "2330".to_string(),
            date: anchor(),
            investor_class: InvestorClass::Foreign,
            buy_qty: 1_000_000.0,
            sell_qty: 0.0,
        },
        // 前一日投信买超 500 张，收盘 100：金额 5 千万
        InstitutionalFlow {
            instrument_id: "2330".to_string(),
            date: anchor() - Duration::days(1),
            investor_class: InvestorClass::InvestmentTrust,
            buy_qty: 500_000.0,
            sell_qty: 0.0,
        },
        // 自营商不计入
        InstitutionalFlow {
            instrument_id: "2330".to_string(),
            date: anchor(),
            investor_class: InvestorClass::Dealer,
            buy_qty: 9_000_000.0,
            sell_qty: 0.0,
        },
    ]);
    let ranks = rank_categories(anchor(), &catalog(), &prices(), &flows);
    let ai = ranks.iter().find(|r| r.category == "AI").unwrap();
    assert!((ai.flow_1d - 110_000_000.0).abs() < 1e-6);
    assert!((ai.flow_3d - 160_000_000.0).abs() < 1e-6);
}

#[test]
fn test_member_without_anchor_bar_is_skipped() {
    let mut rows = bars("2330", &[110.0, 100.0]);
    // 2454 缺少锚定日K线
    rows.extend(bars("2454", &[95.0, 100.0]).into_iter().map(|mut b| {
        b.date = b.date - Duration::days(5);
        b
    }));
    let prices = PriceTable::from_bars(rows);
    let ranks = rank_categories(anchor(), &catalog(), &prices, &FlowTable::new());
    let semi = ranks.iter().find(|r| r.category == "半導體").unwrap();
    assert_eq!(semi.member_count, 1);
}
