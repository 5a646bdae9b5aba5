use chrono::NaiveDate;
use tw_quant::market::analysis::analyze_attention_history;
use tw_quant::market::model::AttentionObservation;

fn obs(date_roc: &str) -> AttentionObservation {
    AttentionObservation {
        instrument_id: "3057".to_string(),
        display_name: "喬鼎".to_string(),
        date_roc: date_roc.to_string(),
        cumulative_count: 1,
    }
}

fn today() -> NaiveDate {
    // 民国114年 = 西元2025年
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

#[test]
fn test_consecutive_is_most_recent_suffix() {
    // 最新三日相邻，第四笔与其间隔 6 日：连续数为最近未中断的一段，
    // 是 3 不是 4
    let observations = vec![
        obs("114.06.21"),
        obs("114.06.27"),
        obs("114.06.28"),
        obs("114.06.29"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 3);
    assert_eq!(analysis.total_days, 4);
}

#[test]
fn test_run_is_suffix_not_longest_in_history() {
    // 历史上有过更长的一段，但最近一笔是孤立的：只算最近一段
    let observations = vec![
        obs("114.06.16"),
        obs("114.06.17"),
        obs("114.06.18"),
        obs("114.06.19"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 1);
}

#[test]
fn test_consecutive_run_with_weekend_gap() {
    // 周五 6/27 -> 周一 6/30 间隔 3 日视为连续
    let observations = vec![
        obs("114.06.25"),
        obs("114.06.26"),
        obs("114.06.27"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 4);
    assert!(analysis.will_escalate);
    assert_eq!(
        analysis.reason.as_deref(),
        Some("連續4日注意股（已達連續3日標準）")
    );
}

#[test]
fn test_five_day_rule_takes_priority_over_three_day_rule() {
    let observations = vec![
        obs("114.06.24"),
        obs("114.06.25"),
        obs("114.06.26"),
        obs("114.06.27"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 5);
    assert_eq!(
        analysis.reason.as_deref(),
        Some("連續5日注意股（已達連續5日標準）")
    );
}

#[test]
fn test_six_of_ten_rule() {
    // 两两相邻、组间间隔4日断开：连续数 2，近10日 6 笔
    let observations = vec![
        obs("114.06.20"),
        obs("114.06.21"),
        obs("114.06.24"),
        obs("114.06.25"),
        obs("114.06.29"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 2);
    assert_eq!(analysis.days_in_10, 6);
    assert!(analysis.will_escalate);
    assert_eq!(
        analysis.reason.as_deref(),
        Some("近10日內6日注意股（已達6日標準）")
    );
}

#[test]
fn test_twelve_of_thirty_rule() {
    // 六组相邻两日、组间间隔断开：近30日12笔、近10日不足6笔
    let observations = vec![
        obs("114.06.04"),
        obs("114.06.05"),
        obs("114.06.09"),
        obs("114.06.10"),
        obs("114.06.14"),
        obs("114.06.15"),
        obs("114.06.19"),
        obs("114.06.20"),
        obs("114.06.24"),
        obs("114.06.25"),
        obs("114.06.29"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.consecutive_days, 2);
    assert!(analysis.days_in_10 < 6);
    assert_eq!(analysis.days_in_30, 12);
    assert_eq!(
        analysis.reason.as_deref(),
        Some("近30日內12日注意股（已達12日標準）")
    );
}

#[test]
fn test_window_count_invariant() {
    let observations = vec![
        obs("114.05.10"),
        obs("114.06.10"),
        obs("114.06.25"),
        obs("114.06.30"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert!(analysis.days_in_10 <= analysis.days_in_30);
    assert!(analysis.days_in_30 <= analysis.total_days);
    // 有记录时连续天数至少为 1
    assert!(analysis.consecutive_days >= 1);
}

#[test]
fn test_malformed_dates_are_dropped_not_fatal() {
    let observations = vec![
        obs("垃圾日期"),
        obs("2025-06-30"),
        obs("114.06.30"),
        obs("114.06.29"),
    ];
    let analysis = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(analysis.total_days, 2);
    assert_eq!(analysis.consecutive_days, 2);
}

#[test]
fn test_no_observations() {
    let analysis = analyze_attention_history("3057", "喬鼎", &[], today());
    assert_eq!(analysis.total_days, 0);
    assert_eq!(analysis.consecutive_days, 0);
    assert!(!analysis.will_escalate);
    assert_eq!(analysis.reason, None);
}

#[test]
fn test_analyzer_is_idempotent() {
    let observations = vec![obs("114.06.28"), obs("114.06.29"), obs("114.06.30")];
    let first = analyze_attention_history("3057", "喬鼎", &observations, today());
    let second = analyze_attention_history("3057", "喬鼎", &observations, today());
    assert_eq!(first, second);
}
