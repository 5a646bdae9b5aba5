use chrono::NaiveDate;
use tracing::warn;

use crate::market::model::{AttentionAnalysis, AttentionObservation};
use crate::time_util;

/// 连续天数容忍的最大自然日间隔：跨周末视为连续，更长的假期同样会被桥接
const MAX_RUN_GAP_DAYS: i64 = 3;

/// 处置升级规则，按序求值、首个命中生效
struct EscalationRule {
    check: fn(&AttentionAnalysis) -> bool,
    reason: fn(&AttentionAnalysis) -> String,
}

static ESCALATION_RULES: [EscalationRule; 4] = [
    EscalationRule {
        check: |a| a.consecutive_days >= 5,
        reason: |a| format!("連續{}日注意股（已達連續5日標準）", a.consecutive_days),
    },
    EscalationRule {
        check: |a| a.consecutive_days >= 3,
        reason: |a| format!("連續{}日注意股（已達連續3日標準）", a.consecutive_days),
    },
    EscalationRule {
        check: |a| a.days_in_10 >= 6,
        reason: |a| format!("近10日內{}日注意股（已達6日標準）", a.days_in_10),
    },
    EscalationRule {
        check: |a| a.days_in_30 >= 12,
        reason: |a| format!("近30日內{}日注意股（已達12日標準）", a.days_in_30),
    },
];

/// 分析一支股票的注意股历史
///
/// 公告日期为民国年格式，解析失败的记录丢弃并记录异常，不中断整批。
/// `today` 为外部传入的分析基准日，内部不取系统时间。
pub fn analyze_attention_history(
    instrument_id: &str,
    display_name: &str,
    observations: &[AttentionObservation],
    today: NaiveDate,
) -> AttentionAnalysis {
    let mut dates: Vec<NaiveDate> = Vec::with_capacity(observations.len());
    for obs in observations {
        match time_util::roc_to_date(&obs.date_roc) {
            Some(date) => dates.push(date),
            None => {
                warn!(
                    "注意股公告日期解析失败，丢弃该笔记录: {} {}",
                    obs.instrument_id, obs.date_roc
                );
            }
        }
    }
    // 最新在前
    dates.sort_by(|a, b| b.cmp(a));
    dates.dedup();

    let total_days = dates.len();
    let consecutive_days = count_consecutive_days(&dates);
    let days_in_10 = dates
        .iter()
        .filter(|d| today.signed_duration_since(**d).num_days() <= 10)
        .count();
    let days_in_30 = dates
        .iter()
        .filter(|d| today.signed_duration_since(**d).num_days() <= 30)
        .count();

    let mut analysis = AttentionAnalysis {
        instrument_id: instrument_id.to_string(),
        display_name: display_name.to_string(),
        total_days,
        consecutive_days,
        days_in_10,
        days_in_30,
        will_escalate: false,
        reason: None,
    };

    for rule in ESCALATION_RULES.iter() {
        if (rule.check)(&analysis) {
            analysis.will_escalate = true;
            analysis.reason = Some((rule.reason)(&analysis));
            break;
        }
    }
    analysis
}

/// 计算最近一段未中断的连续天数
///
/// dates 按日期降序。从最新日期往回走，相邻间隔 ≤3 自然日视为连续，
/// 首个更大的间隔即终止——结果是按新近度的最长后缀，不是历史最长段。
fn count_consecutive_days(dates: &[NaiveDate]) -> usize {
    if dates.is_empty() {
        return 0;
    }
    let mut consecutive = 1;
    for pair in dates.windows(2) {
        let gap = pair[0].signed_duration_since(pair[1]).num_days();
        if gap <= MAX_RUN_GAP_DAYS {
            consecutive += 1;
        } else {
            break;
        }
    }
    consecutive
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_run_stops_at_first_large_gap() {
        // [6/1, 6/2, 6/3, 6/9]：6/9 -> 6/3 间隔 6 日，连续段为最新的一段
        // 注意：最新的是 6/9，6/9 与 6/3 间隔 >3，连续天数应为 1
        let dates = vec![date(2025, 6, 9), date(2025, 6, 3), date(2025, 6, 2), date(2025, 6, 1)];
        assert_eq!(count_consecutive_days(&dates), 1);
    }

    #[test]
    fn test_run_bridges_weekend() {
        // 周五 -> 下周一间隔 3 日，视为连续
        let dates = vec![date(2025, 6, 9), date(2025, 6, 6), date(2025, 6, 5)];
        assert_eq!(count_consecutive_days(&dates), 3);
    }

    #[test]
    fn test_empty_dates() {
        assert_eq!(count_consecutive_days(&[]), 0);
    }
}
