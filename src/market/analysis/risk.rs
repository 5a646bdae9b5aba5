use serde::Serialize;

use crate::market::model::AttentionAnalysis;

/// 处置风险等级，顺序即排序权重
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "低",
            RiskLevel::Medium => "中",
            RiskLevel::High => "高",
            RiskLevel::Critical => "極高",
        }
    }
}

/// 风险分级规则，按序求值、首个命中生效
struct RiskRule {
    check: fn(&AttentionAnalysis) -> bool,
    level: RiskLevel,
}

static RISK_RULES: [RiskRule; 5] = [
    RiskRule {
        check: |a| a.consecutive_days >= 5,
        level: RiskLevel::Critical,
    },
    RiskRule {
        check: |a| a.consecutive_days >= 3,
        level: RiskLevel::High,
    },
    RiskRule {
        check: |a| a.days_in_10 >= 6,
        level: RiskLevel::High,
    },
    RiskRule {
        check: |a| a.days_in_30 >= 12,
        level: RiskLevel::Medium,
    },
    RiskRule {
        check: |a| a.consecutive_days >= 2,
        level: RiskLevel::Medium,
    },
];

/// 风险分级：对任意分析结果总能给出等级，不会失败
pub fn classify_risk(analysis: &AttentionAnalysis) -> RiskLevel {
    RISK_RULES
        .iter()
        .find(|rule| (rule.check)(analysis))
        .map(|rule| rule.level)
        .unwrap_or(RiskLevel::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(consecutive: usize, d10: usize, d30: usize) -> AttentionAnalysis {
        AttentionAnalysis {
            instrument_id: "3057".to_string(),
            display_name: "喬鼎".to_string(),
            total_days: d30,
            consecutive_days: consecutive,
            days_in_10: d10,
            days_in_30: d30,
            will_escalate: false,
            reason: None,
        }
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(classify_risk(&analysis(5, 0, 0)), RiskLevel::Critical);
        assert_eq!(classify_risk(&analysis(3, 0, 0)), RiskLevel::High);
        assert_eq!(classify_risk(&analysis(1, 6, 6)), RiskLevel::High);
        assert_eq!(classify_risk(&analysis(1, 0, 12)), RiskLevel::Medium);
        assert_eq!(classify_risk(&analysis(2, 0, 0)), RiskLevel::Medium);
        assert_eq!(classify_risk(&analysis(1, 1, 1)), RiskLevel::Low);
    }

    #[test]
    fn test_ordinal_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }
}
