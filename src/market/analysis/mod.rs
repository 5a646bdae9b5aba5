pub mod attention_analyzer;
pub mod category_rank;
pub mod risk;
pub mod threshold;

pub use attention_analyzer::analyze_attention_history;
pub use category_rank::{rank_categories, CategoryRank};
pub use risk::{classify_risk, RiskLevel};
pub use threshold::{calculate_thresholds, ThresholdSet};
