pub mod prediction_service;
pub mod screening_service;

pub use prediction_service::{predict_disposal, DisposalPrediction};
pub use screening_service::{run_screening, ScreeningOutcome, StrategyResultSet};
