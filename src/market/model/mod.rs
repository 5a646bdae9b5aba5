pub mod attention;
pub mod bar;
pub mod flow;
pub mod instrument;

pub use attention::{AttentionAnalysis, AttentionObservation, ObservationTable};
pub use bar::{PriceBar, PriceTable};
pub use flow::{FlowTable, InstitutionalFlow, InvestorClass};
pub use instrument::{InstrumentCatalog, InstrumentInfo, UNKNOWN_NAME};
