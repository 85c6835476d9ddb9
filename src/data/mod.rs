//! Data models and processing: dwell parsing, status classification,
//! bounded history, and alert deduplication.

pub mod alert;
pub mod dwell;
pub mod history;
pub mod report;
pub mod status;

pub use alert::{AlertDeduplicator, DEFAULT_COOLDOWN_SECS};
pub use dwell::parse_dwell;
pub use history::{HistoryLog, HistoryRecord, DEFAULT_CAP, DEFAULT_EVICT_BATCH};
pub use report::UnitRow;
pub use status::{classify, Limits, UnitStatus};
