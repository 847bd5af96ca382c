//! Dataset records: objectives, key results, their series and notes.

pub mod key_result;
pub mod objective;
pub mod status;

pub use key_result::{KeyResult, Note, SeriesPoint};
pub use objective::Objective;
pub use status::{ParseStatusError, Status, StatusTone};
