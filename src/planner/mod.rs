//! The daily progress store and everything around it.
//!  - [catalog] holds the two fixed routines.
//!  - [store::PlannerStore] owns today's checks, the archive of finished days and the rollover
//!    between them.
//!  - [payload_storage] decides where the single JSON payload lives.
//!  - [ticker::RolloverTicker] notices new days while the process keeps running.

pub mod catalog;
pub mod entities;
pub mod history;
pub mod payload_storage;
pub mod shutdown;
pub mod store;
pub mod ticker;
