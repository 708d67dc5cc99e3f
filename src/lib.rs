//! Personal routine tracker: a checklist of time-boxed daily activities, a rolling 90 day
//! history with a 7-day chart, streaks and an editable quote, all persisted as one local JSON
//! payload.
//!

pub mod cli;
pub mod fs;
pub mod planner;
pub mod utils;
