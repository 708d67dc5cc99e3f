use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type BlockId = u32;

/// One time-boxed activity of a routine. `time` is only ever displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityBlock {
    pub id: BlockId,
    pub label: &'static str,
    pub time: &'static str,
}

const fn block(id: BlockId, label: &'static str, time: &'static str) -> ActivityBlock {
    ActivityBlock { id, label, time }
}

pub const CORE_BLOCKS: [ActivityBlock; 14] = [
    block(1, "Wake & Sunlight", "10:30 AM"),
    block(2, "Freshen up / Shower", "10:50 - 11:20 AM"),
    block(3, "Make & Eat Breakfast", "11:20 - 12:00 PM"),
    block(4, "Meditation", "12:00 - 12:30 PM"),
    block(5, "Transition / Prep", "12:30 - 1:00 PM"),
    block(6, "Work Block 1", "1:00 - 4:00 PM"),
    block(7, "Lunch", "4:00 - 4:30 PM"),
    block(8, "Gym / Movement", "4:30 - 6:30 PM"),
    block(9, "Shower + Snack", "7:00 - 7:30 PM"),
    block(10, "Work Block 2", "7:30 - 9:00 PM"),
    block(11, "Dinner", "9:00 - 9:30 PM"),
    block(12, "Meetings", "9:30 - 10:30 PM"),
    block(13, "Relax / Wind-down", "10:30 - 12:30 AM"),
    block(14, "Sleep", "2:30 - 3:00 AM"),
];

pub const LITE_BLOCKS: [ActivityBlock; 6] = [
    block(1, "Wake & Sunlight", "By 11:30 AM"),
    block(2, "10-min Self-care", "Anytime"),
    block(3, "2 focused hours", "Anytime"),
    block(4, "15-20 min movement", "Anytime"),
    block(5, "Two proper meals", "Anytime"),
    block(6, "20 min no-screen wind-down", "Before bed"),
];

/// Selects which catalog is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Core,
    Lite,
}

impl Mode {
    pub fn catalog(self) -> &'static [ActivityBlock] {
        match self {
            Mode::Core => &CORE_BLOCKS,
            Mode::Lite => &LITE_BLOCKS,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Mode::Core => "Core Routine",
            Mode::Lite => "Lite Routine",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Core => write!(f, "core"),
            Mode::Lite => write!(f, "lite"),
        }
    }
}
