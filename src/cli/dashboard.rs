use std::{fmt::Write, io::IsTerminal};

use ansi_term::Colour;
use clap::ValueEnum;

use crate::{
    planner::{history::DayProgress, payload_storage::PayloadStorage, store::PlannerStore},
    utils::time::{date_key, short_date_key},
};

/// Width of a full bar in the progress chart.
const BAR_WIDTH: usize = 20;
pub const CHART_DAYS: usize = 7;
pub const LOG_ENTRIES: usize = 7;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Decides whether the output gets ANSI colors.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    ansi: bool,
}

impl Painter {
    pub fn new(choice: ColorChoice) -> Self {
        let ansi = match choice {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Self { ansi }
    }

    pub fn plain() -> Self {
        Self { ansi: false }
    }

    pub fn is_ansi(&self) -> bool {
        self.ansi
    }

    fn done(&self, text: &str) -> String {
        if self.ansi {
            Colour::Green.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.ansi {
            Colour::Fixed(245).paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn bar(&self, filled: usize) -> String {
        let filled = filled.min(BAR_WIDTH);
        let full = "█".repeat(filled);
        let empty = "░".repeat(BAR_WIDTH - filled);
        if self.ansi {
            format!("{}{}", Colour::Green.paint(full), self.dim(&empty))
        } else {
            format!("{full}{empty}")
        }
    }
}

pub fn render_header<S: PayloadStorage>(store: &PlannerStore<S>) -> String {
    let settings = store.settings();
    format!(
        "Hi {}\n{}\nToday: {}\n",
        settings.greeting_name,
        settings.quote,
        date_key(store.today())
    )
}

pub fn render_checklist<S: PayloadStorage>(store: &PlannerStore<S>, painter: &Painter) -> String {
    let stats = store.today_stats();
    let mut out = format!(
        "{}\nProgress: {}/{}\n",
        store.mode().title(),
        stats.completed,
        stats.total
    );
    for block in store.catalog() {
        let line = if store.is_done(block.id) {
            painter.done(&format!("[x] {:>2}. {} ({})  Done", block.id, block.label, block.time))
        } else {
            format!("[ ] {:>2}. {} ({})", block.id, block.label, block.time)
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

pub fn render_chart(days: impl IntoIterator<Item = DayProgress>, painter: &Painter) -> String {
    let mut out = String::new();
    for day in days {
        let filled = (*day.percentage() as usize * BAR_WIDTH) / 100;
        let _ = writeln!(
            out,
            "{} {} {:>3}/{}",
            short_date_key(day.date),
            painter.bar(filled),
            day.completed,
            day.total
        );
    }
    out
}

/// Archived days newest first, followed by today's live progress.
pub fn render_log<S: PayloadStorage>(
    store: &PlannerStore<S>,
    limit: usize,
    painter: &Painter,
) -> String {
    let mut out = String::new();
    for (date, record) in store.recent_log(limit) {
        let _ = writeln!(out, "{}  {}/{}", date_key(date), record.completed, record.total);
    }
    let stats = store.today_stats();
    let _ = writeln!(
        out,
        "{}  {}/{} {}",
        date_key(store.today()),
        stats.completed,
        stats.total,
        painter.dim("(today)")
    );
    out
}

pub fn render_streak<S: PayloadStorage>(store: &PlannerStore<S>) -> String {
    match store.current_streak() {
        0 => "No streak yet\n".to_string(),
        1 => "Streak: 1 day\n".to_string(),
        n => format!("Streak: {n} days\n"),
    }
}

pub fn render_dashboard<S: PayloadStorage>(store: &PlannerStore<S>, painter: &Painter) -> String {
    format!(
        "{}\n{}\n{}-day progress\n{}\nRecent log\n{}\n{}",
        render_header(store),
        render_checklist(store, painter),
        CHART_DAYS,
        render_chart(store.last_n_days(CHART_DAYS), painter),
        render_log(store, LOG_ENTRIES, painter),
        render_streak(store),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::NaiveDate;

    use crate::{
        planner::{
            catalog::Mode, history::DayProgress, payload_storage::MemoryPayloadStorage,
            store::PlannerStore,
        },
        utils::clock::testing::ManualClock,
    };

    use super::{render_chart, render_checklist, render_dashboard, render_log, Painter};

    fn oct(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    fn store_at(day: u32) -> Result<PlannerStore<MemoryPayloadStorage>> {
        PlannerStore::init(
            MemoryPayloadStorage::new(),
            Arc::new(ManualClock::new(oct(day))),
        )
    }

    #[test]
    fn test_checklist_marks_done_blocks() -> Result<()> {
        let mut store = store_at(27)?;
        store.set_mode(Mode::Lite)?;
        store.toggle(2)?;

        let text = render_checklist(&store, &Painter::plain());
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Lite Routine");
        assert_eq!(lines[1], "Progress: 1/6");
        assert_eq!(lines[2], "[ ]  1. Wake & Sunlight (By 11:30 AM)");
        assert_eq!(lines[3], "[x]  2. 10-min Self-care (Anytime)  Done");
        assert_eq!(lines.len(), 8);
        Ok(())
    }

    #[test]
    fn test_chart_bar_lengths() {
        let days = [
            DayProgress {
                date: oct(26),
                completed: 7,
                total: 14,
            },
            DayProgress {
                date: oct(27),
                completed: 0,
                total: 0,
            },
        ];
        let text = render_chart(days, &Painter::plain());
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            format!("10-26 {}{}   7/14", "█".repeat(10), "░".repeat(10))
        );
        assert_eq!(lines[1], format!("10-27 {}   0/0", "░".repeat(20)));
    }

    #[test]
    fn test_log_ends_with_today() -> Result<()> {
        let mut store = store_at(26)?;
        store.toggle(1)?;
        store.check_rollover_at(oct(27))?;

        let text = render_log(&store, 7, &Painter::plain());
        assert_eq!(text, "2025-10-26  1/14\n2025-10-27  0/14 (today)\n");
        Ok(())
    }

    #[test]
    fn test_dashboard_contains_sections() -> Result<()> {
        let store = store_at(27)?;
        let text = render_dashboard(&store, &Painter::plain());
        assert!(text.starts_with("Hi Shubhangi\nProgress beats perfection.\nToday: 2025-10-27\n"));
        assert!(text.contains("7-day progress"));
        assert!(text.contains("Recent log"));
        assert!(text.ends_with("No streak yet\n"));
        Ok(())
    }
}
