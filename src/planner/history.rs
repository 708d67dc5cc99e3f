use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::percentage::{completion_percentage, Percentage};

use super::entities::DayRecord;

/// Maximum amount of finished days kept in the archive.
pub const MAX_HISTORY_DAYS: usize = 90;

/// Finished days keyed by their date. The map is ordered, so iteration goes from the oldest day
/// to the newest one, the same order ISO date-keys sort in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryArchive {
    records: BTreeMap<NaiveDate, DayRecord>,
}

impl HistoryArchive {
    /// Stores a finished day and evicts the oldest days above [MAX_HISTORY_DAYS].
    pub fn archive(&mut self, date: NaiveDate, record: DayRecord) {
        self.records.insert(date, record);
        self.trim();
    }

    pub fn trim(&mut self) {
        while self.records.len() > MAX_HISTORY_DAYS {
            if let Some((evicted, _)) = self.records.pop_first() {
                debug!("Evicted {evicted} from history");
            }
        }
    }

    pub fn forget(&mut self, date: NaiveDate) -> Option<DayRecord> {
        self.records.remove(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records.get(&date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &DayRecord)> {
        self.records.iter().map(|(date, record)| (*date, record))
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = (NaiveDate, &DayRecord)> {
        self.iter().rev().take(limit)
    }

    /// Counts fully completed days going backwards from `before` (exclusive). The count stops at
    /// the first day that is either missing or not complete.
    pub fn complete_days_before(&self, before: NaiveDate) -> u32 {
        let mut count = 0;
        let mut cursor = before.pred_opt();
        while let Some(date) = cursor {
            match self.records.get(&date) {
                Some(record) if record.is_complete() => count += 1,
                _ => break,
            }
            cursor = date.pred_opt();
        }
        count
    }
}

/// Progress of a single calendar day as shown on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
}

impl DayProgress {
    pub fn percentage(&self) -> Percentage {
        completion_percentage(self.completed, self.total)
    }
}

/// Lazily yields `n` consecutive days ending at `today` in ascending order. Archived days come
/// from `history`, today comes from `today_stats`, and days without a record are reported as
/// `0/fallback_total`.
pub fn last_n_days(
    history: &HistoryArchive,
    today: NaiveDate,
    today_stats: DayRecord,
    fallback_total: u32,
    n: usize,
) -> impl Iterator<Item = DayProgress> + '_ {
    (0..n).rev().filter_map(move |offset| {
        let date = today.checked_sub_days(Days::new(offset as u64))?;
        let record = if date == today {
            today_stats
        } else {
            history
                .get(date)
                .copied()
                .unwrap_or(DayRecord::new(0, fallback_total))
        };
        Some(DayProgress {
            date,
            completed: record.completed,
            total: record.total,
        })
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use crate::planner::entities::DayRecord;

    use super::{last_n_days, HistoryArchive, MAX_HISTORY_DAYS};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn nth_day(n: u64) -> NaiveDate {
        start().checked_add_days(Days::new(n)).unwrap()
    }

    #[test]
    fn test_archive_cap_evicts_oldest() {
        let mut history = HistoryArchive::default();
        for day in 0..(MAX_HISTORY_DAYS as u64 + 10) {
            history.archive(nth_day(day), DayRecord::new(1, 6));
            assert!(history.len() <= MAX_HISTORY_DAYS);
        }

        assert_eq!(history.len(), MAX_HISTORY_DAYS);
        let oldest = history.iter().next().map(|(date, _)| date);
        assert_eq!(oldest, Some(nth_day(10)));
        for day in 0..10 {
            assert_eq!(history.get(nth_day(day)), None);
        }
    }

    #[test]
    fn test_archive_late_insert_of_old_day_is_evicted() {
        let mut history = HistoryArchive::default();
        for day in 1..=(MAX_HISTORY_DAYS as u64) {
            history.archive(nth_day(day), DayRecord::new(1, 6));
        }
        // Older than everything already stored, so it is the one evicted.
        history.archive(nth_day(0), DayRecord::new(6, 6));
        assert_eq!(history.len(), MAX_HISTORY_DAYS);
        assert_eq!(history.get(nth_day(0)), None);
        assert!(history.get(nth_day(1)).is_some());
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut history = HistoryArchive::default();
        for day in 0..5 {
            history.archive(nth_day(day), DayRecord::new(day as u32, 14));
        }
        let recent = history.recent(3).map(|(date, _)| date).collect::<Vec<_>>();
        assert_eq!(recent, vec![nth_day(4), nth_day(3), nth_day(2)]);
    }

    #[test]
    fn test_complete_days_before_stops_at_gap() {
        let mut history = HistoryArchive::default();
        history.archive(nth_day(0), DayRecord::new(6, 6));
        history.archive(nth_day(2), DayRecord::new(6, 6));
        history.archive(nth_day(3), DayRecord::new(14, 14));
        history.archive(nth_day(4), DayRecord::new(13, 14));

        assert_eq!(history.complete_days_before(nth_day(4)), 2);
        assert_eq!(history.complete_days_before(nth_day(5)), 0);
        assert_eq!(history.complete_days_before(nth_day(1)), 1);
    }

    #[test]
    fn test_last_n_days_shape() {
        let mut history = HistoryArchive::default();
        history.archive(nth_day(8), DayRecord::new(4, 6));
        let today = nth_day(10);

        for n in [0, 1, 3, 7, 30] {
            let days = last_n_days(&history, today, DayRecord::new(2, 14), 14, n)
                .collect::<Vec<_>>();
            assert_eq!(days.len(), n);
            assert!(days.windows(2).all(|w| w[0].date < w[1].date));
            if let Some(last) = days.last() {
                assert_eq!(last.date, today);
            }
        }
    }

    #[test]
    fn test_last_n_days_sources() {
        let mut history = HistoryArchive::default();
        history.archive(nth_day(8), DayRecord::new(4, 6));
        let today = nth_day(10);

        let days =
            last_n_days(&history, today, DayRecord::new(2, 14), 14, 3).collect::<Vec<_>>();

        assert_eq!((days[0].completed, days[0].total), (4, 6));
        assert_eq!((days[1].completed, days[1].total), (0, 14));
        assert_eq!((days[2].completed, days[2].total), (2, 14));
        assert_eq!(*days[0].percentage(), 67.);
    }

    #[test]
    fn test_archive_serializes_as_date_keyed_object() {
        let mut history = HistoryArchive::default();
        history.archive(nth_day(1), DayRecord::new(1, 2));
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "2025-01-02": { "completed": 1, "total": 2 } })
        );
    }
}
