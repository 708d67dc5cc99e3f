use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::utils::clock::Clock;

use super::{
    catalog::{ActivityBlock, BlockId, Mode},
    entities::{CompletionMap, DayRecord, PlannerPayload, Settings, TodayEntity},
    history::{last_n_days, DayProgress, HistoryArchive},
    payload_storage::PayloadStorage,
};

/// Owns today's checklist, the archive of finished days and the rollover that moves one into
/// the other. Every mutation is followed by a full payload save through [PayloadStorage].
///
/// Mutators always apply their in-memory change. The returned error only ever reports that the
/// backend failed to persist it.
pub struct PlannerStore<S: PayloadStorage> {
    storage: S,
    clock: Arc<dyn Clock>,
    settings: Settings,
    completion: CompletionMap,
    history: HistoryArchive,
    /// Last known date-key. Whatever is in `completion` belongs to this day.
    current_date: NaiveDate,
    /// Set while the in-memory state differs from the stored payload because a save failed.
    unsaved: bool,
    shutdown: CancellationToken,
}

impl<S: PayloadStorage> PlannerStore<S> {
    /// Loads the persisted payload (or defaults when it is missing or unreadable), runs an eager
    /// rollover check for days that passed while nothing was running and saves the result.
    ///
    /// Storage problems never fail initialization. A failed save is logged and retried by the
    /// next mutation or [PlannerStore::refresh].
    pub fn init(storage: S, clock: Arc<dyn Clock>) -> Result<Self> {
        let payload = match storage.load() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                info!("No stored planner state, starting fresh");
                PlannerPayload::default()
            }
            Err(e) => {
                warn!("Persisted planner state is unreadable, falling back to defaults: {e:?}");
                PlannerPayload::default()
            }
        };

        let today = clock.today();
        let mut store = Self {
            storage,
            clock,
            settings: Settings::default(),
            completion: CompletionMap::new(),
            history: HistoryArchive::default(),
            current_date: today,
            unsaved: false,
            shutdown: CancellationToken::new(),
        };
        store.apply_payload(payload);
        store.roll_over_if_needed(today);
        if let Err(e) = store.persist() {
            warn!("Failed to save initial planner state, continuing in memory: {e:?}");
        }
        Ok(store)
    }

    /// Cancels the periodic rollover check and writes the final state.
    pub fn teardown(mut self) -> Result<()> {
        self.shutdown.cancel();
        self.persist()
    }

    /// Token that is cancelled on [PlannerStore::teardown]. Periodic tasks bound to the store
    /// should stop once it fires.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Picks up changes written by another process and then checks for a new day. The stored
    /// payload wins over in-memory state, except while a previous save is still outstanding:
    /// then the in-memory state is kept and saved again. When the stored payload can't be read
    /// the in-memory state is kept as is.
    pub fn refresh(&mut self) -> Result<bool> {
        if self.unsaved {
            warn!("Planner state has unsaved changes, retrying the save instead of reloading");
            self.persist()?;
            return self.check_rollover();
        }
        match self.storage.load() {
            Ok(Some(payload)) => self.apply_payload(payload),
            Ok(None) => debug!("Nothing stored yet, keeping in-memory state"),
            Err(e) => warn!("Failed to refresh planner state, keeping in-memory state: {e:?}"),
        }
        self.check_rollover()
    }

    fn apply_payload(&mut self, payload: PlannerPayload) {
        self.settings = payload.settings();
        self.history = payload.history;
        self.history.trim();
        match payload.today {
            Some(TodayEntity { date, done_map }) => {
                self.current_date = date;
                self.completion = done_map;
            }
            None => {
                self.current_date = self.clock.today();
                self.completion.clear();
            }
        }
        self.history.forget(self.current_date);
    }

    fn payload(&self) -> PlannerPayload {
        PlannerPayload::new(
            self.settings.clone(),
            self.history.clone(),
            Some(TodayEntity {
                date: self.current_date,
                done_map: self.completion.clone(),
            }),
        )
    }

    fn persist(&mut self) -> Result<()> {
        let result = self.storage.save(&self.payload());
        self.unsaved = result.is_err();
        result
    }

    /// Whether the last save failed and the stored payload is behind the in-memory state.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    pub fn catalog(&self) -> &'static [ActivityBlock] {
        self.settings.mode.catalog()
    }

    pub fn completion(&self) -> &CompletionMap {
        &self.completion
    }

    pub fn history(&self) -> &HistoryArchive {
        &self.history
    }

    /// The date today's checklist belongs to.
    pub fn today(&self) -> NaiveDate {
        self.current_date
    }

    pub fn is_done(&self, id: BlockId) -> bool {
        self.completion.get(&id).copied().unwrap_or(false)
    }

    /// Flips the checked state of `id`. Ids outside the active catalog are stored as well and
    /// simply never rendered.
    pub fn toggle(&mut self, id: BlockId) -> Result<()> {
        if self.is_done(id) {
            self.completion.remove(&id);
        } else {
            self.completion.insert(id, true);
        }
        debug!("Toggled block {id}, done: {}", self.is_done(id));
        self.persist()
    }

    /// Switches the active catalog. Today's checks are kept, so ids checked under the previous
    /// catalog keep counting towards [PlannerStore::today_stats].
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if self.settings.mode != mode {
            info!("Switching mode from {} to {mode}", self.settings.mode);
        }
        self.settings.mode = mode;
        self.persist()
    }

    pub fn set_quote(&mut self, quote: impl Into<String>) -> Result<()> {
        self.settings.quote = quote.into();
        self.persist()
    }

    pub fn set_greeting_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.settings.greeting_name = name.into();
        self.persist()
    }

    /// Unchecks everything for today without touching the archive.
    pub fn reset_today_checks(&mut self) -> Result<()> {
        self.completion.clear();
        self.persist()
    }

    /// Erases the stored payload and resets settings, today's checks and the archive. Does
    /// nothing unless `confirmed` is set. Returns whether anything was cleared.
    ///
    /// The in-memory reset happens even when the backend fails, the first backend error is
    /// returned.
    pub fn clear_all(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            debug!("Clearing all data was not confirmed");
            return Ok(false);
        }
        self.settings = Settings::default();
        self.completion.clear();
        self.history = HistoryArchive::default();
        self.current_date = self.clock.today();
        info!("Cleared all planner data");

        let cleared = self.storage.clear();
        let saved = self.persist();
        cleared.and(saved)?;
        Ok(true)
    }

    /// `completed` counts every checked id, including ids left over from another catalog.
    pub fn today_stats(&self) -> DayRecord {
        let completed = self.completion.values().filter(|done| **done).count() as u32;
        DayRecord::new(completed, self.catalog().len() as u32)
    }

    /// Runs the day-boundary check against the injected clock.
    pub fn check_rollover(&mut self) -> Result<bool> {
        let today = self.clock.today();
        self.check_rollover_at(today)
    }

    /// Archives the outgoing day and starts an empty one when `today` differs from the last
    /// known date. Calling it again for the same date changes nothing. Returns whether a
    /// rollover happened.
    pub fn check_rollover_at(&mut self, today: NaiveDate) -> Result<bool> {
        if !self.roll_over_if_needed(today) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn roll_over_if_needed(&mut self, today: NaiveDate) -> bool {
        if self.current_date == today {
            return false;
        }
        let outgoing = self.current_date;
        let record = self.today_stats();
        info!(
            "Day changed from {outgoing} to {today}, archiving {}/{}",
            record.completed, record.total
        );
        if today < outgoing {
            warn!("Local date moved backwards from {outgoing} to {today}");
        }
        self.history.archive(outgoing, record);
        // A date that moved backwards may already have a record; the archive never holds the
        // day currently being filled in.
        self.history.forget(today);
        self.completion.clear();
        self.current_date = today;
        true
    }

    /// Progress for the `n` calendar days ending at [PlannerStore::today], oldest first.
    ///
    /// "Today" is the last known date, not the clock's date. Right after midnight the sequence
    /// still ends at yesterday until [PlannerStore::check_rollover] runs, so callers outside the
    /// ticker should check for a rollover before reading it.
    pub fn last_n_days(&self, n: usize) -> impl Iterator<Item = DayProgress> + '_ {
        last_n_days(
            &self.history,
            self.current_date,
            self.today_stats(),
            self.catalog().len() as u32,
            n,
        )
    }

    /// Archived days, newest first.
    pub fn recent_log(&self, limit: usize) -> impl Iterator<Item = (NaiveDate, &DayRecord)> {
        self.history.recent(limit)
    }

    /// Consecutive fully completed days ending yesterday, plus today when it is already done.
    pub fn current_streak(&self) -> u32 {
        let previous = self.history.complete_days_before(self.current_date);
        if self.today_stats().is_complete() {
            previous + 1
        } else {
            previous
        }
    }
}
