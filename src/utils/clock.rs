use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::time::Instant;

/// Represents an entity responsible for providing dates across application. Injecting it into
/// the store and the ticker lets tests move across midnight without waiting for it.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    /// Current calendar date in local wall-clock time.
    fn today(&self) -> NaiveDate;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::time::Instant;

    use super::Clock;

    /// Clock whose date only changes when a test says so.
    pub struct ManualClock {
        date: Mutex<NaiveDate>,
    }

    impl ManualClock {
        pub fn new(date: NaiveDate) -> Self {
            Self {
                date: Mutex::new(date),
            }
        }

        pub fn set(&self, date: NaiveDate) {
            *self.date.lock().unwrap() = date;
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn today(&self) -> NaiveDate {
            *self.date.lock().unwrap()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }
}
