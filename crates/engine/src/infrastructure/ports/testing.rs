//! Testability port for injecting time.

use chrono::{DateTime, NaiveDate, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The server's current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
