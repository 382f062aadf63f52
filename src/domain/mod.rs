mod calendar;
mod collection;
pub mod models;
mod progress;

pub use calendar::CalendarDate;
pub use collection::EventCollection;
pub use models::*;
pub use progress::SyncProgress;
