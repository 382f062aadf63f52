pub mod late_registration;
mod parser;
mod status;
pub mod time_of_day;

pub use late_registration::{LATE_REGISTRATION_EXTRACTORS, LateRegistrationCue};
pub use parser::TimeHeuristicParser;
pub use status::{EventStatus, EventStatusResolver, EventTimeline};
pub use time_of_day::{TIME_OF_DAY_FORMATS, TimeOfDayFormat};
