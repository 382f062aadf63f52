mod catalog;
mod debounce;
mod facet_tracker;
mod series;

pub use catalog::{available_dates, filtered_and_sorted};
pub use debounce::Debouncer;
pub use facet_tracker::SeriesFacetTracker;
pub use series::{SeriesCount, SeriesFacet, SeriesGroups, grouped_by_series, recompute_available_series};
