// Core listing logic exports
pub mod dates;
pub mod distance;
pub mod filters;
pub mod geolocation;
pub mod icons;
pub mod naming;
pub mod pipeline;

pub use dates::{matches_date_window, parse_date, window_bounds};
pub use distance::{distance_between, format_distance, haversine_distance};
pub use filters::{matches_age, matches_availability, matches_search, Availability};
pub use geolocation::{LocationError, LocationOptions, LocationProvider, ProximityState};
pub use pipeline::{apply, FallbackOrder, Listing, Ranked};
