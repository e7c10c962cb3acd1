// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivitySession, CentreActivityGroup, CommunityCentre, Coordinates, DateWindow,
    FilterCriteria, NormalizedActivityName,
};
pub use requests::{ActivityIndexQuery, CentreDetailsQuery, CentreListQuery, SessionQuery};
pub use responses::{
    ActivityIndexEntry, ActivityIndexResponse, CentreDetailsResponse, CentreEntry,
    CentreListResponse, ErrorResponse, HealthResponse, LocationErrorBody, SessionEntry,
    SessionListResponse,
};
