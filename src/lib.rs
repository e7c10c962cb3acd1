//! Third Places - browsing and discovery service for Vancouver community centres
//!
//! This library provides the listing logic behind the centre directory and
//! activity pages: age, date-window and availability filters, great-circle
//! distance sorting for "close to me", and a validated client for the
//! upstream activity API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{apply, distance::{format_distance, haversine_distance}, Listing};
pub use models::{ActivitySession, CommunityCentre, Coordinates, DateWindow, FilterCriteria};
