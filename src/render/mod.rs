//! Render module - Image export of simulated diagrams.
//!
//! Text output lives with the types it prints: [`SpaceTimeDiagram`] displays
//! one digit per cell and [`FullListing`] expands a rule table.
//!
//! [`SpaceTimeDiagram`]: crate::compute::SpaceTimeDiagram
//! [`FullListing`]: crate::schema::FullListing

mod svg;

pub use svg::*;
