//! Core model and rendering for the quakemap workspace.
//!
//! A feed is decoded into immutable event records, each record is
//! classified into a circle marker (radius from magnitude, fill from depth),
//! and the markers are composed with base layers and a depth legend into a
//! single map view that renders to a self-contained Leaflet page.

pub mod classify;
pub mod feed;
pub mod legend;
pub mod prelude;
pub mod render;
pub mod telemetry;

pub use prelude::{Classifier, FeedError, FeedResult};
