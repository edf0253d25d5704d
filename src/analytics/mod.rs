//! Analytics tracking.

pub mod events;
mod tracker;

pub use tracker::{Delivery, TrackedEvent, Tracker};
