//! Progress data model.
//!
//! A [`Snapshot`] maps each user to the series of [`Observation`]s the
//! producer recorded for them. Every optional field has a defined default
//! at the point where it is consumed, so a snapshot never needs to be
//! validated beyond its JSON shape.

mod key;
mod model;

pub use key::{canonical_key, instant_millis, MIDNIGHT_UTC_SUFFIX};
pub use model::{Observation, Snapshot, UserSeries, NO_LABEL};
