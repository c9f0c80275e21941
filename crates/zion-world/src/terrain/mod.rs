//! Height field and zone classification on top of [`World`](crate::World).

mod classify;
mod height;

pub use classify::PathSample;
