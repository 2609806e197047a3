//! Command execution layer for incli.
//!
//! Turns validated queries into API calls through the locator and drives the
//! refreshing live view of open incidents.

pub mod catalog;
pub mod incidents;
pub mod watch;

pub use incli_api as api;
pub use incli_core as core;
