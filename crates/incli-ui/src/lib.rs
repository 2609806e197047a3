//! Output layer for incli.
//!
//! Pretty JSON for one-shot commands and a plain clear-and-redraw terminal
//! view for the live incident monitor.

pub mod live_view;
pub mod presenter;

pub use incli_core as core;
