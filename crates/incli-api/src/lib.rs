//! Remote access layer for incli.
//!
//! Defines the [`IncidentApi`] seam, the reqwest-backed [`HttpClient`],
//! cursor pagination draining and the entity [`Locator`].

pub mod api;
pub mod client;
pub mod locator;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod pagination;

pub use api::IncidentApi;
pub use client::HttpClient;
pub use locator::Locator;
pub use incli_core as core;
