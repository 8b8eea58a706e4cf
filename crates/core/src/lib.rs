//! Domain core for the GovTrust trust-score service.
//!
//! - [`trust_score`] -- the clamped score rule, score events, and bands.
//! - [`ledger`] -- applies score events to stored projects.
//! - [`store`] -- the document store port and an in-memory implementation.
//! - [`project`], [`feedback`], [`profile`] -- collection models and reads/writes.

pub mod error;
pub mod feedback;
pub mod identity;
pub mod ledger;
pub mod profile;
pub mod project;
pub mod store;
pub mod trust_score;
pub mod types;
