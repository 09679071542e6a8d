//! Scraping adapter for desidubanime.
//!
//! Pages are downloaded by a [`fetcher::Fetch`] implementation, parsed into
//! the records in [`models`] and kept in a single-flight [`cache::Cache`].
//! [`provider::Provider`] ties the three together.

pub mod archive;
pub mod cache;
pub mod config;
pub mod dom;
pub mod errors;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod provider;
