// Library for tests to access modules

pub mod aggregate_store;
pub mod alert_ledger;
pub mod archive;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod query;
pub mod routes;
pub mod snapshot;
pub mod tracker;
pub mod version;
pub mod worker;
