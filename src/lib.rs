//! Upload preprocessed datasets to a query server's admin API.
//!
//! A run picks datasets from a catalog file, picks actions from a fixed,
//! ordered [`pipeline::Catalog`] and executes them one after another. Each
//! action uploads one kind of artifact for every dataset; failed calls are
//! collected and reported once the run is over.

pub mod actions;
pub mod api;
pub mod artifacts;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod telemetry;
