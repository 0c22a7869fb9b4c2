//! Inventory Reports Library
//!
//! Renders aggregated inventory, sales, transfer and product movement data
//! into spreadsheet (xlsx), paginated (pdf) or json documents, returned as
//! in-memory byte buffers.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod models;
pub mod reports;
pub mod services;

pub use config::{init_tracing, load_config, ReportConfig};
pub use errors::ReportError;
pub use models::ReportRequest;
pub use reports::{
    JsonRenderer, PaginatedDocumentRenderer, RenderedDocument, ReportFormat, ReportKind,
    ReportRenderer, TabularWorkbookRenderer,
};
pub use services::ReportService;
