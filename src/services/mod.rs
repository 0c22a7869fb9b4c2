//! Services composed from the renderers.

pub mod reports;

pub use reports::ReportService;
