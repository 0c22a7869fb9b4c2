use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_COMPANY_NAME: &str = "Inventory Management System";
const CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "REPORTS";
const DEFAULT_TRANSFER_ROWS: usize = 30;
const DEFAULT_ACTIVITY_ROWS: usize = 40;

/// Row caps applied by the paginated renderer. The workbook renderer never truncates.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct ReportLimits {
    /// Rows of the transfer table placed in a paginated document
    #[validate(range(min = 1))]
    pub transfer_rows: usize,

    /// Rows of the recent activity log placed in a paginated document
    #[validate(range(min = 1))]
    pub activity_rows: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            transfer_rows: DEFAULT_TRANSFER_ROWS,
            activity_rows: DEFAULT_ACTIVITY_ROWS,
        }
    }
}

/// Page geometry for paginated documents, in points, measured top-down.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
#[validate(schema(function = "validate_page_geometry"))]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Where content resumes after a page break
    pub top_margin: f32,
    /// A row that would end below this line starts a new page
    pub page_bottom: f32,
    /// Baseline of the "Page X of N" stamp
    pub footer_y: f32,
    /// Advance used by the summary block and section titles
    pub line_height: f32,
    /// Advance used by table rows
    pub row_height: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        // US Letter
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_left: 50.0,
            margin_right: 50.0,
            top_margin: 50.0,
            page_bottom: 700.0,
            footer_y: 750.0,
            line_height: 20.0,
            row_height: 13.0,
        }
    }
}

impl PdfLayout {
    /// Vertical space available to flowing content on one page
    pub fn usable_height(&self) -> f32 {
        self.page_bottom - self.top_margin
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct ReportConfig {
    /// Product title printed at the top of every paginated document
    #[validate(length(min = 1, max = 60))]
    pub company_name: String,

    /// Logging level
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    pub log_json: bool,

    #[validate]
    pub limits: ReportLimits,

    #[validate]
    pub pdf: PdfLayout,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
            limits: ReportLimits::default(),
            pdf: PdfLayout::default(),
        }
    }
}

impl ReportConfig {
    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_page_geometry(layout: &PdfLayout) -> Result<(), ValidationError> {
    let ordered = 0.0 < layout.top_margin
        && layout.top_margin < layout.page_bottom
        && layout.page_bottom < layout.footer_y
        && layout.footer_y < layout.page_height;
    if !ordered {
        let mut err = ValidationError::new("pdf_geometry");
        err.message = Some(
            "Expected 0 < top_margin < page_bottom < footer_y < page_height".into(),
        );
        return Err(err);
    }

    if layout.row_height <= 0.0 || layout.line_height <= 0.0 {
        let mut err = ValidationError::new("pdf_line_metrics");
        err.message = Some("row_height and line_height must be positive".into());
        return Err(err);
    }

    if layout.row_height > layout.usable_height() || layout.content_width() <= 0.0 {
        let mut err = ValidationError::new("pdf_content_area");
        err.message = Some("A single row must fit inside the content area".into());
        return Err(err);
    }

    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("inventory_reports={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads report configuration from the `config` directory of the working directory
pub fn load_config() -> Result<ReportConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Loads report configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (`{dir}/default.toml`)
/// 3. Environment-specific config (`{dir}/{env}.toml`)
/// 4. Environment variables (`REPORTS__*`)
pub fn load_config_from(dir: &Path) -> Result<ReportConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading report configuration for environment: {}", run_env);

    if !dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            dir.display()
        );
    }

    let defaults = Config::try_from(&ReportConfig::default())?;

    let config = Config::builder()
        .add_source(defaults)
        .add_source(File::from(dir.join("default")).required(false))
        .add_source(File::from(dir.join(&run_env)).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let report_config: ReportConfig = config.try_deserialize()?;

    report_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(report_config)
}
