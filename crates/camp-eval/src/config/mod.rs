use std::env;
use std::fmt;

use crate::workflows::evaluation::domain::{Category, CriteriaCatalog};
use crate::workflows::evaluation::generator::ReportSettings;
use crate::workflows::evaluation::layout::ReportLabels;
use crate::workflows::evaluation::repository::SheetTarget;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub report: ReportConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&ReportOverrides::default())
    }

    /// Load from the environment, letting command line values replace the
    /// sheet target before the required-variable checks run.
    pub fn load_with(overrides: &ReportOverrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        Ok(Self {
            environment,
            report: ReportConfig::from_env(overrides)?,
            telemetry: TelemetryConfig::from_env(),
        })
    }
}

/// Values supplied outside the environment, e.g. by command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOverrides {
    pub sheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub roster_sheet_name: Option<String>,
}

const DEFAULT_ROSTER_SHEET_NAME: &str = "Check-in";

/// Report target, rubric and title. The check-in roster lives in its own
/// sheet of the same spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub sheet_id: String,
    pub sheet_name: String,
    pub roster_sheet_name: String,
    pub title: Option<String>,
    pub catalog: CriteriaCatalog,
}

impl ReportConfig {
    fn from_env(overrides: &ReportOverrides) -> Result<Self, ConfigError> {
        let sheet_id = required("REPORT_SHEET_ID", overrides.sheet_id.as_deref())?;
        let sheet_name = required("REPORT_SHEET_NAME", overrides.sheet_name.as_deref())?;
        let roster_sheet_name = overrides
            .roster_sheet_name
            .clone()
            .or_else(|| env::var("REPORT_ROSTER_SHEET_NAME").ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ROSTER_SHEET_NAME.to_string());
        let title = env::var("REPORT_TITLE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let defaults = CriteriaCatalog::training_camp();
        let leader = criteria_override("REPORT_LEADER_CRITERIA", Category::Leader)?
            .unwrap_or(defaults.leader);
        let supporter = criteria_override("REPORT_SUPPORTER_CRITERIA", Category::Supporter)?
            .unwrap_or(defaults.supporter);

        Ok(Self {
            sheet_id,
            sheet_name,
            roster_sheet_name,
            title,
            catalog: CriteriaCatalog::new(leader, supporter),
        })
    }

    pub fn target(&self) -> SheetTarget {
        SheetTarget {
            sheet_id: self.sheet_id.clone(),
            sheet_name: self.sheet_name.clone(),
        }
    }

    pub fn roster_target(&self) -> SheetTarget {
        SheetTarget {
            sheet_id: self.sheet_id.clone(),
            sheet_name: self.roster_sheet_name.clone(),
        }
    }

    pub fn settings(&self) -> ReportSettings {
        let labels = match &self.title {
            Some(title) => ReportLabels::with_title(title.clone()),
            None => ReportLabels::default(),
        };

        ReportSettings {
            target: self.target(),
            catalog: self.catalog.clone(),
            labels,
        }
    }
}

fn required(var: &'static str, preferred: Option<&str>) -> Result<String, ConfigError> {
    preferred
        .map(str::to_string)
        .or_else(|| env::var(var).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { var })
}

/// `None` when the variable is unset; an explicitly empty list is fatal.
fn criteria_override(
    var: &'static str,
    category: Category,
) -> Result<Option<Vec<String>>, ConfigError> {
    let Ok(raw) = env::var(var) else {
        return Ok(None);
    };

    let names: Vec<String> = raw
        .split('|')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(ConfigError::EmptyCriteria { var, category });
    }
    Ok(Some(names))
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    /// Readable without any report variables, so logging can start first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            log_level: env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing {
        var: &'static str,
    },
    EmptyCriteria {
        var: &'static str,
        category: Category,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing { var } => write!(f, "{var} must be set to a non-empty value"),
            ConfigError::EmptyCriteria { var, category } => write!(
                f,
                "{var} lists no criteria for {} participants",
                category.label()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
