//! Command implementations

use std::path::PathBuf;

use faultline::config::AnalysisConfig;

mod analyze;
mod classify;
mod rules;

pub use analyze::analyze;
pub use classify::classify;
pub use rules::rules;

/// Settings given on the command line that override the config file
#[derive(Debug, Default)]
pub struct Overrides {
    /// Config file
    pub config: Option<PathBuf>,
    /// Catalog file
    pub catalog: Option<PathBuf>,
    /// Fixed window in seconds
    pub window: Option<f64>,
}

impl Overrides {
    /// Load the config file (or defaults) and apply overrides
    fn resolve(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(catalog) = &self.catalog {
            config.catalog_path = Some(catalog.clone());
        }
        if let Some(window) = self.window {
            config.time_window_secs = Some(window);
            config.validate()?;
        }
        Ok(config)
    }
}
