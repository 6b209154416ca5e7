// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Inbrief briefing engine.
//!
//! TOML files in the usual XDG locations, `INBRIEF_*` environment overrides,
//! strict key checking, and miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use inbrief_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("ttl: {}m", config.briefing.ttl_minutes);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

use tracing::{debug, warn};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AppConfig, BriefingConfig, HeuristicsConfig, InbriefConfig, LlmConfig, LlmProvider,
    SourceConfig,
};

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<InbriefConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => validated(config, &"layered"),
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Loads one explicit file (plus env overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<InbriefConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => validated(config, &path.display()),
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Loads a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<InbriefConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validated(config, &"inline"),
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Runs semantic validation, logging the outcome for `origin`.
fn validated(
    config: InbriefConfig,
    origin: &dyn std::fmt::Display,
) -> Result<InbriefConfig, Vec<ConfigError>> {
    match validation::validate_config(&config) {
        Ok(()) => {
            debug!(
                %origin,
                ttl_minutes = config.briefing.ttl_minutes,
                provider = %config.llm.provider,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(errors) => {
            warn!(%origin, errors = errors.len(), "configuration failed validation");
            Err(errors)
        }
    }
}

/// Reads the config files that exist, for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_PATH) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_PATH).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_PATH.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_CONFIG_PATH) {
        sources.push((loader::SYSTEM_CONFIG_PATH.to_string(), content));
    }

    sources
}
