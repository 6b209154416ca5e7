// SPDX-FileCopyrightText: 2026 Inbrief Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Lookup: `./inbrief.toml` > `~/.config/inbrief/inbrief.toml` > `/etc/inbrief/inbrief.toml`,
//! with `INBRIEF_` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::InbriefConfig;

/// Top-level sections recognized in `INBRIEF_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &["app", "briefing", "heuristics", "source", "llm"];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/inbrief/inbrief.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "inbrief.toml";

/// Per-user config file under the platform config directory.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("inbrief/inbrief.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/inbrief/inbrief.toml`
/// 3. `~/.config/inbrief/inbrief.toml`
/// 4. `./inbrief.toml`
/// 5. `INBRIEF_*` environment variables
pub fn load_config() -> Result<InbriefConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<InbriefConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InbriefConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<InbriefConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InbriefConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(InbriefConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Env provider mapping only the section prefix to a dot.
///
/// `INBRIEF_LLM_API_KEY` must become `llm.api_key`, not `llm.api.key`, so
/// `Env::split("_")` is not usable here.
fn env_provider() -> Env {
    Env::prefixed("INBRIEF_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}
