// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./aula.toml` > `<config_dir>/aula/aula.toml` > `/etc/aula/aula.toml`,
//! with `AULA_` environment variables overriding all files.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AulaConfig;

/// Local config file name.
pub const LOCAL_CONFIG: &str = "aula.toml";

/// System-wide config path.
pub const SYSTEM_CONFIG: &str = "/etc/aula/aula.toml";

/// Config sections recognized in `AULA_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: [&str; 4] = ["agent", "llm", "storage", "academic"];

/// Per-user config path under the platform config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aula").join(LOCAL_CONFIG))
}

/// Every file consulted by [`load_config`], lowest priority first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Figment with every layer merged, before extraction.
pub fn build_figment() -> Figment {
    config_file_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(AulaConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<AulaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<AulaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AulaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AulaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AulaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps `AULA_LLM_API_KEY` to `llm.api_key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// key names may contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("AULA_").map(|key| {
        let key = key.as_str();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key.to_string())
            .into()
    })
}
