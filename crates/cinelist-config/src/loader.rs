// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/cinelist/cinelist.toml` < `~/.config/cinelist/cinelist.toml`
//! < `./cinelist.toml` < `CINELIST_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CinelistConfig;

/// Config sections, used to map env var names onto dotted keys.
const SECTIONS: &[&str] = &["bot", "telegram", "backend", "storage", "dialog"];

/// TOML files of the hierarchy, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/cinelist/cinelist.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("cinelist/cinelist.toml"));
    }
    paths.push(PathBuf::from("cinelist.toml"));
    paths
}

/// Build the layered Figment (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(CinelistConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<CinelistConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CinelistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CinelistConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CinelistConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CinelistConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `CINELIST_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses an explicit section table rather than `Env::split("_")`, since keys
/// such as `bot_token` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("CINELIST_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    // figment hands over the remainder in its original case.
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
