// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::CinelistConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Hard ceiling for page sizes; Telegram keyboards get unwieldy beyond it.
const PAGE_SIZE_CEILING: u32 = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of failing on the first one.
pub fn validate_config(config: &CinelistConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        fail(format!(
            "bot.log_level `{}` must be one of {}",
            config.bot.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.bot.default_locale.trim().is_empty() {
        fail("bot.default_locale must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    match url::Url::parse(&config.backend.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => fail(format!(
            "backend.base_url must use http or https, got `{}`",
            url.scheme()
        )),
        Err(e) => fail(format!(
            "backend.base_url `{}` is not a valid URL: {e}",
            config.backend.base_url
        )),
    }

    if config.backend.timeout_secs == 0 {
        fail("backend.timeout_secs must be greater than 0".to_string());
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        fail("telegram.bot_token must not be empty when set".to_string());
    }

    let dialog = &config.dialog;
    if dialog.default_page_size == 0 {
        fail("dialog.default_page_size must be at least 1".to_string());
    }
    if dialog.max_page_size > PAGE_SIZE_CEILING {
        fail(format!(
            "dialog.max_page_size must be at most {PAGE_SIZE_CEILING}, got {}",
            dialog.max_page_size
        ));
    }
    if dialog.default_page_size > dialog.max_page_size {
        fail(format!(
            "dialog.default_page_size ({}) must not exceed dialog.max_page_size ({})",
            dialog.default_page_size, dialog.max_page_size
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
