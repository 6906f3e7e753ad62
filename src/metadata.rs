// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

pub(crate) static CLIENT_NAME: Lazy<String> =
    Lazy::new(|| option_env!("CARGO_PKG_NAME").unwrap_or("keysync").to_owned());
pub(crate) static USER_AGENT: Lazy<String> = Lazy::new(|| {
    format!(
        "{}/{}",
        *CLIENT_NAME,
        option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0")
    )
});

pub(crate) const DEFAULT_USER: &str = "calmh";
pub(crate) const DEFAULT_KEYS_PATH: &str = "~/.ssh/authorized_keys";
pub(crate) const DEFAULT_KEYS_URL: &str = "https://github.com/";

static BASE_DIRS: Lazy<Option<BaseDirs>> = Lazy::new(BaseDirs::new);

/// Expands a leading `~` to the current user's home directory.
pub(crate) fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => BASE_DIRS
            .as_ref()
            .map(|dirs| dirs.home_dir().join(rest))
            .ok_or(Error::NoHomeDirectory),
        Err(_) => Ok(path.to_owned()),
    }
}
