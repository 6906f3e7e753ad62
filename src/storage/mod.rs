// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod file;
#[cfg(test)]
mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub(crate) use file::File;
#[cfg(test)]
pub(crate) use memory::Memory;

/// Where the authorized keys live.
#[async_trait]
pub(crate) trait Storage: Send + Sync {
    /// Returns the stored lines, or `None` if nothing has been stored yet.
    async fn get(&mut self) -> Result<Option<Vec<String>>>;
    /// Replaces the stored lines. Readers see either the old or the new set,
    /// never a mix.
    async fn update(&mut self, lines: &[String]) -> Result<()>;
}
