// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;

use super::Storage;

#[derive(Clone, Default)]
pub(crate) struct Memory {
    data: Arc<RwLock<Option<Vec<String>>>>,
}

impl Memory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: Arc::new(RwLock::new(Some(lines.into_iter().map(Into::into).collect()))),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn get(&mut self) -> Result<Option<Vec<String>>> {
        let data = Arc::clone(&self.data);
        let guard = data.read().await;
        Ok(guard.clone())
    }

    async fn update(&mut self, lines: &[String]) -> Result<()> {
        let target_data = Arc::clone(&self.data);
        let mut guard = target_data.write_owned().await;
        *guard = Some(lines.to_vec());
        Ok(())
    }
}
