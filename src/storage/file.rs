// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    ffi::OsString,
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::{debug, warn};

use crate::error::Result;

use super::Storage;

/// A plain `authorized_keys`-style file.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        name.into()
    }

    fn create_parent(&self) {
        let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };

        let mut builder = fs::DirBuilder::new();
        _ = builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt as _;
            _ = builder.mode(0o700);
        }

        // Whatever went wrong here will surface again when we create the
        // temporary file.
        if let Err(e) = builder.create(parent) {
            warn!("Could not create directory {}: {}", parent.display(), e);
        }
    }

    fn write_temp(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        _ = options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt as _;
            _ = options.mode(0o600);
        }

        let mut fp = options.open(path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            // A stale temporary file keeps its old mode across open().
            fp.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        fp.write_all(contents)?;
        fp.sync_all()
    }
}

#[async_trait]
impl Storage for File {
    async fn get(&mut self) -> Result<Option<Vec<String>>> {
        match fs::read(&self.path) {
            Ok(contents) => {
                debug!("Read existing keys from {}", self.path.display());
                Ok(Some(
                    String::from_utf8_lossy(&contents)
                        .split('\n')
                        .map(str::to_owned)
                        .collect(),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No existing keys at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, lines: &[String]) -> Result<()> {
        self.create_parent();

        let mut contents = lines.join("\n");
        contents.push('\n');

        let temp_path = self.temp_path();
        let result = Self::write_temp(&temp_path, contents.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "Could not remove temporary file {}: {}",
                        temp_path.display(),
                        cleanup
                    );
                }
            }
            return Err(e.into());
        }

        debug!("Wrote {} keys to {}", lines.len(), self.path.display());
        Ok(())
    }
}
