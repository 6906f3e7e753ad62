// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("fetch error: {0}")]
    Fetch(#[from] Fetch),
    #[error("could not determine the home directory")]
    NoHomeDirectory,
    #[error("{0}: {1}")]
    Phase(Phase, Box<Error>),
}

impl Error {
    pub(crate) fn during(self, phase: Phase) -> Self {
        Self::Phase(phase, Box::new(self))
    }
}

#[derive(Error, Debug)]
pub(crate) enum Fetch {
    #[error("got status code {status} from {url}")]
    Status {
        url: url::Url,
        status: reqwest::StatusCode,
    },
    #[error("{0} is not a valid key URL: {1}")]
    Url(String, url::ParseError),
}

/// The step of a sync that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    ReadLocal,
    ReadRemote,
    Save,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadLocal => "reading existing keys",
            Self::ReadRemote => "reading remote keys",
            Self::Save => "saving keys",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_prefixes_message() {
        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            .during(Phase::ReadLocal);

        assert_eq!(
            err.to_string(),
            "reading existing keys: IO operation failed: denied"
        );
    }
}
