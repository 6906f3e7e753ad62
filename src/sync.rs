// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info};

use crate::{
    error::{Phase, Result},
    keyset::Keyset,
    source::Source,
    storage::Storage,
};

/// Merges the keys published by `source` into `storage`, returning the keys
/// that were written.
///
/// Nothing is written unless both sides were read successfully.
pub(crate) async fn sync<S, R>(storage: &mut S, source: &R) -> Result<Vec<String>>
where
    S: Storage + ?Sized,
    R: Source + ?Sized,
{
    let local = storage
        .get()
        .await
        .map_err(|e| e.during(Phase::ReadLocal))?
        .unwrap_or_default();
    debug!("Read {} existing lines", local.len());

    let remote = source
        .lines()
        .await
        .map_err(|e| e.during(Phase::ReadRemote))?;
    debug!("Read {} remote lines", remote.len());

    let mut keyset = Keyset::new();
    keyset.add(&local);
    keyset.add(&remote);
    let keys = keyset.keys();

    storage
        .update(&keys)
        .await
        .map_err(|e| e.during(Phase::Save))?;
    info!("Saved {} keys", keys.len());

    Ok(keys)
}
