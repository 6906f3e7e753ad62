// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod error;
mod keyset;
mod metadata;
mod source;
mod storage;
mod sync;

use std::{path::PathBuf, process};

use clap::Parser;
use error::Result;
use log::{error, info};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The GitHub user whose published keys should be authorized.
    #[arg(default_value = metadata::DEFAULT_USER)]
    user: String,

    /// The path to the authorized_keys file to update. A leading `~` is
    /// replaced with your home directory.
    #[arg(default_value = metadata::DEFAULT_KEYS_PATH, value_hint = clap::ValueHint::FilePath)]
    keys_path: PathBuf,
}

async fn run(args: Args) -> Result<()> {
    let path = metadata::expand_home(&args.keys_path)?;
    let mut storage = storage::File::new(path);
    let source = source::Http::new(metadata::DEFAULT_KEYS_URL, &args.user)?;

    let keys = sync::sync(&mut storage, &source).await?;
    info!(
        "{} now holds {} keys including those from {}",
        storage.path().display(),
        keys.len(),
        source.url()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("KEYSYNC_LOG", "warn")
        .write_style("KEYSYNC_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
