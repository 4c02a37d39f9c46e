//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memedex_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("memedex_core version={}", memedex_core::core_version());
    match memedex_core::dataset::bundled::default_memes() {
        Ok(memes) => {
            println!("memedex_core bundled_entries={}", memes.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bundled dataset failed to decode: {err}");
            ExitCode::FAILURE
        }
    }
}
