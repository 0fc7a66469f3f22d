//! Build script for the monthly playlist builder.
//!
//! Places the configuration template next to where the binary looks for its
//! `.env`, so a fresh install has an example to copy from:
//! - Linux: `~/.local/share/monthlycli/.env.example`
//! - macOS: `~/Library/Application Support/monthlycli/.env.example`
//! - Windows: `%LOCALAPPDATA%/monthlycli/.env.example`

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root into the local data directory.
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or to write the copy fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let template = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join(".env.example");

    let mut target_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    target_dir.push("monthlycli");
    fs::create_dir_all(&target_dir)?;

    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    fs::copy(&template, target_dir.join(".env.example"))?;
    Ok(())
}
