//! Build script for duoline-firmware
//!
//! - Places memory.x on the linker search path
//! - Rejects a device.toml the firmware would fall back from at boot

use std::env;
use std::fs;
use std::path::PathBuf;

use duoline_core::config::{parse_config, ConfigError};

const CONFIG_FILE: &str = "device.toml";

fn main() {
    setup_linker();
    if let Err(message) = check_config() {
        panic!("{CONFIG_FILE}: {message}");
    }
}

fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Full TOML syntax check, then the exact parser the firmware runs
fn check_config() -> Result<(), String> {
    println!("cargo:rerun-if-changed={CONFIG_FILE}");

    let content = fs::read_to_string(CONFIG_FILE).map_err(|e| format!("cannot read: {e}"))?;

    content
        .parse::<toml::Table>()
        .map_err(|e| format!("invalid TOML\n{e}"))?;

    parse_config(&content).map_err(|e| describe(&e))?;
    Ok(())
}

fn describe(err: &ConfigError) -> String {
    let (line, problem) = match *err {
        ConfigError::InvalidSection { line } => (line, "unterminated section header"),
        ConfigError::InvalidLine { line } => (line, "expected `key = value`"),
        ConfigError::InvalidValue { line } => (line, "not an integer of the key's type"),
        ConfigError::OutOfRange { line } => (line, "value out of range"),
    };
    format!("line {line}: {problem}")
}
