// Common test utilities for integration tests
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

use log::LevelFilter;
use tempfile::TempDir;

use parley::{sample, ConversationView};

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// The seeded view with Zoe pre-selected.
pub fn seeded_view() -> ConversationView {
    setup_logging();
    sample::conversation().expect("sample data is consistent")
}

/// Write a file with the given name and contents into `dir`.
pub fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).expect("create test file");
    file.write_all(contents).expect("write test file");
    path
}

/// A small fake PNG; only the extension matters for attachment checks.
pub fn png(dir: &TempDir, name: &str) -> PathBuf {
    write_file(dir, name, &[0x89, b'P', b'N', b'G', 0, 0, 0, 0])
}
