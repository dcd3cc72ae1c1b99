//! Fixture helpers for building signal directory trees in tests

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a well-formed signal CSV with `rows` samples and return its path
pub fn write_signal(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut contents = String::from("time,ch1,ch2\n");
    for i in 0..rows {
        let t = i as f64 * 0.001;
        writeln!(contents, "{},{},{}", t, (t * 50.0).sin(), 0.5 * (t * 30.0).cos()).unwrap();
    }
    write_csv(dir, name, &contents)
}

/// Write arbitrary CSV text, creating the directory if needed
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
