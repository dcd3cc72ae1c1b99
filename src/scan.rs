//! Directory scanning and grouping of signal files
//!
//! Walks a data root, collects every `signal_*.csv` and groups the matches
//! by parent directory. Each directory with at least one match becomes a
//! [`SignalGroup`], and groups come back in sorted path order, which is
//! also the row order of the interactive report.

use crate::error::{Error, Result};
use crate::signal::{is_signal_file, SignalLabel};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every file under `root` whose name matches `signal_*.csv`, sorted by path
pub fn find_signal_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() && is_signal_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Sorted set of directories that contain at least one signal file
pub fn signal_dirs<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let dirs: BTreeSet<PathBuf> = find_signal_files(root)?
        .into_iter()
        .filter_map(|file| file.parent().map(Path::to_path_buf))
        .collect();
    Ok(dirs.into_iter().collect())
}

/// One [`SignalGroup`] per directory returned by [`signal_dirs`]
pub fn signal_groups<P: AsRef<Path>>(root: P) -> Result<Vec<SignalGroup>> {
    Ok(signal_dirs(root)?
        .into_iter()
        .map(SignalGroup::from_dir)
        .collect())
}

/// The labelled signal files sharing one parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalGroup {
    pub dir: PathBuf,
    pub signal_1: Option<PathBuf>,
    pub signal_2: Option<PathBuf>,
}

impl SignalGroup {
    /// Look up `signal_1.csv` and `signal_2.csv` inside `dir`
    pub fn from_dir(dir: PathBuf) -> Self {
        let existing = |label: SignalLabel| {
            let path = dir.join(label.file_name());
            path.is_file().then_some(path)
        };
        let signal_1 = existing(SignalLabel::One);
        let signal_2 = existing(SignalLabel::Two);
        Self { dir, signal_1, signal_2 }
    }

    pub fn path(&self, label: SignalLabel) -> Option<&Path> {
        match label {
            SignalLabel::One => self.signal_1.as_deref(),
            SignalLabel::Two => self.signal_2.as_deref(),
        }
    }

    /// Present members in label order
    pub fn members(&self) -> impl Iterator<Item = (SignalLabel, &Path)> + '_ {
        SignalLabel::ALL
            .into_iter()
            .filter_map(move |label| self.path(label).map(|path| (label, path)))
    }

    pub fn len(&self) -> usize {
        self.members().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panel title, `<parent>/<dir>`
    pub fn title(&self) -> String {
        format!(
            "{}/{}",
            component_name(self.dir.parent()),
            component_name(Some(&self.dir))
        )
    }
}

/// Final component of a path, or an empty string when there is none
pub fn component_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
