//! Signal CSV files and the channel data they carry
//!
//! A signal file is a CSV recording of one channel pair with the header
//! columns `time`, `ch1` and `ch2`. Files are named `signal_<n>.csv`; the
//! number in the stem is the signal label. Only labels 1 and 2 are known:
//!
//! ```text
//! <root>/<specimen>/<run>/signal_1.csv   -> Signal 1
//! <root>/<specimen>/<run>/signal_2.csv   -> Signal 2
//! <root>/<specimen>/<run>/signal_7.csv   -> matched, no label
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// File name prefix shared by every signal file
pub const SIGNAL_PREFIX: &str = "signal_";

/// Extension of signal files
pub const SIGNAL_EXTENSION: &str = "csv";

/// Which of the two recordings in a directory a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SignalLabel {
    One,
    Two,
}

impl SignalLabel {
    pub const ALL: [SignalLabel; 2] = [SignalLabel::One, SignalLabel::Two];

    pub fn number(self) -> u8 {
        match self {
            SignalLabel::One => 1,
            SignalLabel::Two => 2,
        }
    }

    /// Canonical file name for this label, e.g. `signal_1.csv`
    pub fn file_name(self) -> String {
        format!("{}{}.{}", SIGNAL_PREFIX, self.number(), SIGNAL_EXTENSION)
    }

    /// Label encoded in a signal file's stem, if it is one of the known two
    pub fn from_path(path: &Path) -> Option<Self> {
        if !is_signal_file(path) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        match stem.strip_prefix(SIGNAL_PREFIX)? {
            "1" => Some(SignalLabel::One),
            "2" => Some(SignalLabel::Two),
            _ => None,
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal {}", self.number())
    }
}

/// Whether a path's file name matches `signal_*.csv`
pub fn is_signal_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let suffix = format!(".{}", SIGNAL_EXTENSION);
    name.len() >= SIGNAL_PREFIX.len() + suffix.len()
        && name.starts_with(SIGNAL_PREFIX)
        && name.ends_with(&suffix)
}

#[derive(Debug, Deserialize)]
struct SignalRow {
    time: f64,
    ch1: f64,
    ch2: f64,
}

/// Columns loaded from one signal file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalData {
    pub time: Vec<f64>,
    pub ch1: Vec<f64>,
    pub ch2: Vec<f64>,
}

impl SignalData {
    /// Load the `time`, `ch1` and `ch2` columns from a CSV file.
    ///
    /// Columns are matched by header name, so their order does not matter
    /// and extra columns are ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| Error::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv(reader).map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse signal rows from any reader holding CSV text with a header row
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, csv::Error> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> std::result::Result<Self, csv::Error> {
        let mut data = Self::default();
        for row in reader.deserialize() {
            let row: SignalRow = row?;
            data.time.push(row.time);
            data.ch1.push(row.ch1);
            data.ch2.push(row.ch2);
        }
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Smallest and largest finite timestamp
    pub fn time_range(&self) -> Option<(f64, f64)> {
        finite_range(self.time.iter().copied())
    }

    /// Smallest and largest finite value across both channels
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.ch1.iter().chain(self.ch2.iter()).copied())
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
