//! sigplot - plots for directory trees of signal recordings
//!
//! A data root holds one directory per recording run, each with up to two
//! CSV files `signal_1.csv` and `signal_2.csv` (columns `time`, `ch1`,
//! `ch2`). sigplot turns such a tree into two kinds of output:
//!
//! 1. **Static plots**: one PNG per signal file, CH1 and CH2 against time,
//!    written to a flat `plots/` directory.
//!
//! 2. **Interactive report**: a single HTML page with one stacked panel per
//!    directory and two buttons that switch every panel between Signal 1
//!    and Signal 2.
//!
//! # Quick Start
//!
//! ```no_run
//! use sigplot::{plot_all, report, PlotOptions};
//! use std::sync::atomic::AtomicBool;
//!
//! let stop = AtomicBool::new(false);
//! let summary = plot_all("PHMDC2019_Data", PlotOptions::default(), &stop)?;
//! println!("{} of {} files plotted", summary.plotted, summary.found);
//!
//! report::generate("PHMDC2019_Data", "signal_plots.html")?;
//! # Ok::<(), sigplot::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`scan`]: finding signal files and grouping them by directory
//! - [`signal`]: file labels and CSV loading
//! - [`plot`]: static PNG charts
//! - [`report`]: the interactive multi-panel HTML report

pub mod error;
pub mod plot;
pub mod report;
pub mod scan;
pub mod signal;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use plot::{plot_all, PlotOptions, PlotSummary, StaticPlotter};
pub use scan::{find_signal_files, signal_dirs, signal_groups, SignalGroup};
pub use signal::{SignalData, SignalLabel};
