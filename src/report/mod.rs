//! Interactive multi-panel report
//!
//! One stacked row per directory holding signal files, with the CH1/CH2
//! traces of `signal_1.csv` and `signal_2.csv` drawn in that row. Two buttons
//! at the top switch every row between Signal 1 and Signal 2.
//!
//! # Usage
//!
//! ```ignore
//! use sigplot::report;
//!
//! let summary = report::generate("PHMDC2019_Data", "signal_plots.html")?;
//! println!("{} rows, {}px", summary.rows, summary.height);
//! ```

pub mod figure;
pub mod html;

use crate::error::Result;
use crate::scan::{signal_groups, SignalGroup};
use crate::signal::SignalData;
use figure::{Figure, FigureBuilder};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default location of the written report
pub const DEFAULT_REPORT_PATH: &str = "signal_plots.html";

/// Load every group member and lay the groups out as stacked rows.
///
/// Any unreadable or malformed file aborts the build.
pub fn build_figure(groups: &[SignalGroup]) -> Result<Figure> {
    let titles = groups.iter().map(SignalGroup::title).collect();
    let mut builder = FigureBuilder::new(titles);

    for (idx, group) in groups.iter().enumerate() {
        let row = idx + 1;
        for (label, path) in group.members() {
            let data = SignalData::load(path)?;
            builder.add_signal(row, label, &data);
        }
    }

    builder.build()
}

/// Scan `root`, build the figure and write it as HTML to `output`
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(root: P, output: Q) -> Result<Summary> {
    let output = output.as_ref();

    let groups = signal_groups(root)?;
    info!("Found {} directories with signal files", groups.len());

    let figure = build_figure(&groups)?;

    let mut writer = BufWriter::new(File::create(output)?);
    html::write(&mut writer, &figure)?;
    writer.flush()?;

    let summary = Summary::from_figure(&figure);
    info!("Interactive HTML saved to: {}", output.display());
    info!("Total height: {}px", summary.height);
    info!("Added toggle buttons for Signal 1/Signal 2");

    Ok(summary)
}

/// Shape of a written report
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub traces: usize,
    pub height: u32,
}

impl Summary {
    pub fn from_figure(figure: &Figure) -> Self {
        Self {
            rows: figure.rows(),
            traces: figure.data.len(),
            height: figure.height(),
        }
    }
}
