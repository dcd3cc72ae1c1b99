//! Multi-panel figure model for the interactive report
//!
//! The figure is a plotly.js document: a flat `data` array of traces and a
//! `layout` holding one x/y axis pair per stacked row. Traces reference their
//! row through the axis ids (`x`/`y` for row 1, `x2`/`y2` for row 2, ...).
//!
//! The toggle buttons rewrite the `visible` flag of every trace at once, so
//! their arrays are indexed by position in `data`. [`FigureBuilder`] also
//! keeps the trace indices of each row as traces are added.

use crate::error::{Error, Result};
use crate::signal::{SignalData, SignalLabel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pixel height of one stacked row
pub const ROW_HEIGHT: u32 = 300;

/// Above this many rows the gap between rows is narrowed
pub const SPACING_THRESHOLD: usize = 10;

pub const WIDE_SPACING: f64 = 0.02;
pub const NARROW_SPACING: f64 = 0.01;

pub const REPORT_TITLE: &str =
    "Signal Plots - Use buttons to switch between Signal 1 and Signal 2";

const X_AXIS_TITLE: &str = "Time (s)";
const Y_AXIS_TITLE: &str = "Signal Value";

/// Gap between rows as a fraction of the plotting height
pub fn vertical_spacing(rows: usize) -> f64 {
    if rows > SPACING_THRESHOLD {
        NARROW_SPACING
    } else {
        WIDE_SPACING
    }
}

/// Paper-coordinate y-domain of a 1-based row, counted from the top.
///
/// Fails when the gaps alone take up the whole height, which would leave
/// rows with zero or negative height.
pub fn row_domain(row: usize, rows: usize, spacing: f64) -> Result<[f64; 2]> {
    let gaps = spacing * (rows as f64 - 1.0);
    if gaps >= 1.0 {
        return Err(Error::Layout(format!(
            "{} rows do not fit with vertical spacing {}",
            rows, spacing
        )));
    }
    let height = (1.0 - gaps) / rows as f64;
    let top = 1.0 - (row as f64 - 1.0) * (height + spacing);
    // last row ends exactly on the paper edge
    let bottom = if row == rows { 0.0 } else { top - height };
    Ok([bottom, top])
}

/// Axis id suffix for a row: `""` for row 1, `"2"` for row 2, ...
fn axis_suffix(row: usize) -> String {
    if row == 1 {
        String::new()
    } else {
        row.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn rows(&self) -> usize {
        self.layout.annotations.len()
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    /// Visibility array of the button with the given label
    pub fn button_visibility(&self, label: &str) -> Option<&[bool]> {
        self.layout
            .updatemenus
            .iter()
            .flat_map(|menu| menu.buttons.iter())
            .find(|button| button.label == label)
            .and_then(|button| button.args.first())
            .map(|update| update.visible.as_slice())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub line: Line,
    pub visible: bool,
    pub showlegend: bool,
    pub xaxis: String,
    pub yaxis: String,
    #[serde(skip)]
    pub label: SignalLabel,
    #[serde(skip)]
    pub row: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub anchor: String,
    pub domain: [f64; 2],
    pub title: Title,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
}

/// Row caption placed above the row in paper coordinates
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pad {
    pub r: u32,
    pub t: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityUpdate {
    pub visible: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Button {
    pub label: String,
    pub method: &'static str,
    pub args: Vec<VisibilityUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMenu {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub direction: &'static str,
    pub buttons: Vec<Button>,
    pub pad: Pad,
    pub showactive: bool,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
    pub yanchor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub height: u32,
    pub title: Title,
    pub annotations: Vec<Annotation>,
    pub updatemenus: Vec<UpdateMenu>,
    /// `xaxis`, `yaxis`, `xaxis2`, `yaxis2`, ...
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
}

/// Line colours per label, CH1 then CH2
fn palette(label: SignalLabel) -> [&'static str; 2] {
    match label {
        SignalLabel::One => ["blue", "red"],
        SignalLabel::Two => ["darkblue", "darkred"],
    }
}

/// Accumulates traces row by row and assembles the [`Figure`]
#[derive(Debug, Clone)]
pub struct FigureBuilder {
    titles: Vec<String>,
    traces: Vec<Trace>,
    row_traces: Vec<Vec<usize>>,
}

impl FigureBuilder {
    /// One row per title, top to bottom
    pub fn new(titles: Vec<String>) -> Self {
        let row_traces = vec![Vec::new(); titles.len()];
        Self {
            titles,
            traces: Vec::new(),
            row_traces,
        }
    }

    pub fn rows(&self) -> usize {
        self.titles.len()
    }

    /// Add the CH1 and CH2 traces of one signal file to a 1-based row.
    ///
    /// Signal 1 traces start visible, Signal 2 traces start hidden.
    ///
    /// # Panics
    ///
    /// Panics if `row` is 0 or greater than the number of rows.
    pub fn add_signal(&mut self, row: usize, label: SignalLabel, data: &SignalData) {
        assert!(
            (1..=self.rows()).contains(&row),
            "row {} out of range 1..={}",
            row,
            self.rows()
        );
        let suffix = axis_suffix(row);
        let colors = palette(label);
        let channels = [("CH1", &data.ch1, colors[0]), ("CH2", &data.ch2, colors[1])];

        for (name, values, color) in channels {
            self.row_traces[row - 1].push(self.traces.len());
            self.traces.push(Trace {
                kind: "scatter",
                mode: "lines",
                name: name.to_string(),
                x: data.time.clone(),
                y: values.clone(),
                line: Line { color, width: 1.0 },
                visible: label == SignalLabel::One,
                showlegend: false,
                xaxis: format!("x{}", suffix),
                yaxis: format!("y{}", suffix),
                label,
                row,
            });
        }
    }

    /// Indices into the trace list of the traces drawn in a 1-based row
    pub fn row_traces(&self, row: usize) -> &[usize] {
        &self.row_traces[row - 1]
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Visibility array that shows `label`'s traces and hides all others.
    ///
    /// Entries follow each trace's label rather than its position in the
    /// row, so a row holding only `signal_2.csv` is shown by "Signal 2".
    pub fn visibility(&self, label: SignalLabel) -> Vec<bool> {
        self.traces.iter().map(|trace| trace.label == label).collect()
    }

    /// Assemble the figure; fails when the rows cannot be stacked
    pub fn build(self) -> Result<Figure> {
        let rows = self.rows();
        let spacing = vertical_spacing(rows);

        let buttons = SignalLabel::ALL
            .into_iter()
            .map(|label| Button {
                label: label.to_string(),
                method: "update",
                args: vec![VisibilityUpdate {
                    visible: self.visibility(label),
                }],
            })
            .collect();

        let mut axes = BTreeMap::new();
        let mut annotations = Vec::with_capacity(rows);
        for (idx, title) in self.titles.into_iter().enumerate() {
            let row = idx + 1;
            let suffix = axis_suffix(row);
            let domain = row_domain(row, rows, spacing)?;

            axes.insert(
                format!("xaxis{}", suffix),
                Axis {
                    anchor: format!("y{}", suffix),
                    domain: [0.0, 1.0],
                    title: Title::new(X_AXIS_TITLE),
                },
            );
            axes.insert(
                format!("yaxis{}", suffix),
                Axis {
                    anchor: format!("x{}", suffix),
                    domain,
                    title: Title::new(Y_AXIS_TITLE),
                },
            );
            annotations.push(Annotation {
                text: title,
                x: 0.5,
                y: domain[1],
                xref: "paper",
                yref: "paper",
                xanchor: "center",
                yanchor: "bottom",
                showarrow: false,
                font: Font { size: 16 },
            });
        }

        let layout = Layout {
            height: ROW_HEIGHT * rows as u32,
            title: Title::new(REPORT_TITLE),
            annotations,
            updatemenus: vec![UpdateMenu {
                kind: "buttons",
                direction: "left",
                buttons,
                pad: Pad { r: 10, t: 10 },
                showactive: true,
                x: 0.0,
                xanchor: "left",
                y: 1.02,
                yanchor: "bottom",
            }],
            axes,
        };

        Ok(Figure {
            data: self.traces,
            layout,
        })
    }
}
