//! Static per-file signal charts
//!
//! Every matched signal file is rendered as one PNG with two lines (CH1 and
//! CH2 against time) using the [`plotters`] bitmap backend. Images land in a
//! flat output directory and are named after the file's position below the
//! data root:
//!
//! ```text
//! <root>/T1/run_a/signal_1.csv  ->  plots/T1_run_a_signal_1.png
//! <root>/run_a/signal_2.csv     ->  plots/_run_a_signal_2.png
//! ```
//!
//! A file that fails to load or render is logged and skipped; the run goes
//! on with the next file. Setting the stop flag (wired to Ctrl-C by the CLI)
//! ends the run before the next file starts.

use crate::error::{Error, Result};
use crate::scan::{component_name, find_signal_files};
use crate::signal::SignalData;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default directory for rendered images
pub const DEFAULT_OUTPUT_DIR: &str = "plots";

// 12x6 inches at 150 dpi
pub const PLOT_WIDTH: u32 = 1800;
pub const PLOT_HEIGHT: u32 = 900;

const CH1_COLOR: RGBColor = BLUE;
const CH2_COLOR: RGBColor = RED;

#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Directory the PNG files are written to
    pub output_dir: PathBuf,
    /// Write each image into `output_dir`
    pub save: bool,
    /// Open each image with the system viewer after rendering
    pub show: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            save: true,
            show: false,
        }
    }
}

/// A file that could not be plotted
#[derive(Debug, Clone)]
pub struct PlotFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a plot run
#[derive(Debug, Clone, Default)]
pub struct PlotSummary {
    /// Signal files handed to the run
    pub found: usize,
    /// Files rendered successfully
    pub plotted: usize,
    /// Images written to disk
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<PlotFailure>,
    /// The stop flag ended the run early
    pub interrupted: bool,
}

impl PlotSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Output file name `<grandparent>_<parent>_<stem>.png`, taken relative to `root`
pub fn output_file_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let parent = relative.parent();
    let grandparent = parent.and_then(Path::parent);
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{}_{}_{}.png",
        component_name(grandparent),
        component_name(parent),
        stem
    )
}

/// Chart caption, `Signal Plot: <grandparent>/<parent>/<file name>`
pub fn chart_title(file: &Path) -> String {
    let parent = file.parent();
    format!(
        "Signal Plot: {}/{}/{}",
        component_name(parent.and_then(Path::parent)),
        component_name(parent),
        component_name(Some(file))
    )
}

/// Render a signal chart straight into a PNG file
pub fn render_signal_png(data: &SignalData, title: &str, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    draw_signal_chart(&root, data, title)
}

/// Render a signal chart into an in-memory RGB buffer
pub fn render_signal_buffer(data: &SignalData, title: &str) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (PLOT_WIDTH * PLOT_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (PLOT_WIDTH, PLOT_HEIGHT))
            .into_drawing_area();
        draw_signal_chart(&root, data, title)?;
    }
    Ok(buffer)
}

fn draw_signal_chart<DB>(root: &DrawingArea<DB, Shift>, data: &SignalData, title: &str) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (t_min, t_max) = data
        .time_range()
        .ok_or_else(|| Error::Plot("signal has no samples".into()))?;
    let (y_min, y_max) = data
        .value_range()
        .ok_or_else(|| Error::Plot("signal has no finite channel values".into()))?;
    let (t_min, t_max) = padded(t_min, t_max, 0.0);
    let (y_min, y_max) = padded(y_min, y_max, 0.05);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(title, ("sans-serif", 28))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 60)
        .build_cartesian_2d(t_min..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Signal Value")
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.08))
        .axis_desc_style(("sans-serif", 20))
        .label_style(("sans-serif", 16))
        .draw()?;

    let channels = [("CH1", &data.ch1, CH1_COLOR), ("CH2", &data.ch2, CH2_COLOR)];
    for (label, values, color) in channels {
        let points = data.time.iter().copied().zip(values.iter().copied());
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(1)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 18))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Widen a range by `fraction` of its span, or by one unit when it is flat
fn padded(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo - span * fraction, hi + span * fraction)
    }
}

/// Renders signal files below one data root
#[derive(Debug, Clone)]
pub struct StaticPlotter {
    root: PathBuf,
    options: PlotOptions,
}

impl StaticPlotter {
    pub fn new<P: Into<PathBuf>>(root: P, options: PlotOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Where the image for `file` goes, if it is written at all
    pub fn target_path(&self, file: &Path) -> Option<PathBuf> {
        let name = output_file_name(&self.root, file);
        if self.options.save {
            Some(self.options.output_dir.join(name))
        } else if self.options.show {
            Some(std::env::temp_dir().join(name))
        } else {
            None
        }
    }

    /// Load and render one file; returns the written image path
    pub fn plot_file(&self, file: &Path) -> Result<Option<PathBuf>> {
        let data = SignalData::load(file)?;
        let title = chart_title(file);

        let Some(target) = self.target_path(file) else {
            render_signal_buffer(&data, &title)?;
            return Ok(None);
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        render_signal_png(&data, &title, &target)?;
        debug!("  Saved to: {}", target.display());

        if self.options.show {
            if let Err(e) = open::that(&target) {
                warn!("Failed to open {}: {}", target.display(), e);
            }
        }
        Ok(Some(target))
    }

    /// Plot every file in order, skipping failures, until done or `stop` is set
    pub fn run(
        &self,
        files: &[PathBuf],
        stop: &AtomicBool,
        progress: Option<&ProgressBar>,
    ) -> Result<PlotSummary> {
        if self.options.save {
            fs::create_dir_all(&self.options.output_dir)?;
        }

        let mut summary = PlotSummary {
            found: files.len(),
            ..Default::default()
        };

        for (i, file) in files.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                suspended(progress, || info!("Stopped by user"));
                summary.interrupted = true;
                break;
            }

            debug!("Processing {}/{}: {}", i + 1, files.len(), file.display());

            match self.plot_file(file) {
                Ok(output) => {
                    summary.plotted += 1;
                    summary.outputs.extend(output);
                }
                Err(e) => {
                    suspended(progress, || {
                        warn!("Error processing {}: {}", file.display(), e)
                    });
                    summary.failures.push(PlotFailure {
                        path: file.clone(),
                        message: e.to_string(),
                    });
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
                pb.set_message(component_name(Some(file)));
            }
        }

        Ok(summary)
    }
}

/// Scan `root` and plot every signal file found
pub fn plot_all<P: AsRef<Path>>(root: P, options: PlotOptions, stop: &AtomicBool) -> Result<PlotSummary> {
    let root = root.as_ref();
    let files = find_signal_files(root)?;
    info!("Found {} signal files", files.len());
    StaticPlotter::new(root, options).run(&files, stop, None)
}

fn suspended<F: FnOnce()>(progress: Option<&ProgressBar>, f: F) {
    match progress {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_csv, write_signal};
    use tempfile::TempDir;

    // ==========================================================================
    // OUTPUT NAMING
    // ==========================================================================
    //
    // Images are flattened into one directory, so the name carries the two
    // directories above the file (relative to the data root). Shallow files
    // get empty components rather than names from outside the root.
    // ==========================================================================

    #[test]
    fn test_output_file_name_two_levels() {
        let root = Path::new("/data");
        let file = Path::new("/data/T1/run_a/signal_1.csv");
        assert_eq!(output_file_name(root, file), "T1_run_a_signal_1.png");
    }

    #[test]
    fn test_output_file_name_deeper_uses_nearest_two() {
        let root = Path::new("/data");
        let file = Path::new("/data/lab/T1/run_a/signal_2.csv");
        assert_eq!(output_file_name(root, file), "T1_run_a_signal_2.png");
    }

    #[test]
    fn test_output_file_name_shallow_files() {
        let root = Path::new("/data");
        assert_eq!(
            output_file_name(root, Path::new("/data/run_a/signal_1.csv")),
            "_run_a_signal_1.png"
        );
        assert_eq!(
            output_file_name(root, Path::new("/data/signal_1.csv")),
            "__signal_1.png"
        );
    }

    #[test]
    fn test_chart_title() {
        let file = Path::new("/data/T1/run_a/signal_1.csv");
        assert_eq!(chart_title(file), "Signal Plot: T1/run_a/signal_1.csv");
    }

    #[test]
    fn test_padded_flat_range() {
        assert_eq!(padded(2.0, 2.0, 0.05), (1.5, 2.5));
        let (lo, hi) = padded(0.0, 10.0, 0.1);
        assert!((lo + 1.0).abs() < 1e-12);
        assert!((hi - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_path_respects_flags() {
        let root = Path::new("/data");
        let file = Path::new("/data/T1/run_a/signal_1.csv");

        let saving = StaticPlotter::new(root, PlotOptions::default());
        assert_eq!(
            saving.target_path(file),
            Some(PathBuf::from("plots/T1_run_a_signal_1.png"))
        );

        let showing = StaticPlotter::new(
            root,
            PlotOptions {
                save: false,
                show: true,
                ..Default::default()
            },
        );
        assert_eq!(
            showing.target_path(file),
            Some(std::env::temp_dir().join("T1_run_a_signal_1.png"))
        );

        let neither = StaticPlotter::new(
            root,
            PlotOptions {
                save: false,
                show: false,
                ..Default::default()
            },
        );
        assert_eq!(neither.target_path(file), None);
    }

    // ==========================================================================
    // PLOT RUNS
    // ==========================================================================
    //
    // A run produces one image per readable file. Broken files are recorded
    // as failures and do not stop the run.
    // ==========================================================================

    fn plotter_for(tmp: &TempDir) -> StaticPlotter {
        StaticPlotter::new(
            tmp.path().join("data"),
            PlotOptions {
                output_dir: tmp.path().join("plots"),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_run_writes_one_image_per_file() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        write_signal(&data.join("T1/run_a"), "signal_1.csv", 40);
        write_signal(&data.join("T1/run_a"), "signal_2.csv", 40);
        write_signal(&data.join("T2/run_b"), "signal_1.csv", 40);

        let files = find_signal_files(&data).unwrap();
        let stop = AtomicBool::new(false);
        let summary = plotter_for(&tmp).run(&files, &stop, None).unwrap();

        assert_eq!(summary.found, 3);
        assert_eq!(summary.plotted, 3);
        assert_eq!(summary.failed(), 0);
        assert!(!summary.interrupted);
        assert_eq!(summary.outputs.len(), 3);
        for name in [
            "T1_run_a_signal_1.png",
            "T1_run_a_signal_2.png",
            "T2_run_b_signal_1.png",
        ] {
            let path = tmp.path().join("plots").join(name);
            assert!(path.is_file(), "missing {}", path.display());
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_run_skips_file_missing_columns() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        write_signal(&data.join("T1/run_a"), "signal_1.csv", 20);
        let broken = write_csv(&data.join("T1/run_b"), "signal_1.csv", "time,ch1\n0.0,1.0\n");
        write_signal(&data.join("T1/run_c"), "signal_2.csv", 20);

        let files = find_signal_files(&data).unwrap();
        let stop = AtomicBool::new(false);
        let summary = plotter_for(&tmp).run(&files, &stop, None).unwrap();

        assert_eq!(summary.found, 3);
        assert_eq!(summary.plotted, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures[0].path, broken);
        assert!(!summary.failures[0].message.is_empty());
        assert!(!tmp.path().join("plots/T1_run_b_signal_1.png").exists());
        assert!(tmp.path().join("plots/T1_run_c_signal_2.png").is_file());
    }

    #[test]
    fn test_run_fails_header_only_file() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        write_csv(&data.join("T1/run_a"), "signal_1.csv", "time,ch1,ch2\n");

        let files = find_signal_files(&data).unwrap();
        let stop = AtomicBool::new(false);
        let summary = plotter_for(&tmp).run(&files, &stop, None).unwrap();

        assert_eq!(summary.plotted, 0);
        assert_eq!(summary.failed(), 1);
        assert!(summary.failures[0].message.contains("no samples"));
    }

    #[test]
    fn test_run_stops_when_flag_set() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        write_signal(&data.join("T1/run_a"), "signal_1.csv", 10);
        write_signal(&data.join("T1/run_b"), "signal_1.csv", 10);

        let files = find_signal_files(&data).unwrap();
        let stop = AtomicBool::new(true);
        let summary = plotter_for(&tmp).run(&files, &stop, None).unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.found, 2);
        assert_eq!(summary.plotted, 0);
        assert!(summary.outputs.is_empty());
    }

    #[test]
    fn test_run_without_saving_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        write_signal(&data.join("T1/run_a"), "signal_1.csv", 10);

        let plotter = StaticPlotter::new(
            &data,
            PlotOptions {
                output_dir: tmp.path().join("plots"),
                save: false,
                show: false,
            },
        );
        let files = find_signal_files(&data).unwrap();
        let summary = plotter.run(&files, &AtomicBool::new(false), None).unwrap();

        assert_eq!(summary.plotted, 1);
        assert!(summary.outputs.is_empty());
        assert!(!tmp.path().join("plots").exists());
    }

    #[test]
    fn test_plot_all_missing_root() {
        let tmp = TempDir::new().unwrap();
        let result = plot_all(tmp.path().join("absent"), PlotOptions::default(), &AtomicBool::new(false));
        assert!(matches!(result, Err(Error::MissingRoot(_))));
    }
}
