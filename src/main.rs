use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use sigplot::{find_signal_files, report, PlotOptions, PlotSummary, StaticPlotter};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sigplot")]
#[command(author, version, about = "Plot directory trees of signal_1/signal_2 CSV recordings")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show per-file progress messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and the summary
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one PNG chart per signal file
    Plot {
        /// Data root to scan for signal_*.csv
        root: PathBuf,

        /// Directory for the rendered images
        #[arg(long, default_value = sigplot::plot::DEFAULT_OUTPUT_DIR)]
        out_dir: PathBuf,

        /// Don't write images to the output directory
        #[arg(long)]
        no_save: bool,

        /// Open each image in the system viewer
        #[arg(long)]
        show: bool,
    },

    /// Write the interactive multi-panel HTML report
    Report {
        /// Data root to scan for signal_*.csv
        root: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = sigplot::report::DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// Open the report in the browser when done
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose, args.quiet);

    let code = match args.command {
        Command::Plot {
            root,
            out_dir,
            no_save,
            show,
        } => {
            let options = PlotOptions {
                output_dir: out_dir,
                save: !no_save,
                show,
            };
            run_plot(root, options, args.quiet)
        }
        Command::Report { root, output, open } => run_report(root, output, open),
    };

    process::exit(code);
}

fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_plot(root: PathBuf, options: PlotOptions, quiet: bool) -> i32 {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_ctrlc = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        stop_for_ctrlc.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let files = match find_signal_files(&root) {
        Ok(files) => files,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };
    info!("Found {} signal files", files.len());

    let pb = if !quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        Some(pb)
    } else {
        None
    };

    let plotter = StaticPlotter::new(root, options);
    let result = plotter.run(&files, &stop, pb.as_ref());

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match result {
        Ok(summary) => {
            print_plot_summary(&summary, plotter.options());
            if summary.interrupted {
                130
            } else if summary.failed() > 0 {
                2
            } else {
                0
            }
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

fn print_plot_summary(summary: &PlotSummary, options: &PlotOptions) {
    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    eprintln!("  \x1b[32m✓ Plotted:\x1b[0m {}/{}", summary.plotted, summary.found);
    if summary.failed() > 0 {
        eprintln!("  \x1b[31m✗ Failed:\x1b[0m  {}", summary.failed());
        for failure in &summary.failures {
            eprintln!("    \x1b[90m{}: {}\x1b[0m", failure.path.display(), failure.message);
        }
    }
    if summary.interrupted {
        eprintln!("  \x1b[33mStopped by user\x1b[0m");
    }
    if options.save && !summary.outputs.is_empty() {
        eprintln!("\n\x1b[32mImages saved to: {}\x1b[0m", options.output_dir.display());
    }
}

fn run_report(root: PathBuf, output: PathBuf, open: bool) -> i32 {
    match report::generate(&root, &output) {
        Ok(_) => {
            if open {
                if let Err(e) = open::that(&output) {
                    warn!("Failed to open report: {}", e);
                }
            }
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}
