//! multivar-chapter - render the multivariate graphs chapter.
//!
//! Run: `multivar-chapter render --out build/chapter --format svg`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};

use trueno_multivar::chapter;
use trueno_multivar::config::{ChapterConfig, ImageFormat};
use trueno_multivar::datasets;
use trueno_multivar::summary::group_summary;

/// Multivariate graphs chapter renderer
#[derive(Parser, Debug)]
#[command(name = "multivar-chapter")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render the multivariate graphs chapter and explore its datasets")]
#[command(long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every figure and chapter.md
    Render {
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Figure format
        #[arg(short, long)]
        format: Option<FormatArg>,

        /// Figure width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Figure height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Config file path (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render only the figure with this slug
        #[arg(long)]
        only: Option<String>,

        /// Directory with Salaries.csv and gapminder.csv exported from R
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// List bundled datasets
    Datasets,
    /// Print grouped summary statistics
    Summarize {
        /// Bundled dataset name
        #[arg(short, long, default_value = "Salaries", conflicts_with = "csv")]
        dataset: String,

        /// Summarize a CSV file instead of a bundled dataset
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Grouping columns, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        by: Vec<String>,

        /// Numeric column to summarize
        #[arg(long, default_value = "salary")]
        value: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Png,
    Svg,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Svg => ImageFormat::Svg,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    match cli.verbose {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Info);
        }
        2 => {
            logger.filter_level(LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(LevelFilter::Trace);
        }
    }
    logger.init();

    match cli.command {
        Command::Render { out, format, width, height, config, only, data_dir } => {
            let mut settings = load_config(config)?;
            if let Some(out) = out {
                settings.out_dir = out;
            }
            if let Some(format) = format {
                settings.format = format.into();
            }
            if let Some(width) = width {
                settings.width = width;
            }
            if let Some(height) = height {
                settings.height = height;
            }
            if let Some(dir) = data_dir {
                settings.data_dir = Some(dir);
            }
            render(&settings, only.as_deref())
        }
        Command::Datasets => {
            for info in datasets::available() {
                let frame = datasets::load(info.name)
                    .with_context(|| format!("failed to load dataset {}", info.name))?;
                println!(
                    "{:<12} {:>5} rows {:>3} cols  {} ({})",
                    info.name,
                    frame.nrow(),
                    frame.ncol(),
                    info.description,
                    info.package
                );
            }
            Ok(())
        }
        Command::Summarize { dataset, csv, by, value } => {
            let frame = match csv {
                Some(path) => datasets::load_csv(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    datasets::load(&dataset).with_context(|| format!("failed to load {dataset}"))?
                }
            };
            let by: Vec<&str> = by.iter().map(String::as_str).collect();
            let table = group_summary(&frame, &by, &value)
                .with_context(|| format!("failed to summarize {value} by {}", by.join(", ")))?;
            print!("{table}");
            println!("{} groups, {} rows", table.len(), table.total());
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ChapterConfig> {
    match path {
        Some(path) => ChapterConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let settings = ChapterConfig::default_path()
                .map(ChapterConfig::load_or_default)
                .unwrap_or_default();
            debug!("using config {settings:?}");
            Ok(settings)
        }
    }
}

fn render(settings: &ChapterConfig, only: Option<&str>) -> Result<()> {
    match only {
        Some(slug) => {
            let Some(lesson) = chapter::lessons().into_iter().find(|l| l.slug == slug) else {
                let known: Vec<&str> = chapter::lessons().iter().map(|l| l.slug).collect();
                bail!("unknown figure '{slug}' (available: {})", known.join(", "));
            };
            std::fs::create_dir_all(&settings.out_dir)
                .with_context(|| format!("failed to create {}", settings.out_dir.display()))?;
            let path = chapter::render_figure(&lesson, settings)
                .with_context(|| format!("failed to render {slug}"))?;
            println!("{}", path.display());
        }
        None => {
            let out_dir = settings.out_dir.display();
            let report = chapter::render(settings)
                .with_context(|| format!("failed to render chapter into {out_dir}"))?;
            println!("{} figures, {}", report.figures.len(), report.document.display());
        }
    }
    Ok(())
}
