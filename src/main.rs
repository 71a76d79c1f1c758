//! testlog: builds a sample hardware test report

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use testlog::config::{load_config, Config};
use testlog::display::EvcxrDisplay;
use testlog::error::CapabilityUnavailable;
use testlog::image::{ImageFormat, PlotSource};
use testlog::reporter::{ConsoleReporter, JsonReporter};
use testlog::{ReportBuilder, SectionStatus, SpecColumns, TableSpec, Theme};

/// testlog: generate a self-contained HTML test report
#[derive(Parser, Debug)]
#[command(name = "testlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to write the report (relative paths use the configured outputDir)
    #[arg(long, short, default_value = "test_report.html")]
    output: PathBuf,

    /// Path to config file (default: search .testlogrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long, short)]
    json: bool,

    /// List every section and table in the summary, and log at debug level
    #[arg(long, short)]
    verbose: bool,

    /// Also emit the report as rich notebook output on stdout
    #[arg(long, conflicts_with = "json")]
    notebook: bool,

    /// Exit 1 when any section or measurement failed
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::default()
        .filter_level(level)
        .parse_env(env_logger::Env::default().filter_or("TESTLOG_LOG", level.as_str()))
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let work_dir = std::env::current_dir().context("Failed to read current directory")?;
    let mut config = load_config(&work_dir, args.config.as_deref())?;
    config.merge_from(sample_defaults());
    let options = config.options();

    if let Some(dir) = &options.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let report = build_sample_report(ReportBuilder::with_options(options))?;
    let path = report
        .save(&args.output)
        .with_context(|| format!("Failed to save report to {}", args.output.display()))?;

    if args.notebook {
        report.display(&mut EvcxrDisplay::stdout());
    }

    let summary = report.summary();
    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&summary));
    } else {
        let mut console = ConsoleReporter::new();
        if args.verbose {
            console = console.verbose();
        }
        console.report(&summary);
        println!("\n{} {}", "Saved".green().bold(), path.display());
    }

    if args.check && !summary.is_passing() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Values used when no config sets them
fn sample_defaults() -> Config {
    Config {
        title: Some("Voyager 1088 - PIA2 PreTest".to_string()),
        sticky_header: Some(true),
        version: Some("0.1.2".to_string()),
        collapsible: Some(true),
        ..Config::default()
    }
}

fn build_sample_report(mut report: ReportBuilder) -> Result<ReportBuilder> {
    report
        .add_header_item("Serial Number", "SN-2024-001234")
        .add_header_item("Test Date", Local::now().format("%B %d, %Y %I:%M %p").to_string())
        .add_header_item("Operator", "John Doe")
        .add_header_item("Test Station", "Station 3");

    // Progress is pushed into the section while later lines are appended
    let power = report.open_section("Power Supply Tests", true);
    report
        .add_line("Testing 3.3V rail...")
        .add_line("Measured voltage: 3.31V (within tolerance)");
    report.set_section_progress(power, 33)?;
    report
        .add_line("Testing 5V rail...")
        .add_line("Measured voltage: 5.02V (within tolerance)");
    report.set_section_progress(power, 66)?;
    report
        .add_line_break()
        .add_line("Testing 12V rail...")
        .add_line("Measured voltage: 12.01V (within tolerance)");
    report.close_section(Some(SectionStatus::Pass))?;

    report.open_section("Voltage Measurements", true);
    report.open_table(
        TableSpec::new(["Rail", "Nominal (V)", "Tolerance (V)", "Measured (V)"])
            .title("Power Rail Test Results")
            .category("fail")
            .check(
                SpecColumns::measured("Measured (V)")
                    .nominal_tolerance("Nominal (V)", "Tolerance (V)"),
            ),
    )?;
    report.append_row(["3.3V", "3.30", "0.10", "3.31"])?;
    report.append_row(["5.0V", "5.00", "0.25", "5.02"])?;
    report.append_row(["12.0V", "12.00", "0.50", "11.20"])?;
    report.append_row(["-5.0V", "-5.00", "0.25", "-5.01"])?;
    report.close_section(Some(SectionStatus::Fail))?;

    report.open_section("Current Measurements", true);
    report.open_table(
        TableSpec::new(["Test Point", "Lower Spec (A)", "Upper Spec (A)", "Measured (A)"])
            .title("Current Consumption Tests")
            .category("pass")
            .check(
                SpecColumns::measured("Measured (A)").limits("Lower Spec (A)", "Upper Spec (A)"),
            )
            .row(["Load 1", "0.90", "1.10", "0.98"])
            .row(["Load 2", "1.80", "2.20", "2.05"])
            .row(["Load 3", "0.45", "0.55", "0.51"]),
    )?;
    report.close_section(Some(SectionStatus::Warning))?;

    report.open_section("Communication Tests", true);
    report
        .add_line("I2C bus scan: 4 devices found")
        .add_line("SPI flash ID: 0xEF4018")
        .add_line("UART loopback test: MARGINAL");
    report.close_section(Some(SectionStatus::Pass))?;

    report.open_section_with_category("Temperature Tests", false, "temperature");
    report.open_table(
        TableSpec::new(["Sensor", "Lower Limit (°C)", "Upper Limit (°C)", "Measured (°C)"])
            .title("Temperature Readings")
            .category("temperature")
            .check(
                SpecColumns::measured("Measured (°C)")
                    .limits("Lower Limit (°C)", "Upper Limit (°C)"),
            )
            .row(["CPU", "20", "85", "72"])
            .row(["Ambient", "15", "40", "28"])
            .row(["Power Supply", "20", "70", "95"]),
    )?;
    report.close_section(Some(SectionStatus::Data))?;

    report.open_section("Data Visualization", true);
    let ripple = Trace::new((0..=64).map(|i| {
        let t = i as f64 / 64.0;
        (t, 0.5 + 0.35 * (t * std::f64::consts::TAU * 3.0).sin() * (-1.5 * t).exp())
    }));
    report.add_plot_from(&ripple, Some("Figure 1: 12V rail ripple after load step"));
    let warmup = Trace::new([(0.0, 0.20), (0.25, 0.55), (0.5, 0.72), (0.75, 0.80), (1.0, 0.82)]);
    report.add_plot_from(&warmup, Some("Figure 2: CPU temperature during warm-up"));
    report.close_section(Some(SectionStatus::Pass))?;

    Ok(report)
}

/// A polyline drawn as SVG, one rendering per theme
struct Trace {
    points: Vec<(f64, f64)>,
}

impl Trace {
    const WIDTH: f64 = 480.0;
    const HEIGHT: f64 = 200.0;

    /// Points are in the unit square; y grows upwards
    fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }
}

impl PlotSource for Trace {
    fn format(&self) -> ImageFormat {
        ImageFormat::Svg
    }

    fn render(&self, theme: Theme) -> Result<Vec<u8>, CapabilityUnavailable> {
        if self.points.len() < 2 {
            return Err(CapabilityUnavailable::new("Plot data"));
        }
        let (background, grid, stroke) = match theme {
            Theme::Light => ("#ffffff", "#dee2e6", "#3498db"),
            Theme::Dark => ("#1e1e1e", "#404040", "#5dade2"),
        };
        let mut path = String::new();
        for (i, (x, y)) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(
                path,
                "{cmd}{:.1},{:.1} ",
                x * Self::WIDTH,
                (1.0 - y) * Self::HEIGHT
            );
        }
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
             <rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>\
             <line x1=\"0\" y1=\"{mid}\" x2=\"{w}\" y2=\"{mid}\" stroke=\"{grid}\" stroke-dasharray=\"4 4\"/>\
             <path d=\"{path}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2\"/></svg>",
            w = Self::WIDTH,
            h = Self::HEIGHT,
            mid = Self::HEIGHT / 2.0,
            path = path.trim_end(),
        );
        Ok(svg.into_bytes())
    }
}
