use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wellness_trends::export::{self, DEFAULT_CSV_NAME};
use wellness_trends::{report, trend};
use wellness_trends::{Dashboard, DisplayState, MonthKey, Settings, WellnessFetcher};

#[derive(Parser)]
#[command(name = "wellness-trends")]
#[command(about = "Monthly wellness trends for schools", long_about = None)]
struct Cli {
    /// Settings file (TOML); WELLNESS_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WindowArgs {
    #[arg(long)]
    school: String,
    /// Months per window; defaults to the configured value
    #[arg(long)]
    months_back: Option<u32>,
    /// Windows to step back from the latest one
    #[arg(long, default_value_t = 0)]
    back: u32,
    /// Windows to step forward after stepping back
    #[arg(long, default_value_t = 0)]
    forward: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// List schools known to the backend
    Schools,
    /// Print the month x dimension matrix as JSON
    Trend {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Summarize one month of the window
    Summary {
        #[command(flatten)]
        window: WindowArgs,
        /// Month index within the window; defaults to the newest
        #[arg(long)]
        month: Option<usize>,
    },
    /// Write the matrix as CSV
    Export {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, default_value = DEFAULT_CSV_NAME)]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let source = settings
        .source()
        .context("failed to build the wellness backend client")?;
    let fetcher = WellnessFetcher::new(Arc::new(source));

    match cli.command {
        Commands::Schools => {
            let schools = fetcher
                .schools()
                .await
                .context("failed to list schools")?;
            if schools.is_empty() {
                println!("No schools found.");
            }
            for school in schools {
                println!("{}\t{}", school.id, school.name);
            }
        }
        Commands::Trend { window } => {
            let dashboard = open_dashboard(&fetcher, &settings, &window).await;
            match dashboard.ready_snapshot() {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("No wellness data for this window."),
            }
        }
        Commands::Summary { window, month } => {
            let mut dashboard = open_dashboard(&fetcher, &settings, &window).await;
            if dashboard.state() == DisplayState::NoData {
                println!("No wellness data for this window.");
                return Ok(());
            }

            let index = match month {
                Some(index) => dashboard.select_existing_month(index).with_context(|| {
                    format!(
                        "month index {index} is outside the window (0..{})",
                        dashboard.rows().len()
                    )
                })?,
                None => dashboard.selected(),
            };
            let row = &dashboard.rows()[index];
            let summary = dashboard
                .summary(index)
                .context("selected month is outside the window")?;

            println!("Overall completion: {}% (as of {})", summary.overall, row.month.label());
            println!(
                "Weakest dimension: {} ({}%)",
                summary.weakest.dimension,
                trend::round_half_up(summary.weakest.value)
            );
            for slice in dashboard.breakdown(index).unwrap_or_default() {
                println!("- {} {}: {}%", slice.color, slice.label, slice.value);
            }
            if let Some(suggestion) = trend::focus_suggestion(&summary) {
                println!("{suggestion}");
            }
        }
        Commands::Export { window, out } => {
            let dashboard = open_dashboard(&fetcher, &settings, &window).await;
            if dashboard.state() == DisplayState::NoData {
                println!("No wellness data for this window.");
                return Ok(());
            }
            let written = export::write_csv_file(&out, dashboard.rows(), dashboard.dimensions())?;
            println!("Exported {written} months to {}.", out.display());
        }
        Commands::Report { window, out } => {
            let dashboard = open_dashboard(&fetcher, &settings, &window).await;
            let shown = dashboard
                .window()
                .context("no window was loaded for the report")?;
            let report = report::build_report(
                dashboard.school_id(),
                &shown,
                dashboard.rows(),
                dashboard.dimensions(),
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Navigates to the requested window and loads only that one; intermediate
/// steps are superseded before they are fetched.
async fn open_dashboard(
    fetcher: &WellnessFetcher,
    settings: &Settings,
    args: &WindowArgs,
) -> Dashboard {
    let months_back = args.months_back.unwrap_or(settings.months_back);
    let mut dashboard = Dashboard::new(&args.school, months_back, MonthKey::current());

    let mut request = dashboard.request_current();
    for _ in 0..args.back {
        request = dashboard.show_previous();
    }
    for _ in 0..args.forward {
        request = dashboard.show_next();
    }

    let window = request.window();
    info!(
        school_id = %args.school,
        start = %window.start,
        end = %window.end,
        "loading wellness window"
    );
    let loaded = request.resolve(fetcher).await;
    dashboard.commit(loaded);
    dashboard
}
