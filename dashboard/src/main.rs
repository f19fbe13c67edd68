//! Titanic EDA CLI
//!
//! ```bash
//! titanic-eda serve                       # Start the dashboard (port 3000)
//! titanic-eda report survival             # Print a summary table as JSON
//! titanic-eda chart families -o fig.json  # Write a Plotly figure
//! titanic-eda inspect                     # Show what was loaded
//! ```
//!
//! The manifest is fetched from its published URL unless `--url`, `--file`
//! or the `TITANIC_DATASET_*` variables say otherwise.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use titanic_eda::api::logs::{log_error, log_success, log_warning};
use titanic_eda::error::DashboardResult;
use titanic_eda::{
    demographic_chart, family_chart, family_groups, family_size, last_names, server,
    survival_demographics, ChartRenderer, DashboardConfig, Dataset, PlotlyRenderer,
};

#[derive(Parser)]
#[command(name = "titanic-eda")]
#[command(about = "Explore survival and family sizes on the Titanic", long_about = None)]
struct Cli {
    /// Fetch the manifest from this URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Read the manifest from a local CSV file instead
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve {
        /// Port to listen on (default: 3000 or TITANIC_EDA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a summary table as JSON
    Report {
        table: Table,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a chart as Plotly figure JSON
    Chart {
        chart: ChartName,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show row count, columns and detected format of the manifest
    Inspect,
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Survival,
    FamilyGroups,
    FamilySize,
    LastNames,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartName {
    Demographic,
    Families,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = DashboardConfig::from_env().with_overrides(cli.url, cli.file);

    let result = run(cli.command, config).await;

    if let Err(e) = result {
        log_error(e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: DashboardConfig) -> DashboardResult<()> {
    let dataset = Arc::new(Dataset::load(&config.source).await?);

    match command {
        Commands::Serve { port } => server::serve(dataset, port.unwrap_or(config.port)).await,
        Commands::Report { table, output } => cmd_report(&dataset, table, output.as_deref()),
        Commands::Chart { chart, output } => cmd_chart(&dataset, chart, output.as_deref()),
        Commands::Inspect => cmd_inspect(&dataset),
    }
}

fn cmd_report(dataset: &Dataset, table: Table, output: Option<&Path>) -> DashboardResult<()> {
    match table {
        Table::Survival => {
            let rows = survival_demographics(dataset);
            let unknown: usize = rows
                .iter()
                .filter(|r| r.age_group.is_none())
                .map(|r| r.group_size)
                .sum();
            if unknown > 0 {
                log_warning(format!("{} passengers have no age group", unknown));
            }
            write_json(&rows, output)
        }
        Table::FamilyGroups => write_json(&family_groups(dataset), output),
        Table::FamilySize => write_json(&family_size(dataset), output),
        Table::LastNames => write_json(&last_names(dataset), output),
    }
}

fn cmd_chart(dataset: &Dataset, chart: ChartName, output: Option<&Path>) -> DashboardResult<()> {
    let spec = match chart {
        ChartName::Demographic => demographic_chart(&survival_demographics(dataset)),
        ChartName::Families => family_chart(&last_names(dataset), &family_size(dataset)),
    };

    let figure = PlotlyRenderer.render(&spec)?;
    write_json(&figure, output)
}

fn cmd_inspect(dataset: &Dataset) -> DashboardResult<()> {
    let info = dataset.info();
    println!("Source:     {}", info.origin);
    println!("Encoding:   {}", info.encoding);
    println!("Delimiter:  '{}'", format_delimiter(info.delimiter));
    println!("Passengers: {}", info.row_count);
    println!("Columns:    {}", info.headers.join(", "));

    let missing_age = dataset.passengers().iter().filter(|p| p.age.is_none()).count();
    println!("No age:     {}", missing_age);
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> DashboardResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => {
            fs::write(p, json)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}
