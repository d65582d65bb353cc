use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use drawio_erd::config::{LayoutConfig, LayoutStrategy};
use drawio_erd::filter::{NameFilters, apply_filters};
use drawio_erd::source::{CsvDataSource, MetadataCsvSource, SchemaSource};
use drawio_erd::source::csv_data::DEFAULT_SAMPLE_SIZE;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

/// Generate draw.io ERD diagrams from schema metadata.
#[derive(Debug, Parser)]
#[command(version)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a metadata CSV (Catalog, Database, Table, Column, Type, ...)
    Metadata { input: PathBuf, output: PathBuf },
    /// Infer a single table from a raw CSV data file
    CsvData {
        input: PathBuf,
        output: PathBuf,
        /// Number of rows to sample for data type inference
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,
    },
    /// Read the catalog of a live PostgreSQL database (MySQL is not supported).
    ///
    /// Credentials come from PGUSER and PGPASSWORD, with PGHOST, PGPORT and
    /// PGDATABASE optional. Values missing from the environment are read
    /// from a .env file in the working directory.
    #[cfg(feature = "postgres")]
    Catalog { output: PathBuf },
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Glob matched against Catalog.Database.Table
    #[arg(long, global = true)]
    matching: Option<String>,
    /// Glob matched against database names
    #[arg(long, global = true)]
    database_matching: Option<String>,
    /// Glob matched against table names
    #[arg(long, global = true)]
    table_matching: Option<String>,
}

#[derive(Debug, Args)]
struct LayoutArgs {
    /// JSON layout config file. Keys it omits take the preset of the
    /// strategy it names; the flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Layout strategy: flat or structured
    #[arg(long, global = true, value_parser = parse_strategy)]
    layout: Option<LayoutStrategy>,
    #[arg(long, global = true)]
    table_width: Option<f64>,
    #[arg(long, global = true)]
    table_gap: Option<f64>,
    #[arg(long, global = true)]
    column_font_size: Option<u32>,
    #[arg(long, global = true)]
    title_font_size: Option<u32>,
    /// Widen tables whose labels do not fit
    #[arg(long, global = true)]
    fit_to_content: bool,
}

fn parse_strategy(s: &str) -> Result<LayoutStrategy, String> {
    LayoutStrategy::from_str(s).ok_or_else(|| format!("unknown layout '{s}' (flat, structured)"))
}

impl LayoutArgs {
    fn resolve(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::load(path)?,
            None => LayoutConfig::for_strategy(self.layout.unwrap_or_default()),
        };

        if let Some(strategy) = self.layout {
            config.strategy = strategy;
        }
        if let Some(width) = self.table_width {
            config.table_width = width;
        }
        if let Some(gap) = self.table_gap {
            config.table_gap = gap;
        }
        if let Some(size) = self.column_font_size {
            config.column_font_size = size;
        }
        if let Some(size) = self.title_font_size {
            config.title_font_size = size;
        }
        if self.fit_to_content {
            config.fit_to_content = true;
        }
        Ok(config)
    }
}

impl FilterArgs {
    fn to_filters(&self) -> NameFilters {
        NameFilters {
            qualified: self.matching.clone(),
            database: self.database_matching.clone(),
            table: self.table_matching.clone(),
        }
    }
}

fn run(args: CommandLine) -> Result<PathBuf> {
    let config = args.layout.resolve().context("Failed to resolve layout config")?;

    let (source, output): (Box<dyn SchemaSource>, PathBuf) = match args.command {
        Command::Metadata { input, output } => (Box::new(MetadataCsvSource::new(input)), output),
        Command::CsvData {
            input,
            output,
            sample_size,
        } => (
            Box::new(CsvDataSource::new(input).with_sample_size(sample_size)),
            output,
        ),
        #[cfg(feature = "postgres")]
        Command::Catalog { output } => {
            use drawio_erd::source::{CatalogConfig, CatalogSource};
            let catalog = CatalogConfig::from_env().context("Database credentials are not set")?;
            (Box::new(CatalogSource::new(catalog)), output)
        }
    };

    tracing::info!("Parsing the schema source...");
    let table = source.load().context("Failed to load schema")?;
    if table.is_empty() {
        tracing::warn!("The schema source returned no columns");
    }

    let filters = args.filters.to_filters();
    let table = if filters.is_empty() {
        table
    } else {
        apply_filters(table, &filters)?
    };

    tracing::info!("Generating the ERD diagram...");
    let xml = drawio_erd::generate(&table, &config)?;

    tracing::info!("Saving the ERD diagram to the output file...");
    write_output(&output, &xml)?;
    Ok(output)
}

fn write_output(path: &Path, xml: &str) -> Result<()> {
    std::fs::write(path, xml).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> ExitCode {
    let args = CommandLine::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::INFO } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(output) => {
            println!(
                "ERD diagram has been generated and saved to {}",
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}
