use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::debug;

use pool_report::output::DirectorySaveTarget;
use pool_report::{
    FixedAdvance, FsFetcher, LogoLoader, PdfWriter, PoolRecord, ReportBuilder, ReportConfig,
    ReportService,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Builds pool service reports from JSON records.
///
/// Fonts must be present under `assets/fonts` next to the binary or the crate,
/// or provided via the `POOL_REPORT_FONTS_DIR` environment variable.
#[derive(Parser)]
#[command(name = "pool-report", version, about = "Generate pool service reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a record to PDF and save it as `pool_<owner>_<date>.pdf`.
    Save {
        /// Record JSON as produced by the storage layer.
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        /// Directory receiving the PDF.
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Report configuration JSON (page, company, footer, logo path).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// URL or directory the logo path is resolved against.
        #[arg(long, value_name = "BASE")]
        logo_base: Option<String>,

        /// Date used in the file name instead of today (UTC).
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },

    /// Print the document's drawing instructions as JSON.
    Inspect {
        #[arg(value_name = "RECORD")]
        record: PathBuf,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Measure text with a constant advance instead of the bundled fonts.
        #[arg(long)]
        fixed_metrics: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Save {
            record,
            output,
            config,
            logo_base,
            date,
        } => save(&record, &output, config.as_deref(), logo_base, date),
        Commands::Inspect {
            record,
            config,
            fixed_metrics,
        } => inspect(&record, config.as_deref(), fixed_metrics),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn read_record(path: &Path) -> CliResult<PoolRecord> {
    let json = fs::read_to_string(path)
        .map_err(|err| format!("failed to read record {}: {err}", path.display()))?;
    Ok(PoolRecord::from_json(&json)?)
}

fn read_config(path: Option<&Path>) -> CliResult<ReportConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
            Ok(ReportConfig::from_json(&json)?)
        }
        None => Ok(ReportConfig::default()),
    }
}

fn logo_loader(base: String) -> LogoLoader {
    #[cfg(feature = "http")]
    if base.starts_with("http://") || base.starts_with("https://") {
        return LogoLoader::new(base, pool_report::HttpFetcher);
    }
    LogoLoader::new(base, FsFetcher)
}

fn save(
    record_path: &Path,
    output: &Path,
    config: Option<&Path>,
    logo_base: Option<String>,
    date: Option<NaiveDate>,
) -> CliResult<()> {
    let record = read_record(record_path)?;
    let config = read_config(config)?;
    let writer = PdfWriter::from_default_fonts()?;
    let builder = ReportBuilder::new(writer.metrics()).with_config(config);

    let mut service = ReportService::new(builder, writer);
    if let Some(base) = logo_base {
        debug!("resolving logo against {base}");
        service = service.with_logo_loader(logo_loader(base));
    }

    let target = DirectorySaveTarget::new(output);
    let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let file_name = service.save_dated(&record, &target, date)?;
    println!("{}", output.join(file_name).display());
    Ok(())
}

fn inspect(record_path: &Path, config: Option<&Path>, fixed_metrics: bool) -> CliResult<()> {
    let record = read_record(record_path)?;
    let config = read_config(config)?;

    let document = if fixed_metrics {
        ReportBuilder::new(FixedAdvance::default())
            .with_config(config)
            .build(&record, None)?
    } else {
        let writer = PdfWriter::from_default_fonts()?;
        ReportBuilder::new(writer.metrics())
            .with_config(config)
            .build(&record, None)?
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
