use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use datasweep::chart;
use datasweep::pipeline::{
    CleaningOp, DEFAULT_OUTLIER_THRESHOLD, DEFAULT_PREVIEW_ROWS, ExportFormat, OpPipeline,
    Session, UploadedFile, missing_report, preview, summarize,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "datasweep", about = "Tabular file cleaning and conversion tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the first rows of each file
    Preview {
        /// Files to preview (CSV or XLSX)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of rows to show
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },
    /// Print summary statistics and missing-value counts
    Summary {
        /// Files to summarize (CSV or XLSX)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also print the numeric correlation matrix
        #[arg(long)]
        correlations: bool,
    },
    /// Apply cleaning operations to a file and save the result
    Clean {
        /// Input file (CSV or XLSX)
        file: PathBuf,

        /// Output path. Defaults to the input name with a `cleaned_` prefix.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a JSON operation pipeline; overrides the cleaning flags
        #[arg(long)]
        ops: Option<PathBuf>,

        /// Re-type these columns as numeric before the other steps
        #[arg(long, value_name = "COLUMN")]
        coerce: Vec<String>,

        /// Drop exact duplicate rows
        #[arg(long)]
        dedupe: bool,

        /// Fill missing numeric values with the column mean
        #[arg(long)]
        fill_missing: bool,

        /// Drop rows holding numeric outliers
        #[arg(long)]
        drop_outliers: bool,

        /// Z-score threshold for outlier removal
        #[arg(long, default_value_t = DEFAULT_OUTLIER_THRESHOLD)]
        threshold: f64,
    },
    /// Convert a file to another tabular format
    Convert {
        /// Input file (CSV or XLSX)
        file: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: TargetFormat,

        /// Output path. Defaults to the input name with the new extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetFormat {
    Csv,
    Xlsx,
}

impl TargetFormat {
    fn as_export(self) -> ExportFormat {
        match self {
            Self::Csv => ExportFormat::Csv,
            Self::Xlsx => ExportFormat::Xlsx,
        }
    }
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Preview { files, rows } => handle_preview(&files, rows),
        Commands::Summary {
            files,
            correlations,
        } => handle_summary(&files, correlations),
        Commands::Clean {
            file,
            output,
            ops,
            coerce,
            dedupe,
            fill_missing,
            drop_outliers,
            threshold,
        } => handle_clean(
            &file,
            output,
            ops,
            coerce,
            dedupe,
            fill_missing,
            drop_outliers,
            threshold,
        ),
        Commands::Convert { file, to, output } => handle_convert(&file, to.as_export(), output),
    }
}

fn handle_preview(files: &[PathBuf], rows: usize) -> Result<()> {
    let uploads = load_uploads(files)?;
    let mut session = Session::new();
    for (name, outcome) in session.ingest_all(&uploads) {
        match outcome {
            Ok(index) => {
                let slot = session.slot(index)?;
                println!("{} ({} bytes)", slot.file_name, slot.size_bytes);
                println!("{}", preview(&slot.df, rows));
            }
            Err(e) => println!("Skipping {name}: {e}"),
        }
    }
    Ok(())
}

fn handle_summary(files: &[PathBuf], correlations: bool) -> Result<()> {
    let uploads = load_uploads(files)?;
    let mut session = Session::new();
    for (name, outcome) in session.ingest_all(&uploads) {
        if let Err(e) = outcome {
            println!("Skipping {name}: {e}");
        }
    }
    for slot in session.iter() {
        println!(
            "{}: {} rows, {} columns",
            slot.file_name,
            slot.df.height(),
            slot.df.width()
        );
        print_summary(&slot.df)?;
        if correlations {
            print_correlations(&slot.df)?;
        }
    }
    Ok(())
}

#[expect(clippy::too_many_arguments)]
fn handle_clean(
    file: &Path,
    output: Option<PathBuf>,
    ops_path: Option<PathBuf>,
    coerce: Vec<String>,
    dedupe: bool,
    fill_missing: bool,
    drop_outliers: bool,
    threshold: f64,
) -> Result<()> {
    let upload = UploadedFile::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut session = Session::new();
    let index = session.ingest(&upload)?;

    let pipeline = if let Some(path) = ops_path {
        println!("Loading operations from {}...", path.display());
        load_ops(&path)?
    } else {
        let mut pipeline = OpPipeline::empty();
        for column in coerce {
            pipeline.add(CleaningOp::CoerceToNumeric { column });
        }
        if dedupe {
            pipeline.add(CleaningOp::RemoveDuplicates);
        }
        if fill_missing {
            pipeline.add(CleaningOp::FillMissingNumeric);
        }
        if drop_outliers {
            pipeline.add(CleaningOp::RemoveOutliers {
                threshold_sigma: threshold,
            });
        }
        pipeline
    };

    if pipeline.is_empty() {
        anyhow::bail!("No cleaning operations requested; pass cleaning flags or --ops.");
    }

    for report in session.apply_pipeline(index, &pipeline)? {
        println!(
            "{}: {} -> {} rows",
            report.op, report.rows_before, report.rows_after
        );
    }

    let output_path = output.unwrap_or_else(|| default_clean_output(file));
    let format = format_for(&output_path)?;
    let result = session.export(index, format)?;
    std::fs::write(&output_path, &result.bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    let slot = session.slot(index)?;
    println!(
        "Saved {} rows to {}",
        slot.df.height(),
        output_path.display()
    );
    Ok(())
}

fn handle_convert(file: &Path, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let upload = UploadedFile::from_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut session = Session::new();
    let index = session.ingest(&upload)?;

    let result = session.export(index, format)?;
    let output_path = output.unwrap_or_else(|| file.with_file_name(&result.file_name));
    std::fs::write(&output_path, &result.bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("Converted {} to {}", file.display(), output_path.display());
    Ok(())
}

fn load_uploads(files: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    files
        .iter()
        .map(|path| {
            UploadedFile::from_path(path)
                .with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect()
}

fn load_ops(path: &Path) -> Result<OpPipeline> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read operations file: {}", path.display()))?;
    OpPipeline::from_json(&content).context("Failed to parse operations JSON")
}

fn print_summary(df: &DataFrame) -> Result<()> {
    let summaries = summarize(df)?;
    if summaries.is_empty() {
        println!("  No numeric columns.");
    }
    for s in summaries {
        println!(
            "  {}: count={} mean={} std={} min={} q1={} median={} q3={} max={}",
            s.column,
            s.count,
            fmt_stat(s.mean),
            fmt_stat(s.std_dev),
            fmt_stat(s.min),
            fmt_stat(s.q1),
            fmt_stat(s.median),
            fmt_stat(s.q3),
            fmt_stat(s.max),
        );
    }

    let missing = missing_report(df);
    if !missing.is_empty() {
        println!("  Missing values:");
        for entry in missing {
            println!("    {}: {}", entry.column, entry.null_count);
        }
    }
    Ok(())
}

fn print_correlations(df: &DataFrame) -> Result<()> {
    match chart::correlation_matrix(df)? {
        Some(matrix) => {
            println!("  Correlations ({}):", matrix.columns.join(", "));
            for (name, row) in matrix.columns.iter().zip(&matrix.data) {
                let cells: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
                println!("    {name}: [{}]", cells.join(", "));
            }
        }
        None => println!("  Correlations need at least two numeric columns."),
    }
    Ok(())
}

fn fmt_stat(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}

fn default_clean_output(input: &Path) -> PathBuf {
    let name = input.file_name().map_or_else(
        || "cleaned.csv".to_string(),
        |n| format!("cleaned_{}", n.to_string_lossy()),
    );
    input.with_file_name(name)
}

fn format_for(path: &Path) -> Result<ExportFormat> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    ExportFormat::from_extension(ext).ok_or_else(|| {
        anyhow::anyhow!(
            "Cannot infer an output format from '{}'; use a .csv or .xlsx path",
            path.display()
        )
    })
}
