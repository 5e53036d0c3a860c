extern crate log;
extern crate pretty_env_logger;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use ndscan::config::{CorpusKind, DbscanConfig, Metric, OutputFormat, Precision};
use ndscan::utils::{ContextTimer, LogLevel};
use ndscan::{io, Dbscan, Error, Float, Result};

enum ExitValues {
    Success = 0,
    Help = 1,
    BadArguments = 2,
    IOError = 3,
    ResourceExhausted = 4,
}

impl From<ExitValues> for ExitCode {
    fn from(value: ExitValues) -> Self {
        ExitCode::from(value as u8)
    }
}

/// Cluster the vectors of a CSV file with DBSCAN and print one cluster id
/// per row (-1 for rows that belong to no cluster).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file, command line flags take precedence over it
    #[arg(short, long)]
    config: Option<String>,
    /// Write the default config to the `--config` path and exit
    #[arg(long, action)]
    write_template: bool,
    /// Neighborhood radius (euclidean) or similarity threshold (cosine)
    #[arg(long)]
    eps: Option<f64>,
    /// Minimum number of neighbors, the point itself excluded
    #[arg(long)]
    min_pts: Option<usize>,
    #[arg(long, value_enum)]
    corpus: Option<CorpusKind>,
    #[arg(long, value_enum)]
    metric: Option<Metric>,
    #[arg(long, value_enum)]
    precision: Option<Precision>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Output file, stdout when not given
    #[arg(short, long)]
    output: Option<String>,
    /// Also print the seed-time noise flag of every row
    #[arg(long, action)]
    include_noise: bool,
    #[arg(long, action)]
    progress: bool,
    /// CSV file with one vector per line
    #[arg(required_unless_present = "write_template")]
    input: Option<String>,
}

impl Args {
    fn merge_into(&self, mut config: DbscanConfig) -> DbscanConfig {
        if let Some(eps) = self.eps {
            config.eps = eps;
        }
        if let Some(min_pts) = self.min_pts {
            config.min_pts = min_pts;
        }
        if let Some(corpus) = self.corpus {
            config.corpus = corpus;
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(ref output) = self.output {
            config.output.path = Some(output.clone());
        }
        config.output.include_noise |= self.include_noise;
        config.progress |= self.progress;
        config
    }
}

fn exit_value(err: &Error) -> ExitValues {
    match err {
        Error::InvalidConfiguration(_)
        | Error::InvalidParameter { .. }
        | Error::TomlDe(_)
        | Error::TomlSer(_) => ExitValues::BadArguments,
        Error::Allocation(_) => ExitValues::ResourceExhausted,
        Error::Io(_)
        | Error::Csv(_)
        | Error::Json(_)
        | Error::Parse { .. }
        | Error::DimensionMismatch { .. }
        | Error::EmptyInput => ExitValues::IOError,
    }
}

fn write_template(path: &str) -> Result<()> {
    if Path::new(path).exists() {
        return Err(Error::InvalidParameter {
            name: "config",
            message: format!("File already exists: {}", path),
        });
    }
    let config_str = DbscanConfig::default().to_toml_string()?;
    std::fs::write(path, config_str)?;
    println!("Wrote default config to {}", path);
    Ok(())
}

fn cluster<T: Float>(config: &DbscanConfig, input: &str) -> Result<()> {
    let mut timer = ContextTimer::new("ndscan", true, LogLevel::INFO);

    let mut sub_timer = timer.start_sub_timer("read_corpus");
    let corpus = io::read_corpus::<T, _>(input)?;
    sub_timer.stop(true);

    let engine = Dbscan::from_buffer(
        &corpus.data,
        corpus.rows,
        corpus.cols,
        config.corpus,
        config.metric,
    )?
    .with_progress(config.progress);

    let mut sub_timer = timer.start_sub_timer("dbscan");
    let assignments = engine.run(T::from_f64_lossy(config.eps), config.min_pts)?;
    sub_timer.stop(true);

    io::write_results(&config.output, &assignments)?;
    timer.stop(true);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if args.write_template {
        let path = args.config.as_deref().ok_or(Error::InvalidParameter {
            name: "config",
            message: "--write-template needs a --config path to write to".into(),
        })?;
        return write_template(path);
    }

    let config = match args.config {
        Some(ref path) => DbscanConfig::from_toml(path)?,
        None => DbscanConfig::default(),
    };
    let config = args.merge_into(config);
    config.validate()?;
    log::debug!("Running with config: {:?}", config);

    let input = args.input.as_deref().ok_or(Error::InvalidParameter {
        name: "input",
        message: "a CSV input path is required".into(),
    })?;

    match config.precision {
        Precision::Single => cluster::<f32>(&config, input),
        Precision::Double => cluster::<f64>(&config, input),
    }
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitValues::Success.into()
                },
                clap::error::ErrorKind::MissingRequiredArgument => ExitValues::Help.into(),
                _ => ExitValues::BadArguments.into(),
            };
        },
    };

    match run(args) {
        Ok(()) => ExitValues::Success.into(),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            exit_value(&e).into()
        },
    }
}
