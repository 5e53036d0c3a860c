use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::clustering::labels::ClusterAssignments;
use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Error, Result};
use crate::mod_types::Float;

/// Row-major buffer read from a CSV file, owned by the caller of
/// [`read_corpus`] and borrowed by dense corpora.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusBuffer<T> {
    pub data: Vec<T>,
    pub rows: usize,
    pub cols: usize,
}

/// Reads a headerless CSV file with one vector per line.
pub fn read_corpus<T: Float, P: AsRef<Path>>(path: P) -> Result<CorpusBuffer<T>> {
    info!("Reading corpus from: {}", path.as_ref().display());
    let file = File::open(path)?;
    read_corpus_from(file)
}

/// Every record must have the same number of fields as the first one and
/// every field must parse as `T`.
pub fn read_corpus_from<T: Float, R: Read>(reader: R) -> Result<CorpusBuffer<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut data = Vec::new();
    let mut rows = 0;
    let mut cols: Option<usize> = None;

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        match cols {
            None => cols = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: record.len(),
                });
            },
            Some(_) => {},
        }

        data.try_reserve(record.len())?;
        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<T>().map_err(|_| Error::Parse {
                line: line + 1,
                column: column + 1,
                value: field.to_string(),
            })?;
            data.push(value);
        }
        rows += 1;
    }

    let cols = match cols {
        Some(cols) if rows > 0 => cols,
        _ => return Err(Error::EmptyInput),
    };
    debug!("Read {} rows x {} cols", rows, cols);
    Ok(CorpusBuffer { data, rows, cols })
}

/// One cluster id per line, `-1` for unassigned rows. With `include_noise`
/// each line becomes `id,noise` where noise is `0` or `1`.
pub fn write_assignments<W: Write>(
    out: &mut W,
    assignments: &ClusterAssignments,
    include_noise: bool,
) -> Result<()> {
    for (label, noise) in assignments.labels.iter().zip(assignments.noise.iter()) {
        if include_noise {
            writeln!(out, "{},{}", label, *noise as u8)?;
        } else {
            writeln!(out, "{}", label)?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, assignments: &ClusterAssignments) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, assignments)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the results where the output config says, stdout by default.
pub fn write_results(config: &OutputConfig, assignments: &ClusterAssignments) -> Result<()> {
    let inner: Box<dyn Write> = match config.path {
        Some(ref path) => {
            info!("Writing assignments to: {}", path);
            Box::new(File::create(path)?)
        },
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(inner);

    match config.format {
        OutputFormat::Lines => write_assignments(&mut writer, assignments, config.include_noise)?,
        OutputFormat::Json => write_json(&mut writer, assignments)?,
    }
    writer.flush()?;
    Ok(())
}
