//! Plain delimited-text readers and writers for grids, coordinates and the
//! appended stop log.

use crate::environment::{Environment, EnvironmentError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridIoError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read error: {0}")]
    Read(#[from] io::Error),
    #[error("line {line}: cannot parse {value:?} as a number")]
    Parse { line: usize, value: String },
    #[error("line {line}: expected `x,y`, found {found} fields")]
    CoordinateArity { line: usize, found: usize },
    #[error("invalid grid: {0}")]
    Environment(#[from] EnvironmentError),
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> GridIoError + '_ {
    move |source| GridIoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn data_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, io::Result<String>)> {
    reader
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| {
            line.as_ref()
                .map_or(true, |l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        })
}

fn parse_field<T: std::str::FromStr>(line: usize, raw: &str) -> Result<T, GridIoError> {
    let value = raw.trim();
    value.parse().map_err(|_| GridIoError::Parse {
        line,
        value: value.to_string(),
    })
}

/// Parse comma-separated rows of numbers into an [`Environment`].
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_grid<R: BufRead>(reader: R) -> Result<Environment, GridIoError> {
    let mut rows = Vec::new();
    for (line_no, line) in data_lines(reader) {
        let line = line?;
        let row = line
            .split(',')
            .map(|field| parse_field::<f64>(line_no, field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(Environment::from_rows(rows)?)
}

/// Write the grid as comma-separated rows.
pub fn write_grid<W: Write>(environment: &Environment, mut writer: W) -> io::Result<()> {
    for row in environment.rows() {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// Parse `x,y` pairs, one per line.
pub fn read_coordinates<R: BufRead>(reader: R) -> Result<Vec<[usize; 2]>, GridIoError> {
    let mut coords = Vec::new();
    for (line_no, line) in data_lines(reader) {
        let line = line?;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(GridIoError::CoordinateArity {
                line: line_no,
                found: fields.len(),
            });
        }
        let x = parse_field::<usize>(line_no, fields[0])?;
        let y = parse_field::<usize>(line_no, fields[1])?;
        coords.push([x, y]);
    }
    Ok(coords)
}

/// Attach `path` to read failures that happened after the file was opened.
fn with_path(path: &Path) -> impl FnOnce(GridIoError) -> GridIoError + '_ {
    move |err| match err {
        GridIoError::Read(source) => io_at(path)(source),
        other => other,
    }
}

pub fn load_grid(path: &Path) -> Result<Environment, GridIoError> {
    let file = File::open(path).map_err(io_at(path))?;
    read_grid(BufReader::new(file)).map_err(with_path(path))
}

pub fn save_grid(path: &Path, environment: &Environment) -> Result<(), GridIoError> {
    let file = File::create(path).map_err(io_at(path))?;
    write_grid(environment, BufWriter::new(file)).map_err(io_at(path))
}

pub fn load_coordinates(path: &Path) -> Result<Vec<[usize; 2]>, GridIoError> {
    let file = File::open(path).map_err(io_at(path))?;
    read_coordinates(BufReader::new(file)).map_err(with_path(path))
}

/// Append one line holding `store_total` to the log at `path`, creating it if
/// needed. Existing lines are kept.
pub fn append_store_total(path: &Path, store_total: f64) -> Result<(), GridIoError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_at(path))?;
    writeln!(file, "{store_total}").map_err(io_at(path))
}
