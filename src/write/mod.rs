//! Writers for filtered approach results.
//!
//! Each writer stages its output in a hidden sibling file and renames it over the
//! destination once everything is written, so a failed write leaves no half-written file.

pub mod structured;
pub mod tabular;

pub use structured::write_to_json;
pub use tabular::write_to_csv;

use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::error::{Error, Result};
use crate::helpers::datetime_to_str;
use crate::models::JoinRecord;

/// Write `results` to `path`, picking the format from the extension (`.csv` or `.json`).
pub fn write_results<'a, I, P>(results: I, path: P) -> Result<()>
where
    I: IntoIterator<Item = JoinRecord<'a>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => write_to_csv(results, path),
        Some("json") => write_to_json(results, path),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// NEO half of an output record. Defaults are computed from this record alone.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct NeoFields<'a> {
    pub designation: &'a str,
    pub name: &'a str,
    pub diameter_km: Option<f64>,
    pub potentially_hazardous: bool,
}

impl<'a> NeoFields<'a> {
    pub(crate) fn from_join(join: &JoinRecord<'a>) -> Self {
        let neo = join.neo;
        Self {
            designation: &neo.designation,
            name: &neo.name,
            diameter_km: neo.diameter,
            potentially_hazardous: neo.hazardous,
        }
    }
}

/// Approach half of an output record.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ApproachFields {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
}

impl ApproachFields {
    pub(crate) fn from_join(join: &JoinRecord<'_>) -> Self {
        Self {
            datetime_utc: datetime_to_str(&join.approach.time),
            distance_au: join.approach.distance,
            velocity_km_s: join.approach.velocity,
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn staging_path(dest: &Path) -> Result<PathBuf> {
    let file_name = dest.file_name().ok_or_else(|| Error::Io {
        path: dest.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(dest.with_file_name(tmp_name))
}

/// Run `body` against a buffered staging file, then rename it over `dest`.
/// `body`'s value is returned only once the rename has succeeded.
/// On any error the staging file is removed and `dest` is untouched.
fn write_atomically<T, F>(dest: &Path, body: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    let tmp_path = staging_path(dest)?;
    let result = File::create(&tmp_path)
        .map_err(io_err(&tmp_path))
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            let value = body(&mut out)?;
            out.flush().map_err(io_err(&tmp_path))?;
            Ok(value)
        })
        .and_then(|value| {
            fs::rename(&tmp_path, dest).map_err(io_err(dest))?;
            Ok(value)
        });

    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!("failed to remove staging file {}: {}", tmp_path.display(), e);
        }
    }
    result
}
