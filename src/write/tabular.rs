use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::{write_atomically, ApproachFields, NeoFields};
use crate::error::{Error, Result};
use crate::models::JoinRecord;

/// Output header, in column order.
pub const CSV_HEADER: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

/// One flat output row; field order matches `CSV_HEADER`.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    designation: &'a str,
    name: &'a str,
    diameter_km: Option<f64>,
    potentially_hazardous: bool,
}

impl<'a> From<JoinRecord<'a>> for CsvRow<'a> {
    fn from(join: JoinRecord<'a>) -> Self {
        let approach = ApproachFields::from_join(&join);
        let neo = NeoFields::from_join(&join);
        Self {
            datetime_utc: approach.datetime_utc,
            distance_au: approach.distance_au,
            velocity_km_s: approach.velocity_km_s,
            designation: neo.designation,
            name: neo.name,
            diameter_km: neo.diameter_km,
            potentially_hazardous: neo.potentially_hazardous,
        }
    }
}

/// Stream `results` to a CSV file at `path`: one header row, then one row per record.
///
/// Unknown diameters and missing names are written as empty cells.
#[tracing::instrument(level = "info", skip(results, path), fields(path = %path.as_ref().display()))]
pub fn write_to_csv<'a, I, P>(results: I, path: P) -> Result<()>
where
    I: IntoIterator<Item = JoinRecord<'a>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let rows = write_atomically(path, |out| {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
        wtr.write_record(CSV_HEADER).map_err(csv_err)?;

        let mut rows = 0usize;
        for join in results {
            wtr.serialize(CsvRow::from(join)).map_err(csv_err)?;
            rows += 1;
        }
        wtr.flush().map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(rows)
    })?;

    info!(rows, "wrote CSV results");
    Ok(())
}
