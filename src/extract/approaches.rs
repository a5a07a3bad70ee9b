use serde::Deserialize;
use serde_json::Value;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::info;

use super::io_err;
use crate::error::{Error, Result};
use crate::helpers::cd_to_datetime;
use crate::models::{CloseApproach, Extra};

const DESIGNATION: &str = "des";
const DATE: &str = "cd";
const DISTANCE: &str = "dist";
const VELOCITY: &str = "v_rel";

/// Top level of the close-approach feed. Other members (`signature`, `count`) are ignored.
#[derive(Debug, Deserialize)]
struct CadDocument {
    fields: Option<Vec<String>>,
    data: Option<Vec<Vec<Value>>>,
}

/// A positional data row re-keyed by the declared field names.
#[derive(Debug)]
struct NamedRow {
    index: usize,
    cells: Extra,
}

impl NamedRow {
    /// Pair `fields[i]` with `values[i]`. Lengths must match; `null` cells are dropped.
    fn from_positional(
        fields: &[String],
        values: Vec<Value>,
        index: usize,
        path: &Path,
    ) -> Result<Self> {
        if values.len() != fields.len() {
            return Err(Error::RowLength {
                path: path.to_path_buf(),
                row: index,
                expected: fields.len(),
                found: values.len(),
            });
        }
        let cells = fields
            .iter()
            .zip(values)
            .filter_map(|(name, value)| cell_text(value).map(|v| (name.clone(), v)))
            .collect();
        Ok(Self { index, cells })
    }

    fn take(&mut self, field: &'static str, path: &Path) -> Result<String> {
        self.cells.remove(field).ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            row: self.index,
            field,
        })
    }

    fn take_number(&mut self, field: &'static str, path: &Path) -> Result<f64> {
        let raw = self.take(field, path)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Error::InvalidNumber {
                path: path.to_path_buf(),
                row: self.index,
                field,
                value: raw,
            }),
        }
    }

    fn into_approach(mut self, path: &Path) -> Result<CloseApproach> {
        let designation = self.take(DESIGNATION, path)?;
        let cd = self.take(DATE, path)?;
        let time = cd_to_datetime(&cd).ok_or_else(|| Error::InvalidTimestamp {
            path: path.to_path_buf(),
            row: self.index,
            field: DATE,
            value: cd.clone(),
        })?;
        let distance = self.take_number(DISTANCE, path)?;
        let velocity = self.take_number(VELOCITY, path)?;

        Ok(CloseApproach::new(
            designation.trim(),
            time,
            distance,
            velocity,
            self.cells,
        ))
    }
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Read the close-approach feed at `path`, one `CloseApproach` per data row, in file order.
///
/// The feed carries a `fields` list and a `data` list of rows aligned positionally to it.
/// A row whose length differs from `fields`, or whose `des`/`cd`/`dist`/`v_rel` is absent
/// or malformed, aborts the whole load.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_approaches<P: AsRef<Path>>(path: P) -> Result<Vec<CloseApproach>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_err(path))?;
    let doc: CadDocument =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let missing = |section: &'static str| Error::MissingSection {
        path: PathBuf::from(path),
        section,
    };
    let fields = doc.fields.ok_or_else(|| missing("fields"))?;
    let data = doc.data.ok_or_else(|| missing("data"))?;

    // alignment is checked for every row before any record is built
    let rows = data
        .into_iter()
        .enumerate()
        .map(|(index, values)| NamedRow::from_positional(&fields, values, index, path))
        .collect::<Result<Vec<_>>>()?;

    let approaches = rows
        .into_iter()
        .map(|row| row.into_approach(path))
        .collect::<Result<Vec<_>>>()?;

    info!(count = approaches.len(), "loaded close approaches");
    Ok(approaches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn write_json(body: &str) -> (tempfile::TempDir, PathBuf) {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("cad.json");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_load_single_row() {
        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00","0.15","5.5"]]}"#,
        );
        let approaches = load_approaches(&path).unwrap();
        assert_eq!(approaches.len(), 1);

        let ca = &approaches[0];
        assert_eq!(ca.designation, "433");
        assert_eq!(ca.distance, 0.15);
        assert_eq!(ca.velocity, 5.5);
        assert_eq!(
            ca.time,
            NaiveDate::from_ymd_opt(2000, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert!(ca.extra.is_empty());
        assert!(ca.neo.is_none());
    }

    #[test]
    fn test_field_order_and_extras() {
        let (_tmp, path) = write_json(
            r#"{"signature":{"version":"1.1"},"count":"2",
                "fields":["v_rel","orbit_id","des","jd","cd","dist","h"],
                "data":[
                  ["19.4","12","2015 CL","2415020.5","1900-Jan-01 00:11","0.0921",null],
                  ["7.1","3","2001 AB","2415021.5","1900-Jan-02 01:00","0.3",22.1]
                ]}"#,
        );
        let approaches = load_approaches(&path).unwrap();
        assert_eq!(approaches.len(), 2);
        assert_eq!(approaches[0].designation, "2015 CL");
        assert_eq!(approaches[0].velocity, 19.4);
        assert_eq!(approaches[0].distance, 0.0921);
        assert_eq!(approaches[0].time_str(), "1900-01-01 00:11");
        assert_eq!(
            approaches[0].extra.get("orbit_id").map(String::as_str),
            Some("12")
        );
        assert!(!approaches[0].extra.contains_key("h"));
        assert!(!approaches[0].extra.contains_key("des"));
        assert_eq!(approaches[1].designation, "2001 AB");
        assert_eq!(approaches[1].extra.get("h").map(String::as_str), Some("22.1"));
    }

    #[test]
    fn test_row_length_mismatch_is_fatal() {
        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00","0.15","5.5"],
                        ["434","2000-Jan-02 00:00","0.2"]]}"#,
        );
        let err = load_approaches(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::RowLength {
                row: 1,
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_row_length_reported_before_field_errors() {
        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00","bad","5"],
                        ["434","2000-Jan-01 00:00","0.1"]]}"#,
        );
        let err = load_approaches(&path).unwrap_err();
        assert!(
            matches!(err, Error::RowLength { row: 1, expected: 4, found: 3, .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_missing_sections() {
        let (_tmp, path) = write_json(r#"{"data":[]}"#);
        assert!(matches!(
            load_approaches(&path),
            Err(Error::MissingSection { section: "fields", .. })
        ));

        let (_tmp, path) = write_json(r#"{"fields":["des"]}"#);
        assert!(matches!(
            load_approaches(&path),
            Err(Error::MissingSection { section: "data", .. })
        ));
    }

    #[test]
    fn test_required_fields() {
        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00",null,"5.5"]]}"#,
        );
        assert!(matches!(
            load_approaches(&path),
            Err(Error::MissingField { field: "dist", row: 0, .. })
        ));

        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00","0.1","fast"]]}"#,
        );
        let err = load_approaches(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { field: "v_rel", .. }));
        assert!(err.to_string().contains("fast"));

        let (_tmp, path) = write_json(
            r#"{"fields":["des","dist","v_rel"],"data":[["433","0.1","5"]]}"#,
        );
        assert!(matches!(
            load_approaches(&path),
            Err(Error::MissingField { field: "cd", .. })
        ));

        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","01/01/2000","0.1","5"]]}"#,
        );
        assert!(matches!(
            load_approaches(&path),
            Err(Error::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_numeric_cells() {
        let (_tmp, path) = write_json(
            r#"{"fields":["des","cd","dist","v_rel"],
                "data":[["433","2000-Jan-01 00:00",0.25,12]]}"#,
        );
        let approaches = load_approaches(&path).unwrap();
        assert_eq!(approaches[0].distance, 0.25);
        assert_eq!(approaches[0].velocity, 12.0);
    }

    #[test]
    fn test_not_json() {
        let (_tmp, path) = write_json("des,cd\n");
        assert!(matches!(load_approaches(&path), Err(Error::Json { .. })));
    }
}
