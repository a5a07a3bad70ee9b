use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, io::BufReader, path::Path};
use tracing::{debug, info};

use super::io_err;
use crate::error::{Error, Result};
use crate::models::{Extra, NearEarthObject};

/// `pha` value marking a potentially hazardous object.
pub const HAZARD_SENTINEL: &str = "Y";

const DESIGNATION: &str = "pdes";
const NAME: &str = "name";
const DIAMETER: &str = "diameter";
const HAZARD: &str = "pha";

/// Positions of the interpreted columns within the header row.
struct NeoColumns {
    designation: usize,
    name: usize,
    diameter: usize,
    hazard: usize,
}

impl NeoColumns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| Error::MissingColumn {
                    path: path.to_path_buf(),
                    column,
                })
        };
        Ok(Self {
            designation: find(DESIGNATION)?,
            name: find(NAME)?,
            diameter: find(DIAMETER)?,
            hazard: find(HAZARD)?,
        })
    }

    fn is_mapped(&self, idx: usize) -> bool {
        idx == self.designation || idx == self.name || idx == self.diameter || idx == self.hazard
    }
}

/// Read the NEO table at `path`, one `NearEarthObject` per data row, in file order.
///
/// - `pdes` → designation, `name` → name (empty stays empty)
/// - `diameter` → km, empty or unparsable → unknown
/// - `pha` → hazardous, only `"Y"` is true
/// - every other column lands in `extra`
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_neos<P: AsRef<Path>>(path: P) -> Result<Vec<NearEarthObject>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_err(path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let cols = NeoColumns::locate(&headers, path)?;

    let mut neos = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        neos.push(neo_from_record(&headers, &record, &cols));
    }

    info!(count = neos.len(), "loaded NEOs");
    Ok(neos)
}

fn neo_from_record(
    headers: &StringRecord,
    record: &StringRecord,
    cols: &NeoColumns,
) -> NearEarthObject {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let designation = field(cols.designation).trim();
    let name = field(cols.name).trim();
    let diameter = parse_diameter(designation, field(cols.diameter));
    let hazardous = field(cols.hazard).trim() == HAZARD_SENTINEL;

    let extra: Extra = headers
        .iter()
        .zip(record.iter())
        .enumerate()
        .filter(|(idx, _)| !cols.is_mapped(*idx))
        .map(|(_, (h, v))| (h.to_string(), v.to_string()))
        .collect();

    NearEarthObject::new(designation, name, diameter, hazardous, extra)
}

/// Empty, unparsable and non-finite values all mean "unknown".
fn parse_diameter(designation: &str, raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(d) if d.is_finite() => Some(d),
        _ => {
            debug!(designation, raw, "unparsable diameter treated as unknown");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "id,spkid,full_name,pdes,name,prefix,neo,pha,diameter,albedo";

    fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("neos.csv");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_load_eros() {
        let (_tmp, path) = write_csv(&format!(
            "{HEADER}\na0000433,2000433,\"   433 Eros (A898 PA)\",433,Eros,,Y,N,16.84,0.25\n"
        ));
        let neos = load_neos(&path).unwrap();
        assert_eq!(neos.len(), 1);

        let eros = &neos[0];
        assert_eq!(eros.designation, "433");
        assert_eq!(eros.name, "Eros");
        assert_eq!(eros.diameter, Some(16.84));
        assert!(!eros.hazardous);
        assert_eq!(eros.extra.get("spkid").map(String::as_str), Some("2000433"));
        assert_eq!(eros.extra.get("albedo").map(String::as_str), Some("0.25"));
        assert!(!eros.extra.contains_key("pdes"));
        assert!(eros.approaches.is_empty());
    }

    #[test]
    fn test_defaults_and_hazard_coercion() {
        let (_tmp, path) = write_csv(&format!(
            "{HEADER}\n\
             a1,1,x,2020 AB,,,Y,Y,,\n\
             a2,2,x,2020 AC,,,Y,,abc,\n\
             a3,3,x,2020 AD,,,Y,y,0.5,\n\
             a4,4,x,2020 AE,,,Y,N,nan,\n"
        ));
        let neos = load_neos(&path).unwrap();
        assert_eq!(neos.len(), 4);

        assert_eq!(neos[0].name, "");
        assert_eq!(neos[0].diameter, None);
        assert!(neos[0].hazardous);

        assert_eq!(neos[1].diameter, None);
        assert!(!neos[1].hazardous);

        // sentinel is case-sensitive
        assert!(!neos[2].hazardous);
        assert_eq!(neos[2].diameter, Some(0.5));

        assert_eq!(neos[3].diameter, None);
        assert!(!neos[3].hazardous);
    }

    #[test]
    fn test_preserves_file_order() {
        let (_tmp, path) = write_csv(&format!(
            "{HEADER}\na,1,x,3,,,Y,N,,\na,2,x,1,,,Y,N,,\na,3,x,2,,,Y,N,,\n"
        ));
        let designations: Vec<_> = load_neos(&path)
            .unwrap()
            .into_iter()
            .map(|n| n.designation)
            .collect();
        assert_eq!(designations, ["3", "1", "2"]);
    }

    #[test]
    fn test_missing_column() {
        let (_tmp, path) = write_csv("id,name,pha,diameter\na,Eros,N,16.84\n");
        let err = load_neos(&path).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "pdes", .. }));
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let (_tmp, path) = write_csv(&format!("{HEADER}\na,1,x,433,Eros\n"));
        assert!(matches!(load_neos(&path), Err(Error::Csv { .. })));
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempdir().unwrap();
        let err = load_neos(tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_header_only() {
        let (_tmp, path) = write_csv(&format!("{HEADER}\n"));
        assert!(load_neos(&path).unwrap().is_empty());
    }
}
