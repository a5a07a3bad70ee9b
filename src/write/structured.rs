use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::{io::Write, path::Path};
use tracing::info;

use super::{io_err, write_atomically, ApproachFields, NeoFields};
use crate::error::{Error, Result};
use crate::models::JoinRecord;

/// One element of the output array: approach fields plus a nested `neo` object.
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    #[serde(flatten)]
    approach: ApproachFields,
    neo: NeoFields<'a>,
}

impl<'a> From<JoinRecord<'a>> for JsonRecord<'a> {
    fn from(join: JoinRecord<'a>) -> Self {
        Self {
            approach: ApproachFields::from_join(&join),
            neo: NeoFields::from_join(&join),
        }
    }
}

/// Indent width of the output document.
const JSON_INDENT: &[u8] = b"   ";

/// Write `results` as a single pretty-printed JSON array at `path`.
///
/// The whole array is built before anything is written. Unknown diameters
/// are `null`; missing names are `""`.
#[tracing::instrument(level = "info", skip(results, path), fields(path = %path.as_ref().display()))]
pub fn write_to_json<'a, I, P>(results: I, path: P) -> Result<()>
where
    I: IntoIterator<Item = JoinRecord<'a>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let records: Vec<JsonRecord<'a>> = results.into_iter().map(JsonRecord::from).collect();

    write_atomically(path, |out| {
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = Serializer::with_formatter(&mut *out, formatter);
        records.serialize(&mut ser).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        // trailing newline
        out.write_all(b"\n").map_err(io_err(path))
    })?;

    info!(records = records.len(), "wrote JSON results");
    Ok(())
}
