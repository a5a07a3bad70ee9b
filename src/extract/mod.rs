//! Loaders for the NEO table and the close-approach feed.
//!
//! Both loaders read the whole source before returning and fail atomically:
//! on error no partial collection is handed back.

pub mod approaches;
pub mod neos;

pub use approaches::load_approaches;
pub use neos::load_neos;

use std::path::Path;

use crate::error::Error;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
