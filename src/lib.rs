//! Load near-Earth objects and their close approaches, link them, and write
//! filtered results back out as CSV or JSON.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod filters;
pub mod helpers;
pub mod models;
pub mod write;

pub use database::NeoDatabase;
pub use error::{Error, Result};
pub use models::{CloseApproach, JoinRecord, NearEarthObject};
