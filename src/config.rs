//! Runtime settings

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const ENV_NEO_CSV: &str = "NEOTRACK_NEO_CSV";
pub const ENV_CAD_JSON: &str = "NEOTRACK_CAD_JSON";
pub const ENV_LIMIT: &str = "NEOTRACK_LIMIT";

/// Where to find the source data, plus a default result limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub neo_csv_path: PathBuf,
    pub cad_json_path: PathBuf,
    pub limit: Option<usize>,
}

fn default_neo_csv_path() -> PathBuf {
    PathBuf::from("data/neos.csv")
}

fn default_cad_json_path() -> PathBuf {
    PathBuf::from("data/cad.json")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            neo_csv_path: default_neo_csv_path(),
            cad_json_path: default_cad_json_path(),
            limit: None,
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let neo_csv_path = lookup(ENV_NEO_CSV)
            .map(PathBuf::from)
            .unwrap_or_else(default_neo_csv_path);

        let cad_json_path = lookup(ENV_CAD_JSON)
            .map(PathBuf::from)
            .unwrap_or_else(default_cad_json_path);

        let limit = match lookup(ENV_LIMIT) {
            Some(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse::<usize>().map_err(|_| Error::Config {
                    key: ENV_LIMIT,
                    value: raw.clone(),
                })?)
            }
            _ => None,
        };

        Ok(Self {
            neo_csv_path,
            cad_json_path,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_NEO_CSV, "/tmp/neos.csv"),
            (ENV_CAD_JSON, "/tmp/cad.json"),
            (ENV_LIMIT, " 25 "),
        ]))
        .unwrap();
        assert_eq!(settings.neo_csv_path, PathBuf::from("/tmp/neos.csv"));
        assert_eq!(settings.cad_json_path, PathBuf::from("/tmp/cad.json"));
        assert_eq!(settings.limit, Some(25));
    }

    #[test]
    fn test_bad_limit() {
        let err = Settings::from_lookup(lookup_from(&[(ENV_LIMIT, "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: ENV_LIMIT, .. }));
    }
}
