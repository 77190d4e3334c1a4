//! City directory for market-rate validation.
//!
//! Cities are reference data maintained outside the service: a JSON
//! document listing every city workers can be assigned to. When the
//! file is absent a small hardcoded default keeps the service usable.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A city a worker can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct City {
    /// Stable numeric identifier from the directory file.
    pub id: u32,
    /// City name, the key used for worker assignment.
    pub name: String,
    /// Administrative region the city belongs to.
    pub region: String,
}

/// On-disk shape of the directory file: `{"cities": [...]}`.
#[derive(Debug, Deserialize)]
struct CityFile {
    #[serde(default)]
    cities: Vec<City>,
}

/// In-memory city directory, loaded once at startup.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    cities: Vec<City>,
}

impl CityDirectory {
    /// Loads the directory from a JSON file, falling back to the
    /// hardcoded default list when the file does not exist. A present
    /// but malformed file yields an empty directory and a warning —
    /// market-rate submissions will then fail validation rather than
    /// accept arbitrary city names.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<CityFile>(&contents) {
                Ok(file) => {
                    tracing::info!(path = %path.display(), count = file.cities.len(), "loaded city directory");
                    Self { cities: file.cities }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "malformed city directory file");
                    Self { cities: Vec::new() }
                }
            },
            Err(_) => {
                tracing::warn!(path = %path.display(), "city directory file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Returns all cities.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Returns `true` if `name` is a known city.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cities.iter().any(|c| c.name == name)
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self {
            cities: vec![
                City {
                    id: 1,
                    name: "Душанбе".to_string(),
                    region: "Душанбе".to_string(),
                },
                City {
                    id: 2,
                    name: "Худжанд".to_string(),
                    region: "Согдийская область".to_string(),
                },
                City {
                    id: 3,
                    name: "Истаравшан".to_string(),
                    region: "Согдийская область".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = CityDirectory::load_or_default("/nonexistent/cities.json");
        assert_eq!(dir.cities().len(), 3);
        assert!(dir.contains("Душанбе"));
        assert!(dir.contains("Худжанд"));
    }

    #[test]
    fn contains_is_exact_match() {
        let dir = CityDirectory::default();
        assert!(dir.contains("Истаравшан"));
        assert!(!dir.contains("истаравшан"));
        assert!(!dir.contains("Куляб"));
    }
}
