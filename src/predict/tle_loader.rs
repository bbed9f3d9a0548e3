use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sgp4::{Constants, Elements};

use crate::predict::error::PredictError;
use crate::predict::types::SatelliteInfo;

pub struct TleEntry {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

pub struct TleLoader {
    tle_dir: PathBuf,
    max_age: Option<Duration>,
    satellites: Vec<TleEntry>,
}

impl TleLoader {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            max_age: None,
            satellites: Vec::new(),
        }
    }

    /// Warn about TLE files older than `max_age` when loading
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Load all TLE files from the directory.
    ///
    /// Files are read in path order and a later file overrides an earlier one
    /// for the same catalog number. The resulting set is ordered by
    /// (name, catalog number) so repeated loads are identical.
    pub fn load_all(&mut self) -> Result<(), PredictError> {
        if !self.tle_dir.exists() {
            return Err(PredictError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.tle_dir)? {
            let path = entry?.path();
            let is_tle = path
                .extension()
                .map(|ext| ext == "tle" || ext == "txt")
                .unwrap_or(false);
            if path.is_file() && is_tle {
                paths.push(path);
            }
        }
        paths.sort();

        let mut by_norad: HashMap<u32, TleEntry> = HashMap::new();
        for path in paths {
            self.check_age(&path);
            match self.parse_tle_file(&path) {
                Ok(entries) => {
                    for tle_entry in entries {
                        let norad_id = tle_entry.info.norad_id;
                        if let Some(old) = by_norad.insert(norad_id, tle_entry) {
                            log::debug!(
                                "NORAD {} from {} replaced by a later file",
                                norad_id,
                                old.info.tle_source
                            );
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                    // Continue with other files
                }
            }
        }

        let mut satellites: Vec<TleEntry> = by_norad.into_values().collect();
        satellites.sort_by(|a, b| {
            a.info
                .name
                .cmp(&b.info.name)
                .then(a.info.norad_id.cmp(&b.info.norad_id))
        });
        self.satellites = satellites;

        if self.satellites.is_empty() {
            return Err(PredictError::NoSatellites);
        }
        log::info!(
            "Loaded {} satellites from {}",
            self.satellites.len(),
            self.tle_dir.display()
        );
        Ok(())
    }

    fn check_age(&self, path: &Path) {
        let Some(max_age) = self.max_age else {
            return;
        };
        let age = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok());
        if let Some(age) = age {
            if age > max_age {
                log::warn!(
                    "TLE file {} is {} old (max {})",
                    path.display(),
                    humantime::format_duration(Duration::from_secs(age.as_secs())),
                    humantime::format_duration(max_age)
                );
            }
        }
    }

    /// Parse a single TLE file (may contain multiple satellites)
    fn parse_tle_file(&self, path: &Path) -> Result<Vec<TleEntry>, PredictError> {
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(parse_tle_entries(&content, &filename))
    }

    /// All loaded satellites, in stable order
    pub fn satellites(&self) -> &[TleEntry] {
        &self.satellites
    }
}

/// Parse every satellite in `content`, skipping ones sgp4 rejects
pub fn parse_tle_entries(content: &str, source: &str) -> Vec<TleEntry> {
    let mut results = Vec::new();

    for (name, line1, line2) in parse_multi_tle(content) {
        match build_entry(name, &line1, &line2, source) {
            Ok(entry) => results.push(entry),
            Err(e) => log::warn!("Skipping satellite: {}", e),
        }
    }

    results
}

fn build_entry(
    name: Option<String>,
    line1: &str,
    line2: &str,
    source: &str,
) -> Result<TleEntry, PredictError> {
    let invalid = |message: String| PredictError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
        .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

    let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

    Ok(TleEntry {
        info: SatelliteInfo {
            name: sat_name,
            norad_id: elements.norad_id as u32,
            tle_source: source.to_string(),
        },
        elements,
        constants,
    })
}

/// Parse multi-satellite TLE content
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE (with name)
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
