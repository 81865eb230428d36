// ⚙️ Import Configuration - JSON file, every key optional
//
// {
//   "input_path": "employees.csv",
//   "database_path": "employees.db",
//   "grade_min": 1,
//   "grade_max": 5,
//   "rejections_path": "rejected.csv"
// }

use crate::validators::GradeBounds;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "employees.csv";
pub const DEFAULT_DATABASE_PATH: &str = "employees.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Roster file to read
    pub input_path: PathBuf,

    /// SQLite database receiving the batch
    pub database_path: PathBuf,

    /// Inclusive technician grade range
    pub grade_min: i32,
    pub grade_max: i32,

    /// Where to export rejected lines as CSV (none = log only)
    pub rejections_path: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let grades = GradeBounds::default();
        ImportConfig {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            grade_min: grades.min,
            grade_max: grades.max,
            rejections_path: None,
        }
    }
}

impl ImportConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: ImportConfig =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grade_min > self.grade_max {
            bail!(
                "grade_min ({}) must not be greater than grade_max ({})",
                self.grade_min,
                self.grade_max
            );
        }
        Ok(())
    }

    pub fn grade_bounds(&self) -> GradeBounds {
        GradeBounds::new(self.grade_min, self.grade_max)
    }
}
