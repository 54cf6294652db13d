use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

/// Runtime configuration, loaded from a JSON file next to the data files.
/// Every field has a default so a partial (or absent) file works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Passage corpus, `---`-separated plain text.
    pub corpus_path: PathBuf,
    /// Score ledger, one `<id> <sum> <count>` line per record.
    pub scores_path: PathBuf,
    /// Choices per cloze question, correct answer included.
    pub choice_count: usize,
    /// Column width for wrapped passage text.
    pub wrap_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/highlights.txt"),
            scores_path: PathBuf::from("scores.txt"),
            choice_count: 4,
            wrap_width: 50,
        }
    }
}

impl AppConfig {
    /// Reads the config file, falling back to defaults when it is missing.
    /// A present-but-invalid file is an error rather than a silent default.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| StudyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| StudyError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
