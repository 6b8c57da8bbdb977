use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::scenario::ScenarioDefinition;
use crate::definition::tour::TourDefinition;
use crate::error::GuideError;

/// One definition YAML document. Either list may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default)]
    pub scenarios: Vec<ScenarioDefinition>,

    #[serde(default)]
    pub tours: Vec<TourDefinition>,
}

impl DefinitionFile {
    pub fn merge(&mut self, other: DefinitionFile) {
        self.scenarios.extend(other.scenarios);
        self.tours.extend(other.tours);
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty() && self.tours.is_empty()
    }
}

/// Load definitions from a YAML file, or from every .yaml/.yml file in a
/// directory (sorted by name so registration order is stable).
pub fn load_definitions(path: &str) -> Result<DefinitionFile, GuideError> {
    let p = Path::new(path);

    if p.is_dir() {
        let entries = std::fs::read_dir(p).map_err(|e| GuideError::Io {
            path: path.to_string(),
            source: e,
        })?;

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();
        files.sort();

        let mut merged = DefinitionFile::default();
        for file in files {
            merged.merge(load_file(&file)?);
        }
        Ok(merged)
    } else {
        load_file(p)
    }
}

fn load_file(path: &Path) -> Result<DefinitionFile, GuideError> {
    let shown = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| GuideError::Io {
        path: shown.clone(),
        source: e,
    })?;

    serde_yaml::from_str(&content).map_err(|e| GuideError::Yaml {
        path: shown,
        source: e,
    })
}
