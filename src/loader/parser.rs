//! YAML parser for scenario definitions
//!
//! Parses and validates scenario files.
//! Supports both built-in scenarios (by name) and custom files (by path).

use crate::error::{Error, Result};
use crate::loader::types::ScenarioDefinition;
use crate::scenarios;
use std::fs;
use std::path::Path;

/// Load a scenario definition from a name or file path
///
/// This function first checks if the input is a built-in scenario name
/// (e.g., "bug-cache-sum"), then falls back to loading from a file path.
/// Files ending in `.json` are parsed as JSON, everything else as YAML.
///
/// # Examples
///
/// ```ignore
/// // Load built-in scenario by name
/// let def = load_scenario("bug-cache-sum")?;
///
/// // Load custom scenario from file
/// let def = load_scenario("./my-scenario.yaml")?;
/// ```
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
        && !path_str.ends_with(".json")
    {
        if let Some(yaml) = scenarios::get_builtin(&path_str) {
            return load_scenario_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ScenarioNotFound {
                name: path.display().to_string(),
                builtin: scenarios::list_builtin().join(", "),
            }
        } else {
            Error::config(format!(
                "Failed to read scenario file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    if path.extension().is_some_and(|ext| ext == "json") {
        load_scenario_from_json(&content)
    } else {
        load_scenario_from_str(&content)
    }
}

/// Load a scenario definition from a YAML string
pub fn load_scenario_from_str(yaml: &str) -> Result<ScenarioDefinition> {
    let def: ScenarioDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse scenario YAML: {e}")))?;

    def.validate()?;
    Ok(def)
}

/// Load a scenario definition from a JSON string
pub fn load_scenario_from_json(json: &str) -> Result<ScenarioDefinition> {
    let def: ScenarioDefinition = serde_json::from_str(json)?;

    def.validate()?;
    Ok(def)
}
