//! Loading model snapshots from JSON

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Model;

/// Parse a model snapshot from a JSON string
pub fn from_json_str(json: &str) -> Result<Model> {
    let model: Model = serde_json::from_str(json)?;
    model.reindex()
}

/// Load a model snapshot from a JSON file
pub fn load_json_file(path: &Path) -> Result<Model> {
    if !path.exists() {
        return Err(Error::ModelNotFound(path.display().to_string()));
    }
    let json = fs::read_to_string(path)?;
    let model = from_json_str(&json)?;
    tracing::debug!(
        path = %path.display(),
        classifiers = model.classifiers().count(),
        associations = model.associations().count(),
        "loaded model snapshot"
    );
    Ok(model)
}

/// Serialize a model snapshot back to pretty-printed JSON
pub fn to_json_string(model: &Model) -> Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}
