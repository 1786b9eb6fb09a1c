use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::element::Element;

/// Errors that can occur while saving or loading a scene.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize scene: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to access scene file: {0}")]
    Io(#[from] std::io::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Serializes the element list as JSON. The array order is the z-order
/// (first element at the bottom), so a round trip preserves stacking.
pub fn scene_to_json(elements: &[Element]) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(elements)?)
}

pub fn scene_from_json(json: &str) -> PersistenceResult<Vec<Element>> {
    Ok(serde_json::from_str(json)?)
}

pub fn save_scene(path: &Path, elements: &[Element]) -> PersistenceResult<()> {
    let json = scene_to_json(elements)?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, json)?;
    Ok(())
}

pub fn load_scene(path: &Path) -> PersistenceResult<Vec<Element>> {
    let json = fs::read_to_string(path)?;
    scene_from_json(&json)
}
