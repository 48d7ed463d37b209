use std::path::PathBuf;

use crate::instance::ModelInstanceIdTable;
use crate::tree::RigidBodyTree;

/// A tree populated from model description files, plus the table mapping
/// each parsed model name to its instance id.
pub struct LoadedModels {
    pub tree: RigidBodyTree,
    pub instances: ModelInstanceIdTable,
}

/// The contract an external model-description loader fulfills.
///
/// Parsing URDF/SDF-style files lives outside this workspace; the core
/// only consumes the result. Loaders must report name collisions through
/// their error type rather than continue silently — the
/// [`ModelInstanceIdTable`] enforces this for them when they record each
/// parsed model.
pub trait ModelLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parses the given model files into a single tree.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when a file cannot be parsed or a model name
    /// collides with one already loaded.
    fn load(&self, paths: &[PathBuf]) -> Result<LoadedModels, Self::Error>;
}
