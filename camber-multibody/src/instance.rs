use std::collections::HashMap;

use camber_core::ConfigurationError;

/// Integer handle identifying one loaded model within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelInstanceId(usize);

impl ModelInstanceId {
    /// The raw id value.
    pub fn value(self) -> usize {
        self.0
    }
}

/// Maps model names to their instance ids.
///
/// Ids are assigned monotonically in registration order and never reused
/// within a table. Registering a name twice is an error, never a silent
/// overwrite.
#[derive(Debug, Default)]
pub struct ModelInstanceIdTable {
    by_name: HashMap<String, ModelInstanceId>,
    names: Vec<String>,
}

impl ModelInstanceIdTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model name and assigns it the next id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateModelName`] when the name is
    /// already registered.
    pub fn record(&mut self, name: impl Into<String>) -> Result<ModelInstanceId, ConfigurationError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(ConfigurationError::DuplicateModelName(name));
        }
        let id = ModelInstanceId(self.names.len());
        self.by_name.insert(name.clone(), id);
        self.names.push(name);
        Ok(id)
    }

    /// Looks up the id of a registered model.
    pub fn id(&self, name: &str) -> Option<ModelInstanceId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when no model is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(name, id)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ModelInstanceId)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), ModelInstanceId(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotone_in_registration_order() {
        let mut table = ModelInstanceIdTable::new();
        let car = table.record("car").unwrap();
        let ramp = table.record("ramp").unwrap();

        assert!(car < ramp);
        assert_eq!(table.id("car"), Some(car));
        assert_eq!(table.len(), 2);

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["car", "ramp"]);
    }

    #[test]
    fn duplicate_names_are_reported_not_overwritten() {
        let mut table = ModelInstanceIdTable::new();
        let first = table.record("car").unwrap();

        let err = table.record("car").unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateModelName(name) if name == "car"));

        // The original registration is untouched.
        assert_eq!(table.id("car"), Some(first));
        assert_eq!(table.len(), 1);
    }
}
