// src/options.rs

use crate::error::MeshImportError;

/// Caller-side settings for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Forces the spatial dimension instead of inferring it from the file.
    /// Coordinates are truncated or zero-padded to this width.
    pub spatial_dimension: Option<usize>,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spatial_dimension(mut self, dimension: usize) -> Self {
        self.spatial_dimension = Some(dimension);
        self
    }

    pub fn validate(&self) -> Result<(), MeshImportError> {
        match self.spatial_dimension {
            Some(dimension) => check_dimension(dimension).map(|_| ()),
            None => Ok(()),
        }
    }

    /// The requested dimension if any, otherwise the one the driver inferred.
    pub(crate) fn resolve_dimension(&self, inferred: usize) -> Result<usize, MeshImportError> {
        check_dimension(self.spatial_dimension.unwrap_or(inferred))
    }
}

pub(crate) fn check_dimension(dimension: usize) -> Result<usize, MeshImportError> {
    if (1..=3).contains(&dimension) {
        Ok(dimension)
    } else {
        Err(MeshImportError::InvalidDimension(dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_dimension_wins() {
        let options = ImportOptions::new().with_spatial_dimension(2);
        assert_eq!(options.resolve_dimension(3).unwrap(), 2);
        assert_eq!(ImportOptions::default().resolve_dimension(3).unwrap(), 3);
    }

    #[test]
    fn test_dimension_range() {
        assert!(ImportOptions::new().with_spatial_dimension(4).validate().is_err());
        assert!(ImportOptions::new().with_spatial_dimension(1).validate().is_ok());
        assert!(matches!(
            ImportOptions::default().resolve_dimension(0),
            Err(MeshImportError::InvalidDimension(0))
        ));
    }
}
