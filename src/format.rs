// src/format.rs

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::MeshImportError;

/// The CAE tools whose text mesh files can be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Abaqus,
    Comsol,
    Gmsh,
    Elfen,
}

static EXTENSIONS: Lazy<HashMap<&'static str, MeshFormat>> = Lazy::new(|| {
    HashMap::from([
        ("inp", MeshFormat::Abaqus),
        ("mphtxt", MeshFormat::Comsol),
        ("msh", MeshFormat::Gmsh),
        ("mes", MeshFormat::Elfen),
    ])
});

impl MeshFormat {
    pub const ALL: [MeshFormat; 4] = [
        MeshFormat::Abaqus,
        MeshFormat::Comsol,
        MeshFormat::Gmsh,
        MeshFormat::Elfen,
    ];

    /// Look up a format by file extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Result<MeshFormat, MeshImportError> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        EXTENSIONS
            .get(key.as_str())
            .copied()
            .ok_or_else(|| MeshImportError::UnsupportedFormat(extension.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<MeshFormat, MeshImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| MeshImportError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Abaqus => "inp",
            MeshFormat::Comsol => "mphtxt",
            MeshFormat::Gmsh => "msh",
            MeshFormat::Elfen => "mes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Abaqus => "Abaqus",
            MeshFormat::Comsol => "Comsol",
            MeshFormat::Gmsh => "Gmsh",
            MeshFormat::Elfen => "Elfen",
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshFormat {
    type Err = MeshImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeshFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MeshImportError::UnsupportedFormat(s.to_string()))
    }
}
