// src/dispatch.rs

//! Entry points: pick the driver for a format and run it.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::error::{Location, MeshImportError};
use crate::format::MeshFormat;
use crate::options::ImportOptions;
use crate::parser::{AbaqusInpParser, MesParser, MphtxtParser, MshParser};
use crate::structs_and_impls::CanonicalMesh;

/// Parse mesh text of a known format.
pub fn import_mesh(
    format: MeshFormat,
    content: &str,
    options: &ImportOptions,
) -> Result<CanonicalMesh, MeshImportError> {
    options.validate()?;
    info!(format:% = format, bytes = content.len(); "Importing mesh");

    let mesh = match format {
        MeshFormat::Abaqus => AbaqusInpParser::parse(content, options),
        MeshFormat::Comsol => MphtxtParser::parse(content, options),
        MeshFormat::Gmsh => MshParser::parse(content, options),
        MeshFormat::Elfen => MesParser::parse(content, options),
    }?;

    debug!(
        format:% = format,
        nodes = mesh.node_count(),
        blocks = mesh.blocks.len(),
        elements = mesh.element_count(),
        spatial_dimension = mesh.spatial_dimension,
        boundary_only = mesh.boundary_only;
        "Imported mesh",
    );
    Ok(mesh)
}

/// Like [`import_mesh`], for raw bytes that must be UTF-8.
pub fn import_mesh_bytes(
    format: MeshFormat,
    content: &[u8],
    options: &ImportOptions,
) -> Result<CanonicalMesh, MeshImportError> {
    let text = std::str::from_utf8(content).map_err(|err| {
        let line = content[..err.valid_up_to()]
            .iter()
            .filter(|&&byte| byte == b'\n')
            .count()
            + 1;
        MeshImportError::malformed(Location::Line(line), format!("invalid UTF-8: {}", err))
    })?;
    import_mesh(format, text, options)
}

/// Read a mesh file, choosing the format from its extension.
pub fn import_file(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<CanonicalMesh, MeshImportError> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)?;
    info!(path:% = path.display(), format:% = format; "Reading mesh file");

    let content = fs::read(path)?;
    import_mesh_bytes(format, &content, options)
}

/// Import independent files in parallel. Results come back in input order.
pub fn import_files(
    paths: &[PathBuf],
    options: &ImportOptions,
) -> Vec<Result<CanonicalMesh, MeshImportError>> {
    info!(files = paths.len(); "Importing mesh files in parallel");
    paths
        .par_iter()
        .map(|path| import_file(path, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GMSH_LINE: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
2
1 0 0 0
2 1 0 0
$EndNodes
$Elements
1
1 1 0 1 2
$EndElements
";

    #[test]
    fn test_import_mesh_dispatches_on_format() {
        let mesh = import_mesh(MeshFormat::Gmsh, GMSH_LINE, &ImportOptions::default()).unwrap();
        assert_eq!(mesh.spatial_dimension, 1);
        assert_eq!(mesh.element_count(), 1);

        // The same text is not a valid Abaqus deck.
        assert!(import_mesh(MeshFormat::Abaqus, GMSH_LINE, &ImportOptions::default()).is_err());
    }

    #[test]
    fn test_invalid_options_are_rejected_up_front() {
        let options = ImportOptions::new().with_spatial_dimension(0);
        assert!(matches!(
            import_mesh(MeshFormat::Gmsh, GMSH_LINE, &options),
            Err(MeshImportError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = b"*NODE\n1, 0.0\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(
            import_mesh_bytes(MeshFormat::Abaqus, &bytes, &ImportOptions::default()),
            Err(MeshImportError::MalformedRecord { location: Location::Line(3), .. })
        ));
    }

    #[test]
    fn test_import_file_needs_known_extension() {
        assert!(matches!(
            import_file("mesh.stl", &ImportOptions::default()),
            Err(MeshImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            import_file("does/not/exist.msh", &ImportOptions::default()),
            Err(MeshImportError::Io(_))
        ));
    }
}
