// src/lib.rs

//! Import of Abaqus (`.inp`), Comsol (`.mphtxt`), Gmsh (`.msh`) and Elfen
//! (`.mes`) text meshes into one [`CanonicalMesh`]: a node table plus element
//! blocks in a shared node ordering, with region markers.
//!
//! ```no_run
//! use meshrs_import::{import_file, ImportOptions};
//!
//! let mesh = import_file("bracket.inp", &ImportOptions::default())?;
//! println!("{} nodes, {} elements", mesh.node_count(), mesh.element_count());
//! # Ok::<(), meshrs_import::MeshImportError>(())
//! ```

pub mod builder;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod options;
pub mod parser;
pub mod structs_and_impls;
pub mod taxonomy;

pub use dispatch::{import_file, import_files, import_mesh, import_mesh_bytes};
pub use error::{Feature, Location, MeshImportError};
pub use format::MeshFormat;
pub use options::ImportOptions;
pub use structs_and_impls::{
    CanonicalMesh, ElementBlock, ElementKind, ElementOrder, MarkerId, NodeIndex, Point, UNMARKED,
};
