use std::fmt::Write as _;
use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use meshrs_import::{
    import_file, import_files, import_mesh, CanonicalMesh, ImportOptions, MeshFormat,
    MeshImportError, UNMARKED,
};

const GROUP_NAMES: [&str; 4] = ["outlet", "wall", "inlet", "symmetry"];

// ===================
// Strategies
// ===================

/// Distinct, unsorted node ids with planar coordinates.
fn nodes_strategy() -> impl Strategy<Value = Vec<(u64, f64, f64)>> {
    prop::collection::hash_set(1u64..100_000, 2..40).prop_flat_map(|ids| {
        let ids: Vec<u64> = ids.into_iter().collect();
        let count = ids.len();
        prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), count).prop_map(move |coords| {
            ids.iter()
                .zip(coords)
                .map(|(&id, (x, y))| (id, x, y))
                .collect()
        })
    })
}

/// Line elements as (first node slot, second node slot, group slot). Group
/// slots past the end of `GROUP_NAMES` carry an unnamed physical tag.
fn lines_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0usize..1000, 0usize..1000, 0..GROUP_NAMES.len() + 1), 1..60)
}

fn gmsh_text(nodes: &[(u64, f64, f64)], lines: &[(usize, usize, usize)]) -> String {
    let mut text = String::from("$MeshFormat\n2.2 0 8\n$EndMeshFormat\n");

    writeln!(text, "$PhysicalNames\n{}", GROUP_NAMES.len()).unwrap();
    for (slot, name) in GROUP_NAMES.iter().enumerate() {
        writeln!(text, "1 {} \"{}\"", slot + 1, name).unwrap();
    }
    text.push_str("$EndPhysicalNames\n");

    writeln!(text, "$Nodes\n{}", nodes.len()).unwrap();
    for (id, x, y) in nodes {
        writeln!(text, "{} {:e} {:e} 0", id, x, y).unwrap();
    }
    text.push_str("$EndNodes\n");

    writeln!(text, "$Elements\n{}", lines.len()).unwrap();
    for (index, &(a, b, group)) in lines.iter().enumerate() {
        let first = nodes[a % nodes.len()].0;
        let second = nodes[b % nodes.len()].0;
        let tag = if group < GROUP_NAMES.len() { group + 1 } else { 77 };
        writeln!(text, "{} 1 2 {} 1 {} {}", index + 1, tag, first, second).unwrap();
    }
    text.push_str("$EndElements\n");
    text
}

// ===================
// Property Test Functions
// ===================

/// Every connectivity entry is a valid dense index and rows have canonical length.
fn check_indices_in_bounds(mesh: &CanonicalMesh) -> Result<(), TestCaseError> {
    for block in &mesh.blocks {
        prop_assert_eq!(block.connectivity.len(), block.markers.len());
        for (row, _) in block.iter() {
            prop_assert_eq!(row.len(), block.nodes_per_element());
            prop_assert!(row.iter().all(|&index| index < mesh.node_count()));
        }
    }
    Ok(())
}

/// Named markers are numbered 1..=k in sorted name order and map back to the group.
fn check_named_markers(
    mesh: &CanonicalMesh,
    lines: &[(usize, usize, usize)],
) -> Result<(), TestCaseError> {
    let mut sorted = mesh.marker_names.clone();
    sorted.sort();
    sorted.dedup();
    prop_assert_eq!(&sorted, &mesh.marker_names);

    let block = &mesh.blocks[0];
    for (&(_, _, group), &marker) in lines.iter().zip(&block.markers) {
        match GROUP_NAMES.get(group) {
            Some(name) => prop_assert_eq!(mesh.marker_name(marker), Some(*name)),
            None => prop_assert_eq!(marker, UNMARKED),
        }
    }

    for id in mesh.marker_ids() {
        prop_assert!(id as usize <= mesh.marker_names.len());
    }
    Ok(())
}

/// Nodes keep file order and their coordinates.
fn check_node_order(mesh: &CanonicalMesh, nodes: &[(u64, f64, f64)]) -> Result<(), TestCaseError> {
    prop_assert_eq!(mesh.node_count(), nodes.len());
    for (point, &(_, x, y)) in mesh.nodes.iter().zip(nodes) {
        let expected = [x, y];
        let width = point.dimension().min(2);
        prop_assert_eq!(&point.coordinates[..width], &expected[..width]);
    }
    Ok(())
}

proptest! {
    #[test]
    fn gmsh_meshes_keep_indices_in_bounds(nodes in nodes_strategy(), lines in lines_strategy()) {
        let mesh = import_mesh(MeshFormat::Gmsh, &gmsh_text(&nodes, &lines), &ImportOptions::default()).unwrap();
        check_indices_in_bounds(&mesh)?;
    }

    #[test]
    fn gmsh_physical_names_resolve_to_sorted_ids(nodes in nodes_strategy(), lines in lines_strategy()) {
        let mesh = import_mesh(MeshFormat::Gmsh, &gmsh_text(&nodes, &lines), &ImportOptions::default()).unwrap();
        check_named_markers(&mesh, &lines)?;
    }

    #[test]
    fn node_table_follows_file_order(nodes in nodes_strategy(), lines in lines_strategy()) {
        let mesh = import_mesh(MeshFormat::Gmsh, &gmsh_text(&nodes, &lines), &ImportOptions::default()).unwrap();
        check_node_order(&mesh, &nodes)?;
    }

    #[test]
    fn abaqus_elset_names_are_sorted(names in prop::collection::vec("[A-Z]{1,6}", 1..8)) {
        let mut deck = String::from("*NODE\n1, 0, 0\n2, 1, 0\n3, 0, 1\n");
        for (index, name) in names.iter().enumerate() {
            writeln!(deck, "*ELEMENT, TYPE=CPS3, ELSET={}\n{}, 1, 2, 3", name, index + 1).unwrap();
        }

        let mesh = import_mesh(MeshFormat::Abaqus, &deck, &ImportOptions::default()).unwrap();
        let mut expected = names.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(&mesh.marker_names, &expected);

        let block = &mesh.blocks[0];
        for (name, &marker) in names.iter().zip(&block.markers) {
            prop_assert_eq!(mesh.marker_name(marker), Some(name.as_str()));
        }
    }
}

#[test]
fn import_file_reads_from_disk() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("strip.MSH");
    let nodes = vec![(10, 0.0, 0.0), (20, 1.0, 0.0), (30, 2.0, 0.0)];
    fs::write(&path, gmsh_text(&nodes, &[(0, 1, 0), (1, 2, 4)])).unwrap();

    let mesh = import_file(&path, &ImportOptions::default()).unwrap();
    assert_eq!(mesh.spatial_dimension, 1);
    assert_eq!(mesh.blocks[0].connectivity, vec![vec![0, 1], vec![1, 2]]);
    assert_eq!(mesh.marker_name(mesh.blocks[0].markers[0]), Some("outlet"));
    assert_eq!(mesh.blocks[0].markers[1], UNMARKED);
}

#[test]
fn import_files_keeps_input_order() {
    let dir = tempdir().expect("Failed to create temp directory");

    let good = dir.path().join("beam.inp");
    fs::write(&good, "*NODE\n1, 0, 0, 0\n2, 1, 0, 0\n*ELEMENT, TYPE=B31\n1, 1, 2\n").unwrap();
    let bad = dir.path().join("broken.inp");
    fs::write(&bad, "*NODE\n1, 0, 0\n*NGEN\n1, 5, 1\n").unwrap();
    let missing = dir.path().join("missing.mes");
    let unknown = dir.path().join("notes.txt");

    let results = import_files(
        &[good.clone(), bad, missing, unknown, good],
        &ImportOptions::default(),
    );
    assert_eq!(results.len(), 5);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(MeshImportError::UnsupportedFeature(_))));
    assert!(matches!(results[2], Err(MeshImportError::Io(_))));
    assert!(matches!(results[3], Err(MeshImportError::UnsupportedFormat(_))));
    assert_eq!(results[4].as_ref().unwrap().spatial_dimension, 3);
}
