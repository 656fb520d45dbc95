use std::path::Path;

use crate::utils::{Mesh, Vertex};
use crate::view::resources::AssetError;

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Flatten every triangle primitive of a glTF file into one indexed mesh.
/// Node transforms are not applied; the model is placed by the draw transform.
pub fn load_gltf_mesh(path: &Path) -> Result<Mesh, AssetError> {
    let (doc, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for mesh in doc.meshes() {
        for prim in mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Vec<[f32; 3]> = reader.read_normals().map(|n| n.collect()).unwrap_or_default();
            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|t| t.into_f32().collect())
                .unwrap_or_default();
            let prim_indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());

            append_primitive(&mut vertices, &mut indices, &positions, &normals, &uvs, prim_indices.as_deref());
        }
    }

    if indices.is_empty() {
        return Err(AssetError::EmptyModel(path.to_path_buf()));
    }
    tracing::info!(path = %path.display(), vertices = vertices.len(), triangles = indices.len() / 3, "model loaded");
    Ok(Mesh { vertices, indices: Some(indices) })
}

/// Append one primitive, rebasing its indices past the vertices already
/// present. Missing normals/UVs get defaults; a primitive without indices is
/// drawn in vertex order.
pub fn append_primitive(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    uvs: &[[f32; 2]],
    prim_indices: Option<&[u32]>,
) {
    let base = vertices.len() as u32;
    vertices.extend(positions.iter().enumerate().map(|(i, &pos)| Vertex {
        pos,
        normal: normals.get(i).copied().unwrap_or(DEFAULT_NORMAL),
        uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
    }));
    match prim_indices {
        Some(idx) => indices.extend(idx.iter().map(|i| base + i)),
        None => indices.extend(base..base + positions.len() as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_primitive_is_rebased() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

        append_primitive(&mut vertices, &mut indices, &tri, &[], &[], Some(&[0, 1, 2][..]));
        append_primitive(&mut vertices, &mut indices, &tri, &[], &[], Some(&[2, 1, 0][..]));

        assert_eq!(vertices.len(), 6);
        assert_eq!(indices, vec![0, 1, 2, 5, 4, 3]);
        assert_eq!(vertices[4].normal, DEFAULT_NORMAL);
    }

    #[test]
    fn unindexed_primitive_uses_vertex_order() {
        let mut vertices = Vec::new();
        let mut indices = vec![];
        let quad = [[0.0; 3]; 6];
        let uvs = [[0.5, 0.25]; 6];
        append_primitive(&mut vertices, &mut indices, &quad, &[[0.0, 0.0, 1.0]; 6], &uvs, None);
        assert_eq!(indices, (0..6).collect::<Vec<u32>>());
        assert_eq!(vertices[3].uv, [0.5, 0.25]);
        assert_eq!(vertices[3].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_model_reports_path() {
        let err = load_gltf_mesh(Path::new("no/such/player.gltf")).err().unwrap();
        assert!(matches!(err, AssetError::Gltf { .. }));
        assert!(err.to_string().contains("no/such/player.gltf"));
    }
}
