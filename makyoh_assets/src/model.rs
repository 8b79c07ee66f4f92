use super::*;

use makyoh::nalgebra::Vector3;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ObjError {
    pub line: usize,
    pub message: String,
}

impl ObjError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// An indexed triangle mesh, normalised to fit the `[-1, 1]` cube centred on the origin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    positions: Vec<[Float; 3]>,
    normals: Vec<[Float; 3]>,
    indices: Vec<u32>,
}

impl Model {
    #[inline]
    pub fn positions(&self) -> &[[Float; 3]] {
        &self.positions
    }

    /// One unit normal per position.
    #[inline]
    pub fn normals(&self) -> &[[Float; 3]] {
        &self.normals
    }

    /// Three indices per triangle.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    position: usize,
    normal: Option<usize>,
}

/// Resolve a one-based (or negative, relative) OBJ index against `len` elements.
fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize, ObjError> {
    let index: isize = token
        .parse()
        .map_err(|_| ObjError::new(line, format!("invalid index `{token}`")))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i as usize - 1),
        i => len.checked_sub(i.unsigned_abs()),
    };

    resolved
        .filter(|&i| i < len)
        .ok_or_else(|| ObjError::new(line, format!("index {index} out of bounds (1..={len})")))
}

fn parse_vertex(
    token: &str,
    positions: usize,
    normals: usize,
    line: usize,
) -> Result<VertexKey, ObjError> {
    let mut parts = token.split('/');

    let position = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ObjError::new(line, "face vertex missing position index"))?;
    let position = resolve_index(position, positions, line)?;

    // texture coordinates are not used
    let _ = parts.next();

    let normal = parts
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| resolve_index(s, normals, line))
        .transpose()?;

    Ok(VertexKey { position, normal })
}

fn parse_floats<const N: usize>(
    mut it: core::str::SplitWhitespace,
    line: usize,
) -> Result<[Float; N], ObjError> {
    let mut out = [0.; N];

    for x in out.iter_mut() {
        let token = it
            .next()
            .ok_or_else(|| ObjError::new(line, format!("expected {N} coordinates")))?;
        *x = token
            .parse()
            .map_err(|_| ObjError::new(line, format!("invalid number `{token}`")))?;
    }

    Ok(out)
}

/// Parse a Wavefront OBJ stream. Polygons are fan-triangulated, vertices without a
/// normal get the average of the normals of the faces around their position, and the
/// result is centred and scaled into `[-1, 1]`.
pub fn parse_obj(reader: impl BufRead) -> Result<Model, ObjError> {
    let mut obj_positions: Vec<Vector3<Float>> = Vec::new();
    let mut obj_normals: Vec<Vector3<Float>> = Vec::new();

    let mut keys: Vec<VertexKey> = Vec::new();
    let mut map: HashMap<VertexKey, u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| ObjError::new(line_no, e.to_string()))?;

        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }

        let mut it = s.split_whitespace();
        match it.next() {
            Some("v") => obj_positions.push(parse_floats::<3>(it, line_no)?.into()),
            Some("vn") => obj_normals.push(parse_floats::<3>(it, line_no)?.into()),
            Some("f") => {
                let verts = it
                    .map(|t| parse_vertex(t, obj_positions.len(), obj_normals.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;

                if verts.len() < 3 {
                    return Err(ObjError::new(line_no, "face has fewer than 3 vertices"));
                }

                for t in 1..verts.len() - 1 {
                    for key in [verts[0], verts[t], verts[t + 1]] {
                        let index = *map.entry(key).or_insert_with(|| {
                            keys.push(key);
                            (keys.len() - 1) as u32
                        });
                        indices.push(index);
                    }
                }
            }
            // groups, materials, texture coordinates, smoothing...
            _ => {}
        }
    }

    // area-weighted face normals accumulated per OBJ position
    let mut accumulated = vec![Vector3::<Float>::zeros(); obj_positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| keys[tri[k] as usize].position);
        let n = (obj_positions[b] - obj_positions[a]).cross(&(obj_positions[c] - obj_positions[a]));
        for p in [a, b, c] {
            accumulated[p] += n;
        }
    }

    let normals = keys
        .iter()
        .map(|key| {
            let n = key.normal.map_or(accumulated[key.position], |n| obj_normals[n]);
            n.try_normalize(Float::EPSILON)
                .unwrap_or_else(Vector3::z)
                .into()
        })
        .collect();

    let positions: Vec<Vector3<Float>> = keys.iter().map(|key| obj_positions[key.position]).collect();

    Ok(Model {
        positions: normalize_positions(&positions),
        normals,
        indices,
    })
}

/// Centre the bounding box on the origin and scale its largest side to 2.
fn normalize_positions(positions: &[Vector3<Float>]) -> Vec<[Float; 3]> {
    let Some(first) = positions.first() else {
        return Vec::new();
    };

    let (min, max) = positions
        .iter()
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));

    let center = (min + max) / 2.;
    let extent = (max - min).max();
    let scale = if extent > Float::EPSILON { 2. / extent } else { 1. };

    positions
        .iter()
        .map(|p| ((p - center) * scale).into())
        .collect()
}

/// Read the OBJ file at `path`. A file without a single triangle is an error.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, AssetError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let model = parse_obj(BufReader::new(file)).map_err(|source| AssetError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    if model.is_empty() {
        return Err(AssetError::EmptyModel {
            path: path.to_path_buf(),
        });
    }

    log::debug!(
        "loaded {} ({} vertices, {} triangles)",
        path.display(),
        model.positions().len(),
        model.triangle_count()
    );

    Ok(model)
}
