//! Wavefront OBJ import
//!
//! Supports `v`, `vt`, `vn` and `f` records. Faces may use any of the
//! `v`, `v/vt`, `v//vn` and `v/vt/vn` corner forms, with 1-based or negative
//! (relative) indices. Polygons are fanned into triangles. Every other record
//! type is skipped.

use crate::types::ImportedModel;
use orrery_core::{OrreryError, Result, Vec3};
use std::path::Path;
use std::str::SplitWhitespace;

/// Read and parse an OBJ file from disk
pub fn import_obj(path: &Path) -> Result<ImportedModel> {
    let source = std::fs::read_to_string(path)?;
    let model = parse_obj(&source).map_err(|e| match e {
        OrreryError::ParseError(msg) => {
            OrreryError::ParseError(format!("{}: {}", path.display(), msg))
        }
        OrreryError::ImportError(msg) => {
            OrreryError::ImportError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    tracing::info!(
        "Imported {} ({} triangles)",
        path.display(),
        model.triangle_count()
    );
    Ok(model)
}

/// One resolved face corner, as 0-based indices into the attribute lists
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct Attributes {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

/// Parse OBJ source text into a de-indexed triangle list
pub fn parse_obj(source: &str) -> Result<ImportedModel> {
    let mut attrs = Attributes::default();
    let mut model = ImportedModel::default();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut tokens = content.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => attrs.positions.push(parse_floats(&mut tokens, line_no, "v")?),
            "vt" => attrs.tex_coords.push(parse_floats(&mut tokens, line_no, "vt")?),
            "vn" => attrs.normals.push(parse_floats(&mut tokens, line_no, "vn")?),
            "f" => {
                let corners = tokens
                    .map(|token| parse_corner(token, line_no, &attrs))
                    .collect::<Result<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(OrreryError::ImportError(format!(
                        "line {}: face has {} corners, need at least 3",
                        line_no,
                        corners.len()
                    )));
                }
                for i in 1..corners.len() - 1 {
                    emit_triangle(&mut model, &attrs, [corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(model)
}

fn parse_floats<const N: usize>(
    tokens: &mut SplitWhitespace<'_>,
    line_no: usize,
    keyword: &str,
) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = tokens.next().ok_or_else(|| {
            OrreryError::ParseError(format!(
                "line {}: `{}` expects {} values",
                line_no, keyword, N
            ))
        })?;
        *slot = token.parse().map_err(|_| {
            OrreryError::ParseError(format!(
                "line {}: invalid number `{}` in `{}` record",
                line_no, token, keyword
            ))
        })?;
    }
    Ok(out)
}

fn parse_corner(token: &str, line_no: usize, attrs: &Attributes) -> Result<Corner> {
    let mut parts = token.split('/');
    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, attrs.positions.len(), line_no, "position")?,
        _ => {
            return Err(OrreryError::ParseError(format!(
                "line {}: face corner `{}` has no position index",
                line_no, token
            )))
        }
    };
    let tex_coord = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(
            t,
            attrs.tex_coords.len(),
            line_no,
            "texture coordinate",
        )?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => {
            Some(resolve_index(n, attrs.normals.len(), line_no, "normal")?)
        }
        _ => None,
    };
    if parts.next().is_some() {
        return Err(OrreryError::ParseError(format!(
            "line {}: face corner `{}` has too many components",
            line_no, token
        )));
    }

    Ok(Corner {
        position,
        tex_coord,
        normal,
    })
}

/// Turn a 1-based (or negative, end-relative) OBJ index into a 0-based one
fn resolve_index(raw: &str, len: usize, line_no: usize, kind: &str) -> Result<usize> {
    let index: i64 = raw.parse().map_err(|_| {
        OrreryError::ParseError(format!(
            "line {}: invalid {} index `{}`",
            line_no, kind, raw
        ))
    })?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
        _ => Err(OrreryError::ImportError(format!(
            "line {}: {} index {} out of range (have {})",
            line_no, kind, index, len
        ))),
    }
}

fn emit_triangle(model: &mut ImportedModel, attrs: &Attributes, corners: [Corner; 3]) {
    let p = corners.map(|c| Vec3::from_array(attrs.positions[c.position]));
    let face_normal = (p[1] - p[0]).cross(&(p[2] - p[0])).normalized().to_array();

    for (corner, position) in corners.iter().zip(p) {
        model.positions.push(position.to_array());
        model
            .tex_coords
            .push(corner.tex_coord.map_or([0.0, 0.0], |i| attrs.tex_coords[i]));
        model
            .normals
            .push(corner.normal.map_or(face_normal, |i| attrs.normals[i]));
    }
}
