//! Orrery Import - Model importers
//!
//! Reads Wavefront OBJ files into flat, de-indexed vertex streams that can be
//! uploaded directly as triangle lists.

mod obj;
mod types;

pub use obj::{import_obj, parse_obj};
pub use types::{ImportedModel, MeshBounds};
