//! The JSON glyph mesh description.
//!
//! ```json
//! {
//!   "A": { "vertices": [x, y, z, nx, ny, nz, u, v, ...], "indices": [0, 1, 2], "advance": 0.8 },
//!   "B": { ... }
//! }
//! ```

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::LoadError;

/// Floats per vertex: position xyz, normal xyz, uv.
pub const FLOATS_PER_VERTEX: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlyphEntry {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    #[serde(default)]
    pub advance: Option<f32>,
}

impl GlyphEntry {
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>, advance: Option<f32>) -> Self {
        Self {
            vertices,
            indices,
            advance,
        }
    }
}

/// Glyph meshes by character, in document order.
#[derive(Debug, Clone, Default)]
pub struct GlyphSource {
    glyphs: IndexMap<char, GlyphEntry>,
}

impl GlyphSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let entries: IndexMap<String, GlyphEntry> = serde_json::from_str(json)?;

        let glyphs = entries
            .into_iter()
            .map(|(key, entry)| Ok((single_char(key)?, entry)))
            .collect::<Result<_, LoadError>>()?;

        Ok(Self { glyphs })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (char, GlyphEntry)>) -> Self {
        Self {
            glyphs: entries.into_iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &GlyphEntry)> {
        self.glyphs.iter().map(|(c, e)| (*c, e))
    }

    pub fn get(&self, character: char) -> Option<&GlyphEntry> {
        self.glyphs.get(&character)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

fn single_char(key: String) -> Result<char, LoadError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LoadError::InvalidKey(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_document_order() {
        let source = GlyphSource::from_json_str(
            r#"{
                "Z": { "vertices": [], "indices": [] },
                "A": { "vertices": [], "indices": [], "advance": 2.0 },
                "M": { "vertices": [], "indices": [] }
            }"#,
        )
        .unwrap();

        let keys: Vec<char> = source.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, ['Z', 'A', 'M']);
        assert_eq!(source.get('A').unwrap().advance, Some(2.0));
        assert_eq!(source.get('Z').unwrap().advance, None);
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        let missing_indices = GlyphSource::from_json_str(r#"{ "A": { "vertices": [] } }"#);
        assert!(matches!(missing_indices, Err(LoadError::Parse(_))));

        let missing_vertices = GlyphSource::from_json_str(r#"{ "A": { "indices": [] } }"#);
        assert!(matches!(missing_vertices, Err(LoadError::Parse(_))));
    }

    #[test]
    fn negative_indices_are_rejected() {
        let r = GlyphSource::from_json_str(r#"{ "A": { "vertices": [], "indices": [-1] } }"#);
        assert!(matches!(r, Err(LoadError::Parse(_))));
    }

    #[test]
    fn keys_must_be_single_characters() {
        let r = GlyphSource::from_json_str(r#"{ "AB": { "vertices": [], "indices": [] } }"#);
        assert!(matches!(r, Err(LoadError::InvalidKey(k)) if k == "AB"));

        let r = GlyphSource::from_json_str(r#"{ "": { "vertices": [], "indices": [] } }"#);
        assert!(matches!(r, Err(LoadError::InvalidKey(_))));

        let ok = GlyphSource::from_json_str(r#"{ "ä": { "vertices": [], "indices": [] } }"#);
        assert!(ok.is_ok());
    }

    #[test]
    fn missing_file_names_the_path() {
        let r = GlyphSource::load("does/not/exist.json");
        match r {
            Err(LoadError::Io { path, .. }) => assert!(path.ends_with("exist.json")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
