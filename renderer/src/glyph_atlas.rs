//! Packs all glyph meshes of a [`GlyphSource`] into one shared vertex and index buffer.

use std::{collections::HashMap, ops::Range};

use itertools::Itertools;
use log::{debug, trace};

use crate::{
    LoadError,
    glyph_source::{FLOATS_PER_VERTEX, GlyphEntry, GlyphSource},
    pods::GlyphVertex,
};

/// Where a glyph's geometry lives inside the atlas buffers.
///
/// Indices in the atlas are already rebased, so `first_index..first_index + index_count` can be
/// drawn with a base vertex of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRange {
    pub base_vertex: u32,
    pub vertex_count: u32,
    pub first_index: u32,
    pub index_count: u32,
}

impl GlyphRange {
    pub fn indices(&self) -> Range<u32> {
        self.first_index..self.first_index + self.index_count
    }

    pub fn vertices(&self) -> Range<u32> {
        self.base_vertex..self.base_vertex + self.vertex_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasGlyph {
    pub advance: f32,
    pub range: GlyphRange,
}

/// Advance widths by character, with a fallback for characters not in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceTable {
    advances: HashMap<char, f32>,
    default_advance: f32,
}

impl AdvanceTable {
    pub fn new(default_advance: f32) -> Self {
        Self {
            advances: HashMap::new(),
            default_advance,
        }
    }

    pub fn with_advances(
        advances: impl IntoIterator<Item = (char, f32)>,
        default_advance: f32,
    ) -> Self {
        Self {
            advances: advances.into_iter().collect(),
            default_advance,
        }
    }

    pub fn insert(&mut self, character: char, advance: f32) {
        self.advances.insert(character, advance);
    }

    pub fn get(&self, character: char) -> Option<f32> {
        self.advances.get(&character).copied()
    }

    /// The advance of `character`, or the default advance if unknown.
    pub fn advance(&self, character: char) -> f32 {
        self.get(character).unwrap_or(self.default_advance)
    }

    pub fn default_advance(&self) -> f32 {
        self.default_advance
    }

    pub fn len(&self) -> usize {
        self.advances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advances.is_empty()
    }
}

/// The merged, offset-corrected geometry of all glyphs.
///
/// Immutable after [`GlyphAtlas::build`].
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    vertices: Vec<GlyphVertex>,
    indices: Vec<u32>,
    glyphs: HashMap<char, AtlasGlyph>,
    advances: AdvanceTable,
}

impl GlyphAtlas {
    /// Packs the glyphs in source order.
    ///
    /// Every glyph's local indices are offset by the number of vertices packed before it.
    /// Glyphs without an advance get `default_advance`.
    pub fn build(source: &GlyphSource, default_advance: f32) -> Result<Self, LoadError> {
        if source.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut atlas = Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            glyphs: HashMap::with_capacity(source.len()),
            advances: AdvanceTable::new(default_advance),
        };

        for (character, entry) in source.iter() {
            atlas.push_glyph(character, entry)?;
        }

        debug!(
            "Packed {} glyphs: {} vertices, {} indices",
            atlas.glyphs.len(),
            atlas.vertices.len(),
            atlas.indices.len()
        );
        trace!("Glyphs: {:?}", source.iter().map(|(c, _)| c).join(""));

        Ok(atlas)
    }

    fn push_glyph(&mut self, character: char, entry: &GlyphEntry) -> Result<(), LoadError> {
        let floats = entry.vertices.len();
        if floats % FLOATS_PER_VERTEX != 0 {
            return Err(LoadError::VertexLayout { character, floats });
        }
        if entry.indices.len() % 3 != 0 {
            return Err(LoadError::IncompleteTriangle {
                character,
                indices: entry.indices.len(),
            });
        }

        let vertex_count = floats / FLOATS_PER_VERTEX;
        if let Some(&index) = entry.indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(LoadError::IndexOutOfRange {
                character,
                index,
                vertex_count,
            });
        }

        let (base_vertex, glyph_vertices) = u32_span(self.vertices.len(), vertex_count).ok_or(
            LoadError::TooLarge {
                vertex_count: self.vertices.len().saturating_add(vertex_count),
            },
        )?;
        let (first_index, index_count) = u32_span(self.indices.len(), entry.indices.len())
            .ok_or(LoadError::TooManyIndices {
                index_count: self.indices.len().saturating_add(entry.indices.len()),
            })?;

        self.vertices.extend(
            entry
                .vertices
                .chunks_exact(FLOATS_PER_VERTEX)
                .map(|chunk| {
                    GlyphVertex::from_floats(
                        chunk
                            .try_into()
                            .expect("Internal Error: chunks_exact yields 8 floats"),
                    )
                }),
        );
        self.indices
            .extend(entry.indices.iter().map(|i| i + base_vertex));

        let advance = entry.advance.unwrap_or(self.advances.default_advance());
        self.advances.insert(character, advance);
        self.glyphs.insert(
            character,
            AtlasGlyph {
                advance,
                range: GlyphRange {
                    base_vertex,
                    vertex_count: glyph_vertices,
                    first_index,
                    index_count,
                },
            },
        );

        Ok(())
    }

    pub fn vertices(&self) -> &[GlyphVertex] {
        &self.vertices
    }

    /// The merged vertices as the flat float layout of the source.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn advances(&self) -> &AdvanceTable {
        &self.advances
    }

    pub fn glyph(&self, character: char) -> Option<&AtlasGlyph> {
        self.glyphs.get(&character)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// `start` and `len` as `u32`, if `start + len` fits into `u32`.
///
/// Keeps every [`GlyphRange`] end representable.
fn u32_span(start: usize, len: usize) -> Option<(u32, u32)> {
    let end = u32::try_from(start.checked_add(len)?).ok()?;
    Some((end - len as u32, len as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A glyph with `vertex_count` vertices, triangulated as a fan.
    fn fan(vertex_count: u32, advance: Option<f32>) -> GlyphEntry {
        let vertices = (0..vertex_count * 8).map(|i| i as f32).collect();
        let indices = (1..vertex_count.saturating_sub(1))
            .flat_map(|i| [0, i, i + 1])
            .collect();
        GlyphEntry::new(vertices, indices, advance)
    }

    #[test]
    fn second_glyph_indices_are_offset_by_first_vertex_count() {
        let source = GlyphSource::from_entries([('A', fan(4, None)), ('B', fan(6, None))]);
        let atlas = GlyphAtlas::build(&source, 1.0).unwrap();

        let a = atlas.glyph('A').unwrap().range;
        let b = atlas.glyph('B').unwrap().range;
        assert_eq!(a.base_vertex, 0);
        assert_eq!(b.base_vertex, 4);
        assert_eq!(b.first_index, a.index_count);

        let local_b = &source.get('B').unwrap().indices;
        let merged_b = &atlas.indices()[b.indices().start as usize..b.indices().end as usize];
        assert_eq!(merged_b.len(), local_b.len());
        for (merged, local) in merged_b.iter().zip(local_b) {
            assert_eq!(*merged, local + 4);
        }
    }

    #[test]
    fn max_index_is_last_vertex() {
        let source = GlyphSource::from_entries([
            ('A', fan(3, None)),
            ('B', fan(5, None)),
            ('C', fan(7, None)),
        ]);
        let atlas = GlyphAtlas::build(&source, 1.0).unwrap();

        assert_eq!(atlas.vertex_count(), 15);
        assert_eq!(
            atlas.indices().iter().max().copied(),
            Some(atlas.vertex_count() as u32 - 1)
        );
        assert_eq!(atlas.vertex_floats().len(), 15 * 8);
    }

    #[test]
    fn vertex_data_is_concatenated_in_source_order() {
        let source = GlyphSource::from_entries([('B', fan(3, None)), ('A', fan(3, None))]);
        let atlas = GlyphAtlas::build(&source, 1.0).unwrap();

        let floats = atlas.vertex_floats();
        assert_eq!(&floats[..24], &source.get('B').unwrap().vertices[..]);
        assert_eq!(&floats[24..], &source.get('A').unwrap().vertices[..]);
        assert_eq!(atlas.glyph('A').unwrap().range.vertices(), 3..6);
    }

    #[test]
    fn advances_fall_back_to_default() {
        let source = GlyphSource::from_entries([('A', fan(3, Some(10.0))), ('B', fan(3, None))]);
        let atlas = GlyphAtlas::build(&source, 5.0).unwrap();

        assert_eq!(atlas.advances().advance('A'), 10.0);
        assert_eq!(atlas.advances().advance('B'), 5.0);
        assert_eq!(atlas.advances().advance('?'), 5.0);
        assert_eq!(atlas.advances().get('?'), None);
        assert_eq!(atlas.glyph('A').unwrap().advance, 10.0);
    }

    #[test]
    fn empty_source_is_an_error() {
        let r = GlyphAtlas::build(&GlyphSource::default(), 1.0);
        assert!(matches!(r, Err(LoadError::Empty)));
    }

    #[test]
    fn vertex_floats_must_be_multiple_of_eight() {
        let broken = GlyphEntry::new(vec![0.0; 12], vec![], None);
        let source = GlyphSource::from_entries([('A', fan(3, None)), ('x', broken)]);
        let r = GlyphAtlas::build(&source, 1.0);
        assert!(matches!(
            r,
            Err(LoadError::VertexLayout {
                character: 'x',
                floats: 12
            })
        ));
    }

    #[test]
    fn local_indices_must_reference_own_vertices() {
        let broken = GlyphEntry::new(vec![0.0; 24], vec![0, 1, 3], None);
        let source = GlyphSource::from_entries([('A', fan(4, None)), ('B', broken)]);
        let r = GlyphAtlas::build(&source, 1.0);
        assert!(matches!(
            r,
            Err(LoadError::IndexOutOfRange {
                character: 'B',
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn indices_must_form_triangles() {
        let broken = GlyphEntry::new(vec![0.0; 24], vec![0, 1], None);
        let source = GlyphSource::from_entries([('A', broken)]);
        let r = GlyphAtlas::build(&source, 1.0);
        assert!(matches!(
            r,
            Err(LoadError::IncompleteTriangle {
                character: 'A',
                indices: 2
            })
        ));
    }

    #[test]
    fn glyphs_without_geometry_still_carry_an_advance() {
        let space = GlyphEntry::new(vec![], vec![], Some(3.0));
        let source = GlyphSource::from_entries([('A', fan(3, None)), (' ', space)]);
        let atlas = GlyphAtlas::build(&source, 1.0).unwrap();

        let range = atlas.glyph(' ').unwrap().range;
        assert_eq!(range.index_count, 0);
        assert_eq!(range.base_vertex, 3);
        assert_eq!(atlas.advances().advance(' '), 3.0);
    }

    #[test]
    fn spans_must_end_within_u32() {
        let max = u32::MAX as usize;
        assert_eq!(u32_span(0, 6), Some((0, 6)));
        assert_eq!(u32_span(max - 3, 3), Some((u32::MAX - 3, 3)));
        assert_eq!(u32_span(max - 3, 4), None);
        assert_eq!(u32_span(max, 1), None);
        assert_eq!(u32_span(usize::MAX, 1), None);
    }
}
