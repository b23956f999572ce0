//! Per character instance transforms for one string.

use std::str::FromStr;

use serde::Deserialize;

use meshtext_geometry::{RowMajor4, Vector2};

use crate::glyph_atlas::AdvanceTable;

/// Horizontal placement of a string relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(format!("unknown alignment {s:?}")),
        }
    }
}

/// The transform of one character instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceRecord {
    pub character: char,
    /// `translation(cursor_x, y, 0) * scale(s, s, 1)`.
    pub matrix: RowMajor4,
}

impl InstanceRecord {
    pub fn translation(&self) -> [f32; 3] {
        self.matrix.translation()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstanceBatcher<'a> {
    advances: &'a AdvanceTable,
}

impl<'a> InstanceBatcher<'a> {
    pub fn new(advances: &'a AdvanceTable) -> Self {
        Self { advances }
    }

    /// One record per character in string order.
    ///
    /// Alignment only moves the starting cursor. Characters without an advance use the table's
    /// default.
    pub fn build(
        &self,
        text: &str,
        origin: Vector2,
        scale: f32,
        alignment: Alignment,
    ) -> Vec<InstanceRecord> {
        let mut cursor = origin.x - self.alignment_shift(text, scale, alignment);
        let scale_matrix = RowMajor4::from_scale(scale, scale, 1.0);

        text.chars()
            .map(|character| {
                let matrix = RowMajor4::from_translation(cursor, origin.y, 0.0) * scale_matrix;
                cursor += self.advances.advance(character) * scale;
                InstanceRecord { character, matrix }
            })
            .collect()
    }

    /// The scaled width of `text`.
    pub fn total_advance(&self, text: &str, scale: f32) -> f32 {
        scale * text.chars().map(|c| self.advances.advance(c)).sum::<f32>()
    }

    fn alignment_shift(&self, text: &str, scale: f32, alignment: Alignment) -> f32 {
        match alignment {
            Alignment::Left => 0.0,
            Alignment::Center => self.total_advance(text, scale) * 0.5,
            Alignment::Right => self.total_advance(text, scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn advances() -> AdvanceTable {
        AdvanceTable::with_advances([('A', 10.0), ('B', 12.0)], 5.0)
    }

    fn xs(records: &[InstanceRecord]) -> Vec<f32> {
        records.iter().map(|r| r.translation()[0]).collect()
    }

    fn build(text: &str, origin: (f32, f32), scale: f32, alignment: Alignment) -> Vec<InstanceRecord> {
        let table = advances();
        InstanceBatcher::new(&table).build(text, origin.into(), scale, alignment)
    }

    #[test]
    fn empty_text_has_no_instances() {
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            assert!(build("", (3.0, 4.0), 2.0, alignment).is_empty());
        }
    }

    #[test]
    fn left_alignment_starts_at_origin() {
        let records = build("AB", (0.0, 0.0), 1.0, Alignment::Left);
        assert_eq!(records.len(), 2);
        assert_eq!(xs(&records), [0.0, 10.0]);
    }

    #[test]
    fn center_alignment_shifts_by_half_width() {
        let records = build("AB", (0.0, 0.0), 1.0, Alignment::Center);
        assert_eq!(xs(&records), [-11.0, -1.0]);
    }

    #[test]
    fn right_alignment_shifts_by_full_width() {
        let records = build("AB", (0.0, 0.0), 1.0, Alignment::Right);
        assert_eq!(xs(&records), [-22.0, -12.0]);
    }

    #[test]
    fn unknown_characters_advance_by_default() {
        let records = build("A?B", (0.0, 0.0), 1.0, Alignment::Left);
        assert_eq!(xs(&records), [0.0, 10.0, 15.0]);

        let table = advances();
        assert_eq!(InstanceBatcher::new(&table).total_advance("A?", 1.0), 15.0);
    }

    #[test]
    fn scale_applies_to_advance_and_matrix() {
        let records = build("AB", (100.0, 50.0), 2.0, Alignment::Left);
        assert_eq!(xs(&records), [100.0, 120.0]);

        let rows = records[1].matrix.rows;
        assert_eq!(rows[0][0], 2.0);
        assert_eq!(rows[1][1], 2.0);
        assert_eq!(rows[2][2], 1.0);
        assert_eq!(rows[1][3], 50.0);
    }

    #[test]
    fn repeats_keep_string_order() {
        let records = build("ABA", (0.0, 0.0), 1.0, Alignment::Center);
        let chars: Vec<char> = records.iter().map(|r| r.character).collect();
        assert_eq!(chars, ['A', 'B', 'A']);
        let x = xs(&records);
        assert_relative_eq!(x[0], -16.0);
        assert_relative_eq!(x[1], -6.0);
        assert_relative_eq!(x[2], 6.0);
    }

    #[test]
    fn parses_alignment_names() {
        assert_eq!("center".parse::<Alignment>(), Ok(Alignment::Center));
        assert!("middle".parse::<Alignment>().is_err());
    }
}
