//! Turns text runs into per glyph instanced draws.
//!
//! Every distinct glyph of a run gets one indexed draw over its own index range in the atlas.
//! Instances of the same glyph are stored contiguously, ordered by the glyph's first appearance in
//! the run.

use std::{mem, ops::Range};

use indexmap::IndexMap;
use log::trace;

use meshtext_geometry::{Color, Vector2};

use crate::{
    glyph_atlas::GlyphAtlas,
    instance_batcher::{Alignment, InstanceBatcher, InstanceRecord},
};

/// One `draw_text` request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub position: Vector2,
    pub scale: f32,
    pub color: Color,
    pub alignment: Alignment,
}

impl TextRun {
    pub fn new(
        text: impl Into<String>,
        position: impl Into<Vector2>,
        scale: f32,
        color: Color,
        alignment: Alignment,
    ) -> Self {
        Self {
            text: text.into(),
            position: position.into(),
            scale,
            color,
            alignment,
        }
    }
}

/// Runs queued for the next frame.
#[derive(Debug, Clone, Default)]
pub struct TextRuns {
    runs: Vec<TextRun>,
}

impl TextRuns {
    /// Queues `run`. Runs without text are dropped.
    pub fn push(&mut self, run: TextRun) {
        if run.text.is_empty() {
            return;
        }
        self.runs.push(run);
    }

    /// All queued runs. The queue is empty afterwards.
    pub fn take(&mut self) -> Vec<TextRun> {
        mem::take(&mut self.runs)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphDraw {
    /// Index into the runs the plan was built from.
    pub run: usize,
    pub character: char,
    /// Absolute range in the atlas index buffer.
    pub indices: Range<u32>,
    /// Range in [`DrawPlan::instances`].
    pub instances: Range<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DrawPlan {
    instances: Vec<InstanceRecord>,
    draws: Vec<GlyphDraw>,
}

impl DrawPlan {
    pub fn build(atlas: &GlyphAtlas, runs: &[TextRun]) -> Self {
        let batcher = InstanceBatcher::new(atlas.advances());
        let mut plan = Self::default();

        for (run_index, run) in runs.iter().enumerate() {
            let records = batcher.build(&run.text, run.position, run.scale, run.alignment);

            let mut by_glyph: IndexMap<char, Vec<InstanceRecord>> = IndexMap::new();
            for record in records {
                by_glyph.entry(record.character).or_default().push(record);
            }

            for (character, records) in by_glyph {
                let Some(glyph) = atlas.glyph(character) else {
                    // The cursor already moved past it, nothing to draw.
                    trace!("No glyph for {character:?}, skipping");
                    continue;
                };
                if glyph.range.index_count == 0 {
                    continue;
                }

                let start = plan.instances.len() as u32;
                plan.instances.extend(records);
                plan.draws.push(GlyphDraw {
                    run: run_index,
                    character,
                    indices: glyph.range.indices(),
                    instances: start..plan.instances.len() as u32,
                });
            }
        }

        plan
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }

    pub fn draws(&self) -> &[GlyphDraw] {
        &self.draws
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph_source::{GlyphEntry, GlyphSource};

    fn triangle(advance: f32) -> GlyphEntry {
        GlyphEntry::new(vec![0.0; 24], vec![0, 1, 2], Some(advance))
    }

    fn quad(advance: f32) -> GlyphEntry {
        GlyphEntry::new(vec![0.0; 32], vec![0, 1, 2, 0, 2, 3], Some(advance))
    }

    fn atlas() -> GlyphAtlas {
        let source = GlyphSource::from_entries([
            ('A', quad(10.0)),
            ('B', triangle(12.0)),
            (' ', GlyphEntry::new(vec![], vec![], Some(4.0))),
        ]);
        GlyphAtlas::build(&source, 5.0).unwrap()
    }

    fn run(text: &str) -> TextRun {
        TextRun::new(text, (0.0, 0.0), 1.0, Color::WHITE, Alignment::Left)
    }

    #[test]
    fn empty_text_has_no_draws() {
        let plan = DrawPlan::build(&atlas(), &[run("")]);
        assert!(plan.is_empty());
        assert!(plan.instances().is_empty());
    }

    #[test]
    fn repeated_glyphs_share_one_draw() {
        let atlas = atlas();
        let plan = DrawPlan::build(&atlas, &[run("ABA")]);

        assert_eq!(
            plan.draws(),
            [
                GlyphDraw {
                    run: 0,
                    character: 'A',
                    indices: 0..6,
                    instances: 0..2,
                },
                GlyphDraw {
                    run: 0,
                    character: 'B',
                    indices: 6..9,
                    instances: 2..3,
                },
            ]
        );

        let xs: Vec<f32> = plan
            .instances()
            .iter()
            .map(|r| r.translation()[0])
            .collect();
        // Both A's first, then the B, each keeping its own cursor position.
        assert_eq!(xs, [0.0, 22.0, 10.0]);
    }

    #[test]
    fn missing_and_empty_glyphs_are_skipped_but_advance() {
        let plan = DrawPlan::build(&atlas(), &[run("A? B")]);

        let chars: Vec<char> = plan.draws().iter().map(|d| d.character).collect();
        assert_eq!(chars, ['A', 'B']);

        let b = plan.instances().last().unwrap();
        assert_eq!(b.character, 'B');
        assert_eq!(b.translation()[0], 10.0 + 5.0 + 4.0);
    }

    #[test]
    fn runs_append_to_one_instance_list() {
        let plan = DrawPlan::build(&atlas(), &[run("AB"), run("B")]);

        assert_eq!(plan.instances().len(), 3);
        let last = plan.draws().last().unwrap();
        assert_eq!(last.run, 1);
        assert_eq!(last.instances, 2..3);
    }

    #[test]
    fn runs_without_text_are_not_queued() {
        let mut runs = TextRuns::default();
        runs.push(run(""));
        assert!(runs.is_empty());

        runs.push(run("A"));
        assert_eq!(runs.len(), 1);
    }

    #[test]
    fn taking_runs_clears_the_queue() {
        let mut runs = TextRuns::default();
        runs.push(run("A"));
        runs.push(run("AB"));

        let taken = runs.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].text, "AB");
        assert!(runs.is_empty());
        assert!(runs.take().is_empty());
    }

    #[test]
    fn every_frame_is_planned_from_its_own_runs_only() {
        let atlas = atlas();
        let mut runs = TextRuns::default();

        runs.push(run("AB"));
        runs.push(TextRun::new("AB", (0.0, 50.0), 0.5, Color::WHITE, Alignment::Left));
        let first = DrawPlan::build(&atlas, &runs.take());
        assert_eq!(first.instances().len(), 4);
        assert_eq!(first.draws().len(), 4);

        runs.push(run("A"));
        let second = DrawPlan::build(&atlas, &runs.take());
        assert_eq!(second.instances().len(), 1);
        assert_eq!(second.draws().len(), 1);
        assert_eq!(second.draws()[0].instances, 0..1);

        let idle = DrawPlan::build(&atlas, &runs.take());
        assert!(idle.is_empty());
        assert!(idle.instances().is_empty());
    }
}
