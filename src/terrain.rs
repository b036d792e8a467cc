//! Scrolling mountain ridge. Generated once per run as a chain of flat or
//! 45-degree segments clamped to a height band. Cosmetic plus minimap; the
//! gameplay ground level itself is flat.

use crate::scene::{SpriteInstance, SpriteKind};

/// Segment count across the whole world.
const NUM_SEGMENTS: usize = 192;
/// Ridge height band above the gameplay ground, pixels.
const MIN_RIDGE: f32 = 60.0;
const MAX_RIDGE: f32 = 220.0;
/// Ridge line color.
const RIDGE_COLOR: u32 = 0x89C498FF;
/// Drawn line thickness.
const LINE_WIDTH: f32 = 3.0;

pub struct Terrain {
    /// Ridge y per segment boundary (world space), `NUM_SEGMENTS + 1` entries.
    heights: Vec<f32>,
    segment_w: f32,
    world_w: f32,
}

impl Terrain {
    pub fn generate(world_w: f32, ground_y: f32, rng: &mut fastrand::Rng) -> Self {
        let segment_w = world_w / NUM_SEGMENTS as f32;
        let y_min = ground_y - MAX_RIDGE;
        let y_max = ground_y - MIN_RIDGE;

        let mut heights = Vec::with_capacity(NUM_SEGMENTS + 1);
        heights.push(y_max - rng.f32() * (y_max - y_min) * 0.5);
        for _ in 0..NUM_SEGMENTS {
            // flat or 45-degree slope per segment
            let slope = rng.i32(-1..=1) as f32;
            let y = (heights[heights.len() - 1] + slope * segment_w).clamp(y_min, y_max);
            heights.push(y);
        }

        Self {
            heights,
            segment_w,
            world_w,
        }
    }

    /// Ridge height at a world x, linearly interpolated. X is clamped to
    /// the world span.
    pub fn sample(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, self.world_w);
        let fidx = x / self.segment_w;
        let i = (fidx as usize).min(self.heights.len() - 2);
        let t = fidx - i as f32;
        self.heights[i] + (self.heights[i + 1] - self.heights[i]) * t
    }

    /// Append the visible ridge segments as thin quads.
    pub fn build_instances(&self, offset: f32, screen_w: f32, buf: &mut Vec<SpriteInstance>) {
        for i in 0..self.heights.len() - 1 {
            let x0 = i as f32 * self.segment_w + offset;
            let x1 = x0 + self.segment_w;
            if x1 < 0.0 || x0 > screen_w {
                continue;
            }
            let y0 = self.heights[i];
            let y1 = self.heights[i + 1];
            buf.push(SpriteInstance {
                pos: [(x0 + x1) * 0.5, (y0 + y1) * 0.5],
                size: [self.segment_w, (y1 - y0).abs().max(LINE_WIDTH)],
                color: RIDGE_COLOR,
                kind: SpriteKind::Ridge,
                flip_x: y1 < y0,
            });
        }
    }
}
