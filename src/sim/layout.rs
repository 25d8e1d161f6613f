//! Layout packer
//!
//! Places every entity on a hexagonal grid sized to the crowd:
//! 1. Pick a per-entity radius from arena area and a stepped packing density
//! 2. Generate hex candidates and center them in the arena
//! 3. Shrink and regenerate until there are enough candidates (bounded retries)
//! 4. Apply a stepped global shrink; the result becomes each base radius
//! 5. Shuffle candidates (seeded) and assign them 1:1, probing around duplicates

use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_3, FRAC_PI_4, PI};

use glam::Vec2;
use rand::seq::SliceRandom;

use super::entity::Entity;
use super::rng::{SimRng, rand_range};
use crate::grid_key;
use crate::tuning::LayoutTuning;

/// Probe angles per ring (every 45 degrees)
const PROBE_DIRECTIONS: u32 = 8;

/// Target radius before fitting, from arena area and crowd size
pub fn target_radius(count: usize, width: f32, height: f32, tuning: &LayoutTuning) -> f32 {
    let area = (width * height).max(1.0);
    let per_entity = area * tuning.packing_for(count) / count.max(1) as f32;
    // max/min rather than clamp: a hand-edited tuning file may invert the bounds
    (per_entity / PI)
        .sqrt()
        .max(tuning.min_radius)
        .min(tuning.max_radius)
}

/// Hex-grid candidate points for circles of `radius`, centered in the arena
pub fn hex_positions(radius: f32, width: f32, height: f32, tuning: &LayoutTuning) -> Vec<Vec2> {
    let margin = tuning.margin;
    let cell = 2.0 * radius + tuning.cell_padding;
    let dx = cell;
    let dy = cell * FRAC_PI_3.sin();
    let mut points = Vec::new();

    let mut row = 0u32;
    let mut y = margin;
    while y <= height - margin + 1e-6 {
        let offset = if row % 2 == 1 { dx / 2.0 } else { 0.0 };
        let mut x = margin + offset;
        while x <= width - margin + 1e-6 {
            points.push(Vec2::new(x, y));
            x += dx;
        }
        row += 1;
        y += dy;
    }

    if points.is_empty() {
        return points;
    }

    // Center the bounding box inside the arena
    let (min, max) = points
        .iter()
        .fold((Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let shift = (Vec2::new(width, height) - (max - min)) / 2.0 - min;
    let lo = Vec2::splat(margin);
    let hi = Vec2::new(width - margin, height - margin).max(lo);
    for p in &mut points {
        *p = (*p + shift).clamp(lo, hi);
    }
    points
}

/// Place every entity without overlap (best effort) and fit their radii.
pub fn layout_entities(
    rng: &mut SimRng,
    entities: &mut [Entity],
    width: f32,
    height: f32,
    tuning: &LayoutTuning,
) {
    let count = entities.len();
    if count == 0 {
        return;
    }

    let base = target_radius(count, width, height, tuning);

    let mut scale = 1.0;
    let mut positions = hex_positions(base, width, height, tuning);
    let mut retries = 0;
    while positions.len() < count && retries < tuning.shrink_retries {
        scale *= tuning.shrink_decay;
        positions = hex_positions(base * scale, width, height, tuning);
        retries += 1;
    }

    let fitted = (base * scale * tuning.global_shrink_for(count)).max(1.0);
    for e in entities.iter_mut() {
        e.set_base_radius(fitted);
    }

    positions.shuffle(rng);

    let mut placer = Placer {
        used: HashSet::with_capacity(count),
        width,
        height,
        tuning,
    };
    let mut collisions = 0usize;
    for (i, e) in entities.iter_mut().enumerate() {
        let pos = match positions.get(i) {
            Some(&candidate) if placer.claim(candidate) => candidate,
            Some(&candidate) => {
                collisions += 1;
                placer
                    .probe(candidate)
                    .unwrap_or_else(|| placer.random(rng))
            }
            None => placer.random(rng),
        };
        e.pos = pos;
    }

    log::info!(
        "Layout: {} entities in {}x{}, radius {:.2} (base {:.2}, {} retries, {} duplicates)",
        count,
        width,
        height,
        fitted,
        base,
        retries,
        collisions
    );
}

/// Tracks rounded coordinates already handed out
struct Placer<'a> {
    used: HashSet<(i32, i32)>,
    width: f32,
    height: f32,
    tuning: &'a LayoutTuning,
}

impl Placer<'_> {
    /// Mark a point as taken; false if its rounded key is already used
    fn claim(&mut self, pos: Vec2) -> bool {
        self.used.insert(grid_key(pos))
    }

    fn in_bounds(&self, pos: Vec2) -> bool {
        let m = self.tuning.margin;
        pos.x >= m && pos.x <= self.width - m && pos.y >= m && pos.y <= self.height - m
    }

    /// Look for a free slot on rings of growing radius around `origin`
    fn probe(&mut self, origin: Vec2) -> Option<Vec2> {
        let step = self.tuning.probe_step.max(f32::EPSILON);
        let mut offset = step;
        while offset <= self.tuning.probe_max {
            for k in 0..PROBE_DIRECTIONS {
                let angle = k as f32 * FRAC_PI_4;
                let candidate = origin + Vec2::new(angle.cos(), angle.sin()) * offset;
                if self.in_bounds(candidate) && self.claim(candidate) {
                    return Some(candidate);
                }
            }
            offset += step;
        }
        None
    }

    /// Random point inside the margins, rejecting duplicates for a few tries.
    /// Keeps the last draw if every attempt collides.
    fn random(&mut self, rng: &mut SimRng) -> Vec2 {
        let m = self.tuning.margin;
        let mut pos = Vec2::new(m, m);
        for _ in 0..self.tuning.fallback_attempts.max(1) {
            pos = Vec2::new(
                rand_range(rng, m, self.width - m),
                rand_range(rng, m, self.height - m),
            );
            if self.claim(pos) {
                break;
            }
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn crowd(n: u32) -> Vec<Entity> {
        (0..n).map(|i| Entity::new(i, format!("Follower {}", i + 1), None)).collect()
    }

    fn assert_unique(entities: &[Entity]) {
        let mut seen = HashSet::new();
        for e in entities {
            assert!(seen.insert(grid_key(e.pos)), "duplicate position {:?}", e.pos);
        }
    }

    #[test]
    fn test_empty_layout_is_noop() {
        let mut rng = SimRng::seeded("empty");
        let mut none: Vec<Entity> = Vec::new();
        layout_entities(&mut rng, &mut none, 800.0, 600.0, &LayoutTuning::default());
        assert!(none.is_empty());
    }

    #[test]
    fn test_layout_fits_inside_and_unique() {
        let tuning = LayoutTuning::default();
        let mut rng = SimRng::seeded("layout");
        let mut v = crowd(59);
        layout_entities(&mut rng, &mut v, 1280.0, 720.0, &tuning);
        assert_unique(&v);
        for e in &v {
            assert!(e.pos.x >= tuning.margin && e.pos.x <= 1280.0 - tuning.margin);
            assert!(e.pos.y >= tuning.margin && e.pos.y <= 720.0 - tuning.margin);
            assert!(e.radius > 0.0);
            assert_eq!(e.radius, e.base_radius);
            assert_eq!(e.radius, e.visual_radius);
        }
    }

    #[test]
    fn test_large_crowd_gets_smaller_radius() {
        let tuning = LayoutTuning::default();
        let mut rng = SimRng::seeded("crowd");
        let mut small = crowd(50);
        let mut large = crowd(3000);
        layout_entities(&mut rng, &mut small, 1920.0, 1080.0, &tuning);
        layout_entities(&mut rng, &mut large, 1920.0, 1080.0, &tuning);
        assert!(large[0].radius < small[0].radius);
        assert_unique(&large);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = LayoutTuning::default();
        let mut a = crowd(120);
        let mut b = crowd(120);
        layout_entities(&mut SimRng::seeded("abc"), &mut a, 1000.0, 800.0, &tuning);
        layout_entities(&mut SimRng::seeded("abc"), &mut b, 1000.0, 800.0, &tuning);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_hex_rows_are_offset() {
        let tuning = LayoutTuning::default();
        let points = hex_positions(10.0, 200.0, 200.0, &tuning);
        assert!(!points.is_empty());
        let first_row_y = points[0].y;
        let row0: Vec<_> = points.iter().filter(|p| p.y == first_row_y).collect();
        let row1_start = points.iter().find(|p| p.y > first_row_y).unwrap();
        assert!((row1_start.x - row0[0].x - 10.5).abs() < 1e-3);
    }

    #[test]
    fn test_tiny_arena_does_not_panic() {
        let mut rng = SimRng::seeded("tiny");
        let mut v = crowd(5);
        layout_entities(&mut rng, &mut v, 5.0, 5.0, &LayoutTuning::default());
        assert!(v.iter().all(|e| e.radius >= 1.0));
    }

    fn placer(tuning: &LayoutTuning) -> Placer<'_> {
        Placer {
            used: HashSet::new(),
            width: 400.0,
            height: 300.0,
            tuning,
        }
    }

    /// Every slot `probe` would try around `origin`, in visiting order
    fn ring_slots(origin: Vec2, tuning: &LayoutTuning) -> Vec<Vec2> {
        let mut slots = Vec::new();
        let mut offset = tuning.probe_step;
        while offset <= tuning.probe_max {
            for k in 0..PROBE_DIRECTIONS {
                let angle = k as f32 * FRAC_PI_4;
                slots.push(origin + Vec2::new(angle.cos(), angle.sin()) * offset);
            }
            offset += tuning.probe_step;
        }
        slots
    }

    #[test]
    fn test_probe_moves_duplicate_to_first_ring() {
        let tuning = LayoutTuning::default();
        let mut placer = placer(&tuning);
        let origin = Vec2::new(200.0, 150.0);
        assert!(placer.claim(origin));
        assert!(!placer.claim(origin));

        let pos = placer.probe(origin).expect("free slot on the first ring");
        assert!(placer.in_bounds(pos));
        assert!((pos.distance(origin) - tuning.probe_step).abs() < 1e-3);
        assert_ne!(grid_key(pos), grid_key(origin));
        // The probed slot is now taken
        assert!(!placer.claim(pos));
    }

    #[test]
    fn test_probe_skips_taken_and_out_of_bounds_slots() {
        let tuning = LayoutTuning::default();
        let mut placer = placer(&tuning);
        // Near the left margin, so the west side of each ring is off the arena
        let origin = Vec2::new(15.0, 150.0);
        placer.claim(origin);
        placer.claim(Vec2::new(25.0, 150.0));

        let pos = placer.probe(origin).expect("free slot");
        assert!(placer.in_bounds(pos));
        assert_ne!(grid_key(pos), (25, 150));
        assert!((pos.distance(origin) - tuning.probe_step).abs() < 1e-3);
    }

    #[test]
    fn test_full_rings_fall_back_to_random() {
        let tuning = LayoutTuning::default();
        let mut placer = placer(&tuning);
        let origin = Vec2::new(200.0, 150.0);
        placer.claim(origin);
        let slots = ring_slots(origin, &tuning);
        assert_eq!(slots.len(), 40);
        for slot in &slots {
            placer.claim(*slot);
        }

        assert_eq!(placer.probe(origin), None);
        let used_before = placer.used.len();
        let mut rng = SimRng::seeded("fallback");
        let pos = placer.random(&mut rng);
        assert!(placer.in_bounds(pos));
        assert_eq!(placer.used.len(), used_before + 1);
        assert!(slots.iter().all(|s| grid_key(*s) != grid_key(pos)));
    }

    #[test]
    fn test_inverted_radius_bounds_do_not_panic() {
        let tuning = LayoutTuning {
            min_radius: 40.0,
            max_radius: 20.0,
            ..LayoutTuning::default()
        };
        let r = target_radius(59, 1280.0, 720.0, &tuning);
        assert_eq!(r, 20.0);
        let mut v = crowd(10);
        layout_entities(&mut SimRng::seeded("inverted"), &mut v, 800.0, 600.0, &tuning);
        assert_unique(&v);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_layout_non_overlap(n in 1u32..400, w in 400.0f32..1600.0, h in 300.0f32..1000.0, seed in "[a-z]{1,8}") {
            let mut rng = SimRng::seeded(&seed);
            let mut v = crowd(n);
            layout_entities(&mut rng, &mut v, w, h, &LayoutTuning::default());
            let mut seen = HashSet::new();
            for e in &v {
                prop_assert!(seen.insert(grid_key(e.pos)));
            }
        }
    }
}
