//! Recursive branch geometry
//!
//! The tree is built once per shape change into a flat, pre-order list of
//! segments. Animation never touches this list; it only changes how the
//! segments are drawn.

use crate::config::{TreeConfig, THICKNESS_SHRINK};
use rand::Rng;

/// Distance of the root above the bottom edge
pub const ROOT_MARGIN: f64 = 20.0;

/// Branches shorter than this are not drawn and not subdivided further
pub const MIN_LENGTH: f64 = 2.0;

/// One drawn branch piece, in canvas pixels (y grows downward)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub thickness: f64,
    /// Recursion levels left from here outward; 0 is a twig tip
    pub depth_left: u32,
    /// `depth` of the config the tree was built from
    pub total_depth: u32,
}

/// Build the segment list for `config` on a `width` x `height` canvas.
///
/// Order is root first, then the whole left subtree, then the right one.
/// Each segment gets a single random angular offset in
/// `[-randomness, +randomness]` degrees drawn from `rng`.
pub fn build_tree<R: Rng>(config: &TreeConfig, width: u32, height: u32, rng: &mut R) -> Vec<Segment> {
    let mut segments = Vec::new();
    let root_x = width as f64 / 2.0;
    let root_y = height as f64 - ROOT_MARGIN;

    grow(
        config,
        rng,
        &mut segments,
        Node {
            x: root_x,
            y: root_y,
            angle: 90.0,
            length: config.length,
            thickness: config.thickness,
            depth: config.depth,
        },
    );

    segments
}

struct Node {
    x: f64,
    y: f64,
    angle: f64,
    length: f64,
    thickness: f64,
    depth: u32,
}

fn grow<R: Rng>(config: &TreeConfig, rng: &mut R, out: &mut Vec<Segment>, node: Node) {
    // The length floor is what ends recursion when shrink is close to 1
    if node.depth == 0 || !(node.length >= MIN_LENGTH) {
        return;
    }

    let spread = config.randomness.abs();
    let jitter = if spread > 0.0 { rng.gen_range(-spread..=spread) } else { 0.0 };
    let rad = (node.angle + jitter).to_radians();
    let x2 = node.x + node.length * rad.cos();
    let y2 = node.y - node.length * rad.sin();

    out.push(Segment {
        x1: node.x,
        y1: node.y,
        x2,
        y2,
        thickness: node.thickness,
        depth_left: node.depth,
        total_depth: config.depth,
    });

    let length = node.length * config.shrink;
    let thickness = node.thickness * THICKNESS_SHRINK;
    let depth = node.depth - 1;

    grow(
        config,
        rng,
        out,
        Node { x: x2, y: y2, angle: node.angle - config.angle, length, thickness, depth },
    );
    grow(
        config,
        rng,
        out,
        Node { x: x2, y: y2, angle: node.angle + config.angle, length, thickness, depth },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build(config: &TreeConfig, seed: u64) -> Vec<Segment> {
        let mut rng = StdRng::seed_from_u64(seed);
        build_tree(config, CANVAS_WIDTH, CANVAS_HEIGHT, &mut rng)
    }

    fn length(s: &Segment) -> f64 {
        (s.x2 - s.x1).hypot(s.y2 - s.y1)
    }

    fn straight(depth: u32) -> TreeConfig {
        TreeConfig {
            depth,
            angle: 25.0,
            length: 150.0,
            shrink: 0.67,
            thickness: 10.0,
            randomness: 0.0,
            ..TreeConfig::default()
        }
    }

    #[test]
    fn depth_one_is_a_single_vertical_trunk() {
        let segments = build(&straight(1), 1);
        assert_eq!(segments.len(), 1);

        let root = segments[0];
        assert!((root.x1 - 500.0).abs() < 1e-9);
        assert!((root.y1 - 630.0).abs() < 1e-9);
        assert!((root.x2 - 500.0).abs() < 1e-9);
        assert!((root.y2 - 480.0).abs() < 1e-9);
        assert_eq!(root.depth_left, 1);
        assert_eq!(root.total_depth, 1);
        assert!((root.thickness - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn depth_zero_and_short_roots_are_empty() {
        assert!(build(&straight(0), 1).is_empty());
        let tiny = TreeConfig { length: 1.5, ..straight(8) };
        assert!(build(&tiny, 1).is_empty());
    }

    #[test]
    fn segment_count_is_bounded_by_full_binary_tree() {
        for depth in 1..=12 {
            for shrink in [0.4, 0.67, 0.85, 0.99] {
                let config = TreeConfig { shrink, randomness: 20.0, ..straight(depth) };
                let count = build(&config, depth as u64).len();
                assert!(count > 0);
                assert!(count <= (1usize << (depth + 1)) - 1, "depth {depth} shrink {shrink}: {count}");
            }
        }
    }

    #[test]
    fn min_length_floor_prunes_deep_trees() {
        // 150 * 0.4^5 is already below 2, so only five levels survive
        let config = TreeConfig { shrink: 0.4, ..straight(14) };
        let segments = build(&config, 3);
        assert_eq!(segments.len(), (1 << 5) - 1);
        assert!(segments.iter().all(|s| length(s) >= MIN_LENGTH - 1e-9));
    }

    #[test]
    fn order_is_pre_order_left_first() {
        let segments = build(&straight(3), 1);
        assert_eq!(segments.len(), 7);
        let depths: Vec<u32> = segments.iter().map(|s| s.depth_left).collect();
        assert_eq!(depths, vec![3, 2, 1, 1, 2, 1, 1]);

        // Left child (angle 90 - 25) leans right on screen, then comes the right child
        assert!(segments[1].x2 > segments[1].x1);
        assert!(segments[4].x2 < segments[4].x1);
        // Children start where the parent ends
        assert_eq!((segments[1].x1, segments[1].y1), (segments[0].x2, segments[0].y2));
        assert_eq!((segments[4].x1, segments[4].y1), (segments[0].x2, segments[0].y2));
    }

    #[test]
    fn thickness_shrinks_per_level() {
        let segments = build(&straight(3), 1);
        assert!((segments[1].thickness - 7.5).abs() < 1e-9);
        assert!((segments[2].thickness - 5.625).abs() < 1e-9);
    }

    #[test]
    fn same_seed_gives_same_tree() {
        let config = TreeConfig { randomness: 15.0, ..straight(9) };
        assert_eq!(build(&config, 42), build(&config, 42));
    }

    /// Screen direction of a segment in math degrees
    fn heading(s: &Segment) -> f64 {
        (-(s.y2 - s.y1)).atan2(s.x2 - s.x1).to_degrees()
    }

    #[test]
    fn jitter_stays_within_randomness() {
        let randomness = 10.0;
        let baseline = build(&straight(6), 7);

        for seed in [7, 1234, 98_765] {
            let jittered = build(&TreeConfig { randomness, ..straight(6) }, seed);
            assert_eq!(jittered.len(), baseline.len());

            let mut turned = 0;
            for (j, b) in jittered.iter().zip(&baseline) {
                // Offsets never pile up down the tree: every segment is within one draw of its twin
                let offset = (heading(j) - heading(b) + 540.0).rem_euclid(360.0) - 180.0;
                assert!(offset.abs() <= randomness + 1e-9, "seed {seed}: offset {offset}");
                if offset.abs() > 1e-6 {
                    turned += 1;
                }
                assert_eq!(j.depth_left, b.depth_left);
                assert!((length(j) - length(b)).abs() < 1e-9);
            }
            assert!(turned > jittered.len() / 2, "seed {seed}: jitter barely applied");
        }
    }
}
