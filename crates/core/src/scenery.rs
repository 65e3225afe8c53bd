//! Decorative world objects.
//!
//! Clouds and trees are scattered once at startup from a seed and never move.
//! Stars are not stored at all: [`is_star_at`] decides presence from the world
//! coordinates, so any region of the sky can be drawn without generating it.

use crate::config::WorldConfig;
use crate::rng::SimpleRng;

pub const CLOUD_SPRITE: [&str; 3] = ["  ~~  ", "~~~~~~", "  ~~  "];
pub const TREE_SPRITE: [&str; 3] = ["  ^  ", " /|\\ ", "  |  "];

/// Clouds float this many units above the ground, inclusive.
pub const CLOUD_BAND: (i32, i32) = (10, 30);

/// Roughly three cells in a hundred hold a star.
const STAR_DENSITY_PERCENT: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropKind {
    Cloud,
    Tree,
}

impl PropKind {
    pub fn sprite(self) -> &'static [&'static str] {
        match self {
            PropKind::Cloud => &CLOUD_SPRITE,
            PropKind::Tree => &TREE_SPRITE,
        }
    }
}

/// A placed decoration; `(x, y)` is the top-left of its sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prop {
    pub kind: PropKind,
    pub x: i32,
    pub y: i32,
}

impl Prop {
    pub fn width(&self) -> i32 {
        self.kind
            .sprite()
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as i32
    }

    pub fn height(&self) -> i32 {
        self.kind.sprite().len() as i32
    }
}

/// Every decoration placed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scenery {
    seed: u64,
    props: Vec<Prop>,
}

impl Scenery {
    /// Scatter `clouds` clouds and `trees` trees across the world width.
    ///
    /// The same seed and world always produce the same layout.
    pub fn generate(world: &WorldConfig, clouds: usize, trees: usize, seed: u64) -> Self {
        let mut rng = SimpleRng::new(seed);
        let mut props = Vec::with_capacity(clouds + trees);

        let (low, high) = CLOUD_BAND;
        for _ in 0..clouds {
            let x = rng.next_below(world.world_width);
            let lift = low + rng.next_below(high - low + 1);
            props.push(Prop {
                kind: PropKind::Cloud,
                x,
                y: world.ground_level - lift,
            });
        }

        let tree_height = TREE_SPRITE.len() as i32;
        for _ in 0..trees {
            props.push(Prop {
                kind: PropKind::Tree,
                x: rng.next_below(world.world_width),
                y: world.ground_level - tree_height,
            });
        }

        Self { seed, props }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn clouds(&self) -> impl Iterator<Item = &Prop> {
        self.props.iter().filter(|p| p.kind == PropKind::Cloud)
    }

    pub fn trees(&self) -> impl Iterator<Item = &Prop> {
        self.props.iter().filter(|p| p.kind == PropKind::Tree)
    }

    /// Props whose sprite overlaps the `width x height` window at `(left, top)`.
    pub fn visible(
        &self,
        left: i32,
        top: i32,
        width: i32,
        height: i32,
    ) -> impl Iterator<Item = &Prop> {
        let right = left.saturating_add(width);
        let bottom = top.saturating_add(height);
        self.props.iter().filter(move |p| {
            p.x.saturating_add(p.width()) > left
                && p.x < right
                && p.y.saturating_add(p.height()) > top
                && p.y < bottom
        })
    }
}

/// Deterministic star test over world coordinates.
pub fn is_star_at(x: i32, y: i32) -> bool {
    let h = (x as i64).wrapping_mul(73_856_093) ^ (y as i64).wrapping_mul(19_349_663);
    h.unsigned_abs() % 100 < STAR_DENSITY_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let world = WorldConfig::default();
        let a = Scenery::generate(&world, 50, 50, 99);
        let b = Scenery::generate(&world, 50, 50, 99);
        assert_eq!(a, b);

        let c = Scenery::generate(&world, 50, 50, 100);
        assert_ne!(a.props(), c.props());
    }

    #[test]
    fn counts_match_request() {
        let world = WorldConfig::default();
        let s = Scenery::generate(&world, 7, 3, 1);
        assert_eq!(s.clouds().count(), 7);
        assert_eq!(s.trees().count(), 3);
        assert!(Scenery::generate(&world, 0, 0, 1).props().is_empty());
    }

    #[test]
    fn placement_respects_world() {
        let world = WorldConfig::default();
        let s = Scenery::generate(&world, 200, 200, 4242);
        for p in s.props() {
            assert!((0..world.world_width).contains(&p.x));
            match p.kind {
                PropKind::Tree => assert_eq!(p.y + p.height(), world.ground_level),
                PropKind::Cloud => {
                    let lift = world.ground_level - p.y;
                    assert!((CLOUD_BAND.0..=CLOUD_BAND.1).contains(&lift), "lift {lift}");
                }
            }
        }
    }

    #[test]
    fn visible_filters_by_window() {
        let world = WorldConfig::default();
        let s = Scenery::generate(&world, 0, 20, 5);
        let tree = s.props()[0];
        assert!(s.visible(tree.x, tree.y, 1, 1).any(|p| *p == tree));
        assert_eq!(s.visible(tree.x, world.ground_level + 10, 80, 24).count(), 0);
    }

    #[test]
    fn star_hash_matches_reference_values() {
        // h(0, 0) = 0, which is a star.
        assert!(is_star_at(0, 0));
        // h(1, 0) = 73856093 -> 93.
        assert!(!is_star_at(1, 0));
        // h(0, -1) = -19349663 -> |h| % 100 = 63.
        assert!(!is_star_at(0, -1));
    }

    #[test]
    fn star_density_is_sparse() {
        let mut stars = 0;
        for y in -200..0 {
            for x in 0..200 {
                if is_star_at(x, y) {
                    stars += 1;
                }
            }
        }
        let share = stars as f64 / 40_000.0;
        assert!(share > 0.005 && share < 0.08, "share {share}");
    }
}
