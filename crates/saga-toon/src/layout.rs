//! Node placement for map documents that carry no coordinates.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use saga_core::config::LayoutConfig;
use saga_core::graph::DEFAULT_NODE_SIZE;

/// Position and visual size for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Supplies a placement for each decoded node.
///
/// `index` is the node's position in the decoded node list. Any
/// `FnMut(usize, &str) -> Placement` closure is a layout.
pub trait Layout {
    fn place(&mut self, index: usize, node_id: &str) -> Placement;
}

impl<F> Layout for F
where
    F: FnMut(usize, &str) -> Placement,
{
    fn place(&mut self, index: usize, node_id: &str) -> Placement {
        self(index, node_id)
    }
}

/// Uniform scatter inside an inset square, e.g. [10, 90) on both axes.
///
/// A seeded scatter replays the same coordinates for the same node sequence.
#[derive(Debug, Clone)]
pub struct Scatter {
    rng: SmallRng,
    min: f64,
    max: f64,
    size: f64,
}

impl Scatter {
    pub const DEFAULT_MIN: f64 = 10.0;
    pub const DEFAULT_MAX: f64 = 90.0;

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    /// Different coordinates on every run.
    pub fn from_entropy() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Seeded when the config pins a seed, entropy otherwise.
    pub fn from_config(config: &LayoutConfig) -> Self {
        let scatter = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        };
        scatter
            .with_range(config.inset_min, config.inset_max)
            .with_size(config.node_size)
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
            size: DEFAULT_NODE_SIZE,
        }
    }

    /// Restrict coordinates to `[min, max)`. An empty range pins every node at `min`.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    fn coordinate(&mut self) -> f64 {
        if self.max > self.min {
            self.rng.random_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

impl Layout for Scatter {
    fn place(&mut self, _index: usize, _node_id: &str) -> Placement {
        let x = self.coordinate();
        let y = self.coordinate();
        Placement {
            x,
            y,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(layout: &mut impl Layout, n: usize) -> Vec<Placement> {
        (0..n).map(|i| layout.place(i, "n")).collect()
    }

    #[test]
    fn test_scatter_stays_inside_inset() {
        let mut scatter = Scatter::seeded(7);
        for p in sample(&mut scatter, 500) {
            assert!((10.0..90.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((10.0..90.0).contains(&p.y), "y out of range: {}", p.y);
            assert_eq!(p.size, 6.0);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = sample(&mut Scatter::seeded(42), 20);
        let b = sample(&mut Scatter::seeded(42), 20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = sample(&mut Scatter::seeded(1), 20);
        let b = sample(&mut Scatter::seeded(2), 20);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_range_pins_to_min() {
        let mut scatter = Scatter::seeded(3).with_range(50.0, 50.0);
        let p = scatter.place(0, "n");
        assert_eq!((p.x, p.y), (50.0, 50.0));
    }

    #[test]
    fn test_from_config_honors_range_and_size() {
        let config = LayoutConfig {
            seed: Some(9),
            inset_min: 40.0,
            inset_max: 60.0,
            node_size: 3.0,
        };
        let mut scatter = Scatter::from_config(&config);
        for p in sample(&mut scatter, 100) {
            assert!((40.0..60.0).contains(&p.x));
            assert_eq!(p.size, 3.0);
        }
    }

    #[test]
    fn test_closure_is_a_layout() {
        let mut grid = |i: usize, _: &str| Placement {
            x: i as f64 * 10.0,
            y: 5.0,
            size: 1.0,
        };
        assert_eq!(grid.place(3, "n").x, 30.0);
    }
}
