use log::trace;
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::model::{Grid, Position};

/// Probability that a spawned tile is a 2 rather than a 4
pub const TWO_PROBABILITY: f64 = 0.9;

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// 32-bit xorshift generator. Reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Substituted for a zero seed, which would make xorshift emit zeros forever
    pub const DEFAULT_SEED: u32 = 123_456_789;

    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { Self::DEFAULT_SEED } else { seed };
        Self { state }
    }

    /// Standard xorshift32 step; every shift is a logical `u32` shift
    pub fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }
}

impl RandomSource for Xorshift32 {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Non-deterministic source backed by the thread-local RNG
pub struct SystemRandom {
    rng: ThreadRng,
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self { rng: rand::rng() }
    }
}

impl RandomSource for SystemRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Places new tiles into empty cells.
pub struct RandomSpawner {
    source: Box<dyn RandomSource>,
    seed: Option<u32>,
}

impl std::fmt::Debug for RandomSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RandomSpawner {{seed: {:?}}}", self.seed)
    }
}

impl Default for RandomSpawner {
    fn default() -> Self {
        Self::system()
    }
}

impl RandomSpawner {
    pub fn seeded(seed: u32) -> Self {
        Self {
            source: Box::new(Xorshift32::new(seed)),
            seed: Some(seed),
        }
    }

    pub fn system() -> Self {
        Self {
            source: Box::new(SystemRandom::default()),
            seed: None,
        }
    }

    pub fn from_seed(seed: Option<u32>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::system(),
        }
    }

    pub fn with_source(source: Box<dyn RandomSource>) -> Self {
        Self { source, seed: None }
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// Writes a 2 or a 4 into a uniformly chosen empty cell and returns where it went.
    /// Returns `None` when the grid is full.
    pub fn spawn(&mut self, grid: &mut Grid) -> Option<Position> {
        let empties = grid.empty_cells();
        if empties.is_empty() {
            return None;
        }
        let index = (self.source.next_f64() * empties.len() as f64) as usize;
        let position = empties[index.min(empties.len() - 1)];
        let value = if self.source.next_f64() < TWO_PROBABILITY {
            2
        } else {
            4
        };
        grid.set(position.row, position.col, value);
        trace!(target: "spawner", "Spawned {} at {:?}", value, position);
        Some(position)
    }
}
