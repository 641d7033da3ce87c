//! RNG module - seeded 7-bag piece generation
//!
//! Each bag holds one of every piece kind, shuffled. Pieces are drawn until
//! the bag is empty, then a fresh bag is shuffled. Two queues built from the
//! same seed always yield the same sequence.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    seed: u32,
    bag: [PieceKind; 7],
    /// Index of the next piece in `bag`; 7 means exhausted
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let bag = Self::shuffled_bag(&mut rng);
        Self {
            seed,
            bag,
            bag_index: 0,
            rng,
        }
    }

    fn shuffled_bag(rng: &mut SimpleRng) -> [PieceKind; 7] {
        let mut bag = PieceKind::ALL;
        rng.shuffle(&mut bag);
        bag
    }

    /// The bag that the next refill will produce, without advancing the RNG
    fn preview_bag(&self) -> [PieceKind; 7] {
        Self::shuffled_bag(&mut self.rng.clone())
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.peek_n::<1>()[0]
    }

    /// Peek at the next `N` pieces, crossing into the next bag when needed
    ///
    /// `N` must not exceed 7.
    pub fn peek_n<const N: usize>(&self) -> [PieceKind; N] {
        let upcoming = self.preview_bag();
        let mut out = [PieceKind::I; N];
        for (i, slot) in out.iter_mut().enumerate() {
            let idx = self.bag_index + i;
            *slot = if idx < 7 {
                self.bag[idx]
            } else {
                upcoming[idx - 7]
            };
        }
        out
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= 7 {
            self.bag = Self::shuffled_bag(&mut self.rng);
            self.bag_index = 0;
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Seed this queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[cfg(test)]
    fn current_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
