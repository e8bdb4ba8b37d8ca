//! Entropy port for drawing random code tails.

/// Source of uniformly distributed indices.
///
/// Random tails are built one character at a time by picking an index into
/// the segment's alphabet. Abstracting the source allows seeded and replayed
/// generation.
pub trait Entropy: Send + Sync {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn pick(&self, bound: usize) -> usize;
}
