pub mod random;

use burrow_core::ShortCode;

pub use random::RandomGenerator;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness is not guaranteed: the caller relies on the repository's
/// atomic insert to detect collisions.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}
