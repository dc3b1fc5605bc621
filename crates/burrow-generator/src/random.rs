use crate::Generator;
use burrow_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use burrow_core::{CoreError, ShortCode};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Default number of characters in a generated code.
pub const DEFAULT_LENGTH: usize = 6;

/// Draws fixed-length codes from `[A-Za-z0-9]` using the OS-seeded
/// thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// Fails when `length` falls outside the valid short code range.
    pub fn new(length: usize) -> Result<Self, CoreError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(CoreError::InvalidInput(format!(
                "generated code length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}"
            )));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let code: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
