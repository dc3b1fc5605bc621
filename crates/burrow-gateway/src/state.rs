use std::sync::Arc;

use burrow_core::{Repository, UrlCache};
use burrow_generator::RandomGenerator;
use burrow_shortener::ShortenerService;

/// The service as wired by the binary: backends chosen at runtime.
pub type Shortener = ShortenerService<Arc<dyn Repository>, Arc<dyn UrlCache>, RandomGenerator>;

#[derive(Clone)]
pub struct AppState {
    shortener: Shortener,
}

impl AppState {
    pub fn new(shortener: Shortener) -> Self {
        Self { shortener }
    }

    pub fn shortener(&self) -> &Shortener {
        &self.shortener
    }
}
