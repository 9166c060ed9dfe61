//! Ordering of rebuilds.
//!
//! Every configuration change is stamped with a fresh [`RebuildToken`]. Wood
//! images load asynchronously and may finish in any order; only the
//! completion carrying the latest token may replace the rendered sign, so the
//! last request wins rather than the last load to finish.

use std::{future::Future, sync::Arc};

use image::RgbaImage;

use crate::{error::SignError, sign::config::SignConfiguration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RebuildToken(u64);

impl RebuildToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic generation counter.
#[derive(Debug, Default)]
pub struct RebuildGuard {
    generation: u64,
}

impl RebuildGuard {
    /// Invalidate every token handed out so far and return a new one.
    pub fn issue(&mut self) -> RebuildToken {
        self.generation += 1;
        RebuildToken(self.generation)
    }

    pub fn is_current(&self, token: RebuildToken) -> bool {
        token.0 == self.generation
    }
}

/// A snapshot of the configuration a rebuild was asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct RebuildRequest {
    pub token: RebuildToken,
    pub config: SignConfiguration,
}

impl RebuildRequest {
    /// Wait for the wood image and pair the outcome with this request.
    pub async fn resolve<F>(self, wood: F) -> RebuildCompletion
    where
        F: Future<Output = Result<Arc<RgbaImage>, SignError>>,
    {
        let wood = wood.await;
        RebuildCompletion {
            token: self.token,
            config: self.config,
            wood,
        }
    }
}

#[derive(Debug)]
pub struct RebuildCompletion {
    pub token: RebuildToken,
    pub config: SignConfiguration,
    pub wood: Result<Arc<RgbaImage>, SignError>,
}
