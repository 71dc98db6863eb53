// src/core/cluster/selector.rs

//! Picks the order in which a client tries cluster masters.
//!
//! Every client draws a random starting offset and walks the master list as
//! a ring from there, so connection attempts spread across the cluster
//! instead of piling onto the first configured master. The result is a
//! rotation, never a shuffle: the masters' relative order is preserved.

use crate::core::cluster::config::MasterConfig;
use crate::core::errors::OpalKVError;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Selects a randomized rotation of cluster masters.
///
/// The selector owns its generator, so tests can inject a seeded one via
/// [`MasterSelector::with_rng`]. Concurrent call sites each construct their
/// own selector; `select` takes `&mut self`.
pub struct MasterSelector<R = SmallRng> {
    rng: R,
}

impl MasterSelector<SmallRng> {
    /// Creates a selector with an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl Default for MasterSelector<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MasterSelector<R> {
    /// Creates a selector around a caller-supplied generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Returns masters in list order starting from a random offset, wrapping
    /// past the end, while the accumulated result holds at most `cap`
    /// entries; the push that crosses `cap` still lands, so callers receive
    /// up to `cap + 1` masters.
    ///
    /// An empty master list is an error: there is no offset to draw.
    pub fn select(
        &mut self,
        masters: &[MasterConfig],
        cap: usize,
    ) -> Result<Vec<MasterConfig>, OpalKVError> {
        if masters.is_empty() {
            return Err(OpalKVError::NoClusterMasters);
        }

        let offset = self.rng.gen_range(0..masters.len());
        let mut ls = Vec::new();

        for m in &masters[offset..] {
            if ls.len() > cap {
                break;
            }
            ls.push(m.clone());
        }

        for m in &masters[..offset] {
            if ls.len() > cap {
                break;
            }
            ls.push(m.clone());
        }

        Ok(ls)
    }
}
