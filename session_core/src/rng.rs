//! Named, seeded shuffle channels.
//!
//! Every channel owns its own generator, seeded from the same run seed the
//! first time it is used. Re-running with the same seed and the same input
//! reproduces every shuffle, which keeps output diffs limited to real content
//! changes.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shuffle channel names used across the pipeline.
pub mod channels {
    /// Answer choices of comprehension questions.
    pub const SCENARIO_CHOICES: &str = "scenario_choices";
    /// Thoughts / feelings / behaviors shown as timed text.
    pub const LONG_PAGES: &str = "long_pages";
    /// Order in which a domain's long scenarios are served.
    pub const LONG_SESSIONS: &str = "long_sessions";
    /// Which resource pool closes a dose.
    pub const RESOURCES: &str = "resources";
}

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 1;

/// Registry of seeded generators keyed by channel name.
#[derive(Debug, Clone)]
pub struct ShuffleRegistry {
    seed: u64,
    channels: HashMap<String, StdRng>,
}

impl ShuffleRegistry {
    /// Create a registry whose channels are all seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            channels: HashMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn channel(&mut self, name: &str) -> &mut StdRng {
        let seed = self.seed;
        self.channels
            .entry(name.to_string())
            .or_insert_with(|| StdRng::seed_from_u64(seed))
    }

    /// Shuffle `items` in place with the generator of `channel`.
    pub fn shuffle<T>(&mut self, channel: &str, items: &mut [T]) {
        items.shuffle(self.channel(channel));
    }

    /// Draw an index in `0..len` from `channel`. `len` must be non-zero.
    pub fn pick_index(&mut self, channel: &str, len: usize) -> usize {
        self.channel(channel).gen_range(0..len)
    }

    /// Number of channels used so far.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for ShuffleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
