use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fair coin used to decide whether a device raises an alarm this tick.
pub trait CoinSource: Send {
    fn flip(&mut self) -> bool;
}

#[derive(Debug)]
pub struct RandomCoins {
    rng: StdRng,
}

impl RandomCoins {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CoinSource for RandomCoins {
    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Replays a fixed sequence of flips, then keeps answering `false`.
#[derive(Debug, Default, Clone)]
pub struct ScriptedCoins {
    flips: VecDeque<bool>,
}

impl ScriptedCoins {
    pub fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Self {
            flips: flips.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.flips.len()
    }
}

impl CoinSource for ScriptedCoins {
    fn flip(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}
