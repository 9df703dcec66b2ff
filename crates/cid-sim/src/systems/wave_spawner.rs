//! Wave spawning system: wave cadence and enemy roster spawning.

use std::collections::BTreeMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;

use cid_core::defender::Defender;
use cid_core::enums::DefenderId;

use cid_threat_ai::wave::generate_wave;

/// Counts time between waves. Only advanced while playing.
#[derive(Debug, Clone, Default)]
pub struct WaveClock {
    /// Last wave spawned (0 before the first).
    pub wave_number: u32,
    pub max_waves: u32,
    pub interval_secs: f64,
    pub timer_secs: f64,
}

impl WaveClock {
    /// The first wave comes due `first_delay_secs` after the session starts.
    /// A run always has at least one wave.
    pub fn new(max_waves: u32, interval_secs: f64, first_delay_secs: f64) -> Self {
        Self {
            wave_number: 0,
            max_waves: max_waves.max(1),
            interval_secs,
            timer_secs: interval_secs - first_delay_secs,
        }
    }

    pub fn all_spawned(&self) -> bool {
        self.wave_number >= self.max_waves
    }

    /// Seconds until the next wave, or `None` once every wave is out.
    pub fn next_wave_in(&self) -> Option<f64> {
        (!self.all_spawned()).then(|| (self.interval_secs - self.timer_secs).max(0.0))
    }

    /// Advance the timer. Returns the number of the wave that just came due.
    pub fn advance(&mut self, dt: f64) -> Option<u32> {
        if self.all_spawned() {
            return None;
        }
        self.timer_secs += dt;
        if self.timer_secs >= self.interval_secs {
            self.timer_secs = 0.0;
            self.wave_number += 1;
            Some(self.wave_number)
        } else {
            None
        }
    }
}

/// Generate and spawn the roster for `wave_number` against all defenders.
/// Returns the number of enemies spawned.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    wave_number: u32,
    defenders: &BTreeMap<DefenderId, Defender>,
    next_enemy_id: &mut u32,
) -> u32 {
    // Sized from every pillar; enemies assigned to a compromised one retarget.
    let ids: Vec<DefenderId> = defenders.keys().copied().collect();

    let roster = generate_wave(wave_number, &ids, rng);
    for enemy in &roster {
        crate::world_setup::spawn_enemy(world, *next_enemy_id, wave_number, enemy);
        *next_enemy_id += 1;
    }
    roster.len() as u32
}
