//! Roller port - the engine's injected source of randomness
//!
//! Mirrors the clock-port pattern: the interpreter never calls the RNG
//! directly, so tests can force specific rolls (a forced 100 must always
//! fail a skill check, a forced 1 must pass any reachable one).

use std::collections::VecDeque;

use rand::Rng;

pub trait Roller: Send {
    /// A d100 roll in 1..=100.
    fn d100(&mut self) -> i64;

    /// A uniform index in 0..len. `len` is always nonzero at call sites.
    fn pick(&mut self, len: usize) -> usize;
}

/// Production roller backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadRoller;

impl Roller for ThreadRoller {
    fn d100(&mut self) -> i64 {
        rand::thread_rng().gen_range(1..=100)
    }

    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic roller fed from queues. When a queue runs dry it keeps
/// returning the last value, so a single forced roll covers a whole test.
#[derive(Debug)]
pub struct ScriptedRoller {
    rolls: VecDeque<i64>,
    picks: VecDeque<usize>,
    last_roll: i64,
    last_pick: usize,
}

impl Default for ScriptedRoller {
    fn default() -> Self {
        Self {
            rolls: VecDeque::new(),
            picks: VecDeque::new(),
            last_roll: 1,
            last_pick: 0,
        }
    }
}

impl ScriptedRoller {
    pub fn with_rolls(rolls: Vec<i64>) -> Self {
        Self {
            rolls: rolls.into(),
            picks: VecDeque::new(),
            last_roll: 1,
            last_pick: 0,
        }
    }

    pub fn with_picks(picks: Vec<usize>) -> Self {
        Self {
            rolls: VecDeque::new(),
            picks: picks.into(),
            last_roll: 1,
            last_pick: 0,
        }
    }

    pub fn queue_roll(&mut self, roll: i64) {
        self.rolls.push_back(roll);
    }

    pub fn queue_pick(&mut self, pick: usize) {
        self.picks.push_back(pick);
    }
}

impl Roller for ScriptedRoller {
    fn d100(&mut self) -> i64 {
        if let Some(roll) = self.rolls.pop_front() {
            self.last_roll = roll;
        }
        self.last_roll
    }

    fn pick(&mut self, len: usize) -> usize {
        if let Some(pick) = self.picks.pop_front() {
            self.last_pick = pick;
        }
        self.last_pick.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_roller_stays_in_range() {
        let mut roller = ThreadRoller;
        for _ in 0..200 {
            let roll = roller.d100();
            assert!((1..=100).contains(&roll));
            assert!(roller.pick(3) < 3);
        }
    }

    #[test]
    fn scripted_roller_replays_then_repeats_last() {
        let mut roller = ScriptedRoller::with_rolls(vec![100, 7]);
        assert_eq!(roller.d100(), 100);
        assert_eq!(roller.d100(), 7);
        assert_eq!(roller.d100(), 7);
    }

    #[test]
    fn scripted_pick_clamps_to_pool() {
        let mut roller = ScriptedRoller::with_picks(vec![9]);
        assert_eq!(roller.pick(3), 2);
    }
}
