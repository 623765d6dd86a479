use alloc::collections::VecDeque;

use rand::{rngs::SmallRng, Rng};

use crate::{board::BoardView, common::Coord};

/// Anything that can pick the next shot for the acting side.
///
/// Sources only ever see the target board through a [`BoardView`], so they
/// cannot tell where unhit ships are. Returning `None` means the source has
/// nothing more to offer (script exhausted, input closed, board full).
pub trait ShotSource: Send {
    fn next_shot(&mut self, target: &BoardView<'_>, rng: &mut SmallRng) -> Option<Coord>;
}

/// Uniformly random pick among the cells not yet shot.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomShooter;

impl RandomShooter {
    pub fn new() -> Self {
        Self
    }
}

impl ShotSource for RandomShooter {
    fn next_shot(&mut self, target: &BoardView<'_>, rng: &mut SmallRng) -> Option<Coord> {
        let open = target.unshot_count();
        if open == 0 {
            return None;
        }
        let pick = rng.random_range(0..open);
        target.unshot_cells().nth(pick)
    }
}

/// Replays a fixed list of shots in order.
#[derive(Debug, Default, Clone)]
pub struct ScriptedShooter {
    queue: VecDeque<Coord>,
}

impl ScriptedShooter {
    pub fn new<I: IntoIterator<Item = Coord>>(shots: I) -> Self {
        Self {
            queue: shots.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ShotSource for ScriptedShooter {
    fn next_shot(&mut self, _target: &BoardView<'_>, _rng: &mut SmallRng) -> Option<Coord> {
        self.queue.pop_front()
    }
}
