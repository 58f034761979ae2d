//! Headless play-through of a sequence of levels.

use std::time::Duration;

use anyhow::{Context, Result};
use superfco_core::{Command, Event, FrameInput, TileGrid, Tuning};
use superfco_system_director::Director;
use superfco_world::{apply, query, World};

/// How a play-through ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every level's goal was reached.
    Completed { frames: u64 },
    /// The player ran out of lives on `level`.
    GameOver { frames: u64, level: usize },
    /// The frame budget ran out while playing `level`.
    OutOfFrames { frames: u64, level: usize },
}

/// Owns the active world and replays input against it frame by frame.
pub(crate) struct Session {
    levels: Vec<TileGrid>,
    tuning: Tuning,
    lives: u32,
    level: usize,
    world: World,
    director: Director,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    /// Starts on the first of `levels` with `lives` attempts in total.
    pub(crate) fn new(levels: Vec<TileGrid>, tuning: Tuning, lives: u32) -> Result<Self> {
        let first = levels.first().context("at least one level is required")?;
        let world = World::new(first.clone(), tuning)?;
        Ok(Self {
            levels,
            tuning,
            lives,
            level: 0,
            world,
            director: Director::new(),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Plays `frames` frames of `dt`, feeding `inputs` in order and idling
    /// once they run out.
    pub(crate) fn run(
        &mut self,
        dt: Duration,
        frames: u64,
        inputs: &[FrameInput],
    ) -> Result<Outcome> {
        for frame in 0..frames {
            let input = usize::try_from(frame)
                .ok()
                .and_then(|index| inputs.get(index))
                .copied()
                .unwrap_or_default();
            let played = frame + 1;

            let player = query::player(&self.world);
            self.director
                .handle(dt, input, &player, &mut self.commands);
            self.events.clear();
            for command in self.commands.drain(..) {
                apply(&mut self.world, command, &mut self.events);
            }

            if self.player_died() {
                self.lives = self.lives.saturating_sub(1);
                tracing::info!(frame = played, lives = self.lives, "life lost");
                if self.lives == 0 {
                    return Ok(Outcome::GameOver {
                        frames: played,
                        level: self.level,
                    });
                }
                self.load_level(self.level)?;
            } else if query::is_complete(&self.world) {
                tracing::info!(frame = played, level = self.level, "level complete");
                if self.level + 1 == self.levels.len() {
                    return Ok(Outcome::Completed { frames: played });
                }
                self.load_level(self.level + 1)?;
            }
        }

        Ok(Outcome::OutOfFrames {
            frames,
            level: self.level,
        })
    }

    fn player_died(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::PlayerDied { .. }))
    }

    fn load_level(&mut self, level: usize) -> Result<()> {
        let grid = self
            .levels
            .get(level)
            .with_context(|| format!("level {level} does not exist"))?;
        self.world = World::new(grid.clone(), self.tuning)?;
        self.level = level;
        Ok(())
    }
}
