#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns one frame of player input into world commands.
//!
//! The director never inspects terrain itself. It gates input on the support
//! classification the world stored while resolving the previous frame, and
//! emits a complete, ordered frame: `Tick`, the player's movement commands,
//! then `ResolveFrame`. Applying that batch in order guarantees movement
//! integration happens before probing, probing before clamping, and clamping
//! before entity contacts are checked.

use std::time::Duration;

use superfco_core::{Command, FrameInput, PlayerSnapshot};

/// Fraction of the walking speed available while submerged.
pub const WATER_LATERAL_FACTOR: f32 = 0.5;

/// Frame orchestrator that maps input to movement commands.
#[derive(Debug, Default)]
pub struct Director {
    scratch: Vec<Command>,
}

impl Director {
    /// Creates a director with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the ordered command batch for one frame of `dt`.
    pub fn handle(
        &mut self,
        dt: Duration,
        input: FrameInput,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();
        self.scratch.push(Command::Tick { dt });
        if !player.is_dead {
            self.steer(dt, input, player);
        }
        self.scratch.push(Command::ResolveFrame);

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn steer(&mut self, dt: Duration, input: FrameInput, player: &PlayerSnapshot) {
        let support = player.support;
        let out = &mut self.scratch;

        if support.has_support {
            out.push(Command::HaltPlayer);
        }

        let pace = if support.in_water {
            WATER_LATERAL_FACTOR
        } else {
            1.0
        };
        let can_walk = support.has_footing || support.in_water;
        if input.right && can_walk {
            out.push(Command::MoveLateral {
                direction: pace,
                dt,
            });
        }
        if input.left && can_walk {
            out.push(Command::MoveLateral {
                direction: -pace,
                dt,
            });
        }

        if input.up {
            if support.is_clinging() {
                out.push(Command::MoveVertical {
                    direction: -1.0,
                    dt,
                });
            } else if support.on_floor {
                out.push(Command::Jump { dt });
            }
        }
        if input.down && (support.has_support || support.in_water) {
            out.push(Command::MoveVertical { direction: 1.0, dt });
        }

        if input.up_right && support.has_footing && !support.against_right {
            out.push(Command::JumpLateral { direction: 1.0, dt });
        }
        if input.up_left && support.has_footing && !support.against_left {
            out.push(Command::JumpLateral {
                direction: -1.0,
                dt,
            });
        }

        if support.in_water {
            for (pressed, side) in [(input.down_right, 1.0), (input.down_left, -1.0)] {
                if pressed {
                    out.push(Command::MoveLateral {
                        direction: side * pace,
                        dt,
                    });
                    out.push(Command::MoveVertical { direction: 1.0, dt });
                }
            }
        }

        if support.is_floating {
            out.push(Command::Fall { dt });
        }
        if support.in_water {
            out.push(Command::Dive { dt });
        }
    }
}
