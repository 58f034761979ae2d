//! Scripted input sequences replayed one frame at a time.
//!
//! A script is a comma-separated list of steps. Each step names the numpad
//! keys held during the step, optionally followed by `*count` to hold them
//! for several frames: `6*30,8,9*2,*60` walks right for 30 frames, jumps,
//! jumps diagonally for two frames and then idles for 60. Keys `0` and `5`
//! are accepted as explicit idle.

use superfco_core::FrameInput;
use thiserror::Error;

const STEP_DELIMITER: char = ',';
const REPEAT_MARKER: char = '*';

/// Reasons a script cannot be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// A step holds a character that is not a numpad digit.
    #[error("step {step} holds `{character}`, expected numpad digits")]
    InvalidKey { step: usize, character: char },
    /// A step's repeat count is not a positive integer.
    #[error("step {step} has repeat count `{count}`, expected a positive integer")]
    InvalidCount { step: usize, count: String },
}

/// Expands `script` into one input per frame.
pub(crate) fn parse_script(script: &str) -> Result<Vec<FrameInput>, ScriptError> {
    let mut frames = Vec::new();
    if script.trim().is_empty() {
        return Ok(frames);
    }

    for (step, token) in script.split(STEP_DELIMITER).enumerate() {
        let token = token.trim();
        let (keys, count) = match token.split_once(REPEAT_MARKER) {
            Some((keys, count)) => (keys, parse_count(step, count)?),
            None => (token, 1),
        };

        if let Some(character) = keys.chars().find(|key| !key.is_ascii_digit()) {
            return Err(ScriptError::InvalidKey { step, character });
        }

        let input = FrameInput::from_numpad(keys);
        frames.extend(std::iter::repeat(input).take(count));
    }
    Ok(frames)
}

fn parse_count(step: usize, count: &str) -> Result<usize, ScriptError> {
    match count.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ScriptError::InvalidCount {
            step,
            count: count.to_owned(),
        }),
    }
}
