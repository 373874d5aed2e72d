//! Per-rule driver: one grammar rule's running state machine.
//!
//! A `CommandParser` walks its fixed input list with a single cursor `idx`.
//! `Skip` and `TryTransition` verdicts advance the cursor and re-feed the
//! same key to the next input; `idx` strictly increases, so the re-feed loop
//! is bounded by the input count.

use crate::matcher::{Input, ParseResult};
use crate::{Cmd, CmdKind, Mode, ModeMask, MotionKind};
use core_keys::Key;
use smallvec::SmallVec;

/// What a completed rule synthesizes into. Variants carry the parameters the
/// pattern itself cannot express (which mode `I` switches to, whether `O`
/// opens above).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdTag {
    Move,
    Delete,
    Change,
    Yank,
    SwitchMove { mv: MotionKind, mode: Mode },
    SwitchMode(Mode),
    NewLine { up: bool, switch_mode: bool },
    Paste,
    PasteBefore,
    Custom(&'static str),
}

/// One grammar rule's running state.
#[derive(Debug, Clone)]
pub struct CommandParser {
    tag: CmdTag,
    valid_modes: ModeMask,
    inputs: SmallVec<[Input; 4]>,
    idx: usize,
}

impl CommandParser {
    pub(crate) fn new(tag: CmdTag, valid_modes: ModeMask, inputs: SmallVec<[Input; 4]>) -> Self {
        Self {
            tag,
            valid_modes,
            inputs,
            idx: 0,
        }
    }

    pub fn tag(&self) -> CmdTag {
        self.tag
    }

    pub fn valid_modes(&self) -> ModeMask {
        self.valid_modes
    }

    /// Advance this rule by one key. Returns `Accept` only when the final
    /// input accepts; the surrounding bank treats that as completion.
    pub fn parse(&mut self, mode: Mode, key: Key) -> ParseResult {
        if !self.valid_modes.intersects(mode.mask()) {
            return ParseResult::Fail;
        }
        while self.idx < self.inputs.len() {
            match self.inputs[self.idx].parse(key) {
                ParseResult::Accept => {
                    self.idx += 1;
                    return if self.idx == self.inputs.len() {
                        ParseResult::Accept
                    } else {
                        ParseResult::Continue
                    };
                }
                ParseResult::Continue => return ParseResult::Continue,
                ParseResult::Fail => return ParseResult::Fail,
                // Same key re-feeds the next input.
                ParseResult::Skip | ParseResult::TryTransition => self.idx += 1,
            }
        }
        ParseResult::Fail
    }

    pub fn reset(&mut self) {
        self.idx = 0;
        for input in &mut self.inputs {
            input.reset();
        }
    }

    /// Synthesize the command for a rule whose final input just accepted.
    ///
    /// The leading count (when the rule has one and it matched digits)
    /// becomes `Cmd.repeat`, defaulting to 1. Operators pick up the motion
    /// input's result when the rule carries one; the linewise and visual
    /// forms have none, yielding the documented `None` motion.
    pub fn result(&self) -> Cmd {
        let count = self.inputs.iter().find_map(Input::count_result);
        let motion = self.inputs.iter().find_map(Input::motion_result);
        let repeat = count.unwrap_or(1);
        match self.tag {
            CmdTag::Move => {
                let m = motion.expect("move rule carries a motion input");
                Cmd::new(m.repeat, CmdKind::Move(m.kind))
            }
            CmdTag::Delete => Cmd::new(repeat, CmdKind::Delete(motion)),
            CmdTag::Change => Cmd::new(repeat, CmdKind::Change(motion)),
            CmdTag::Yank => Cmd::new(repeat, CmdKind::Yank(motion)),
            // Count is ignored for plain mode switches.
            CmdTag::SwitchMove { mv, mode } => Cmd::new(1, CmdKind::SwitchMove { mv, mode }),
            CmdTag::SwitchMode(mode) => Cmd::new(1, CmdKind::SwitchMode(mode)),
            CmdTag::NewLine { up, switch_mode } => {
                Cmd::new(repeat, CmdKind::NewLine { up, switch_mode })
            }
            CmdTag::Paste => Cmd::new(repeat, CmdKind::Paste),
            CmdTag::PasteBefore => Cmd::new(repeat, CmdKind::PasteBefore),
            CmdTag::Custom(name) => Cmd::new(repeat, CmdKind::Custom(name)),
        }
    }
}
