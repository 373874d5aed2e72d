//! ModalParser: multiplexes keys across the rule bank and emits commands.
//!
//! One `feed()` per keystroke, no lookahead, no internal queues. The bank
//! scans non-failed rules in registration order; the first `Accept` wins and
//! resets everything before the next key. When every rule has failed on the
//! in-progress input the bank resets silently. `feed()` is owned by the UI
//! event-dispatch thread; callers serialize.

use crate::matcher::ParseResult;
use crate::rule::CommandParser;
use crate::table::GrammarTable;
use crate::{Cmd, CmdKind, Mode};
use core_keys::Key;
use tracing::{debug, trace};

// -------------------------------------------------------------------------------------------------
// FailedSet: flat word-array bitset over rule indices
// -------------------------------------------------------------------------------------------------

/// Tracks which rules have failed on the in-progress input. Sized once at
/// init (`ceil(rules / 64)` words); nothing allocates per keystroke.
#[derive(Debug, Clone)]
struct FailedSet {
    words: Vec<u64>,
    len: usize,
    failed: usize,
}

impl FailedSet {
    fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
            failed: 0,
        }
    }

    fn set(&mut self, idx: usize) {
        let (word, bit) = (idx / 64, idx % 64);
        if self.words[word] & (1 << bit) == 0 {
            self.words[word] |= 1 << bit;
            self.failed += 1;
        }
    }

    fn get(&self, idx: usize) -> bool {
        self.words[idx / 64] >> (idx % 64) & 1 == 1
    }

    fn all_set(&self) -> bool {
        self.failed == self.len
    }

    fn live(&self) -> usize {
        self.len - self.failed
    }

    fn clear(&mut self) {
        self.words.fill(0);
        self.failed = 0;
    }
}

// -------------------------------------------------------------------------------------------------
// ModalParser
// -------------------------------------------------------------------------------------------------

/// Pending-input summary for status rendering. Observational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    Idle,
    AwaitingMore { live_rules: usize },
}

/// The bank of concurrent per-rule parsers plus the current editor mode.
///
/// Created once at startup from a grammar table (deep-copied into owned
/// storage) and lives for the editor's lifetime.
#[derive(Debug)]
pub struct ModalParser {
    rules: Vec<CommandParser>,
    failed: FailedSet,
    mode: Mode,
    /// Keys consumed since the last reset; drives `pending_state`.
    fed: usize,
}

impl ModalParser {
    pub fn new(table: &GrammarTable) -> Self {
        let rules: Vec<CommandParser> = table.iter().map(|rule| rule.instantiate()).collect();
        let failed = FailedSet::new(rules.len());
        Self {
            rules,
            failed,
            mode: Mode::Normal,
            fed: 0,
        }
    }

    /// Current editor mode. Owned here; the executor observes it to render a
    /// status line.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn pending_state(&self) -> PendingState {
        if self.fed == 0 {
            PendingState::Idle
        } else {
            PendingState::AwaitingMore {
                live_rules: self.failed.live(),
            }
        }
    }

    /// Advance the bank by one key, emitting at most one completed command.
    ///
    /// Esc is the sole cancellation: it always resets the bank, forces
    /// Normal mode, and emits `SwitchMode(Normal)` even when already Normal
    /// (the executor treats that as a no-op).
    pub fn feed(&mut self, key: Key) -> Option<Cmd> {
        if key == Key::Esc {
            self.reset();
            self.mode = Mode::Normal;
            debug!(target: "modal.dispatch", "esc_reset");
            return Some(Cmd::new(1, CmdKind::SwitchMode(Mode::Normal)));
        }
        self.fed += 1;
        for idx in 0..self.rules.len() {
            if self.failed.get(idx) {
                continue;
            }
            match self.rules[idx].parse(self.mode, key) {
                ParseResult::Accept => {
                    let cmd = self.rules[idx].result();
                    debug!(
                        target: "modal.dispatch",
                        rule = idx,
                        tag = ?self.rules[idx].tag(),
                        cmd = ?cmd,
                        "command_emit"
                    );
                    self.reset();
                    self.apply_mode_effect(&cmd.kind);
                    return Some(cmd);
                }
                ParseResult::Fail => {
                    trace!(target: "modal.dispatch", rule = idx, key = %key, "rule_failed");
                    self.failed.set(idx);
                }
                // Continue: partial state retained for the next key.
                // Skip/TryTransition never escape CommandParser::parse.
                _ => {}
            }
        }
        if self.failed.all_set() {
            debug!(target: "modal.dispatch", key = %key, "all_rules_failed_reset");
            self.reset();
        }
        None
    }

    /// Restore every rule to its initial state and clear the failed set.
    pub fn reset(&mut self) {
        for rule in &mut self.rules {
            rule.reset();
        }
        self.failed.clear();
        self.fed = 0;
    }

    /// Mode transitions named by the emitted command itself. Operators cause
    /// no implicit transition.
    fn apply_mode_effect(&mut self, kind: &CmdKind) {
        let next = match kind {
            CmdKind::SwitchMode(mode) => Some(*mode),
            CmdKind::SwitchMove { mode, .. } => Some(*mode),
            CmdKind::NewLine {
                switch_mode: true, ..
            } => Some(Mode::Insert),
            _ => None,
        };
        if let Some(mode) = next
            && mode != self.mode
        {
            debug!(target: "modal.dispatch", from = %self.mode, to = %mode, "mode_switch");
            self.mode = mode;
        }
    }
}
