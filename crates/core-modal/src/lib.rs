//! core-modal: the modal (vi-style) command parser.
//!
//! A bank of concurrent per-rule state machines consumes one `Key` per
//! keystroke and collectively commits to exactly one `Cmd` per completed
//! command. Input arrives with no lookahead, so disambiguation (`dd` vs
//! `d<motion>`, `0` as count digit vs line-start motion) falls out of the
//! matcher hand-off rules rather than special cases in the driver, and the
//! bank never backtracks user-visible state.
//!
//! Module map:
//! * `matcher`  - per-input state machines (count / literal key / motion)
//! * `rule`     - the per-rule driver and result synthesis
//! * `table`    - the built-in grammar table and its pattern builder
//! * `dispatch` - the `ModalParser` bank multiplexing keys across rules

use bitflags::bitflags;
use std::fmt;

pub mod dispatch;
pub mod matcher;
pub mod rule;
pub mod table;

pub use dispatch::{ModalParser, PendingState};
pub use matcher::ParseResult;
pub use rule::CmdTag;
pub use table::{GrammarRule, GrammarTable, TableError, default_table};

// -------------------------------------------------------------------------------------------------
// Mode
// -------------------------------------------------------------------------------------------------

/// Editor mode gating which grammar rules are eligible.
///
/// Discriminants are single bits so a rule's mode-validity mask is a plain
/// 3-bit set (`ModeMask`).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Insert = 1,
    Normal = 2,
    Visual = 4,
}

impl Mode {
    /// The singleton mask for this mode.
    pub fn mask(self) -> ModeMask {
        ModeMask::from_bits_truncate(self as u8)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Insert => write!(f, "INSERT"),
            Mode::Normal => write!(f, "NORMAL"),
            Mode::Visual => write!(f, "VISUAL"),
        }
    }
}

bitflags! {
    /// Set of modes a grammar rule is valid in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ModeMask: u8 {
        const INSERT = 1;
        const NORMAL = 2;
        const VISUAL = 4;
    }
}

// -------------------------------------------------------------------------------------------------
// Motions
// -------------------------------------------------------------------------------------------------

/// Direction or target a motion names, relative to the cursor.
///
/// The motion matcher currently resolves the single-key subset (`h j k l`,
/// `0`, `$`, arrows). The remaining variants are carried by the data model
/// for the executor's benefit and for multi-key sequences once those gain
/// bindings; nothing here invents keybindings for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    ParagraphBegin,
    ParagraphEnd,
    /// Buffer start.
    Start,
    /// Buffer end.
    End,
    /// To the next (or, reversed, previous) occurrence of `ch` on the line.
    Find { ch: char, reverse: bool },
    /// Next word start; `true` treats punctuation runs as words.
    Word(bool),
    /// Previous word start.
    BeginningWord(bool),
    /// Next word end.
    EndWord(bool),
}

impl MotionKind {
    /// Whether an operator consuming this motion includes the end position in
    /// the affected range. Every motion except `Find` yields a half-open span.
    pub fn is_delete_end_inclusive(self) -> bool {
        matches!(self, MotionKind::Find { .. })
    }
}

/// A motion with its own repeat count (`20l` is one motion, repeat 20).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub kind: MotionKind,
    pub repeat: u16,
}

impl Motion {
    pub fn new(kind: MotionKind, repeat: u16) -> Self {
        Self {
            kind,
            repeat: repeat.max(1),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Commands
// -------------------------------------------------------------------------------------------------

/// Payload of a completed command.
///
/// For the three operators a `None` motion means "operate on the current
/// visual selection" (Visual mode) or "linewise over `repeat` lines" (the
/// doubled-key Normal forms); the executor distinguishes by mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdKind {
    Delete(Option<Motion>),
    Change(Option<Motion>),
    Yank(Option<Motion>),
    Move(MotionKind),
    SwitchMove { mv: MotionKind, mode: Mode },
    SwitchMode(Mode),
    NewLine { up: bool, switch_mode: bool },
    Undo,
    Redo,
    Paste,
    PasteBefore,
    Custom(&'static str),
}

/// The parser's sole output: a command and how many times to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cmd {
    pub repeat: u16,
    pub kind: CmdKind,
}

impl Cmd {
    pub fn new(repeat: u16, kind: CmdKind) -> Self {
        Self {
            repeat: repeat.max(1),
            kind,
        }
    }
}
