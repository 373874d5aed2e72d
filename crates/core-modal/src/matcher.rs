//! Input matchers: the per-key building blocks of a grammar rule.
//!
//! Every rule is an ordered list of matchers, each answering one question
//! per key: did the key satisfy me, extend me, or belong to the next matcher
//! in line? The five-way `ParseResult` lets an optional matcher step aside
//! (`Skip`) or finish on a key it does not own (`TryTransition`) so the rule
//! driver can re-feed that same key forward without any lookahead buffer.

use crate::{Motion, MotionKind};
use core_keys::Key;
use smallvec::SmallVec;

/// Per-key verdict from a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// Matcher satisfied; the rule advances past it. The key is consumed.
    Accept,
    /// Matcher consumed the key but needs more.
    Continue,
    /// Matcher rejects; the whole rule fails for this input sequence.
    Fail,
    /// Matcher chose not to apply. The rule advances and re-feeds the key.
    Skip,
    /// Matcher completed on a key it does not consume. The rule advances and
    /// re-feeds the key, exactly like `Skip` but with accumulated state.
    TryTransition,
}

// -------------------------------------------------------------------------------------------------
// CountMatcher
// -------------------------------------------------------------------------------------------------

/// Optional leading decimal count (`69dd`, `20l`).
///
/// A leading `0` is never a count digit; it steps aside so the next matcher
/// (in practice a motion) can claim it as line-start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMatcher {
    amount: u16,
}

impl CountMatcher {
    pub fn parse(&mut self, key: Key) -> ParseResult {
        match key.digit() {
            Some(0) if self.amount == 0 => ParseResult::Skip,
            Some(d) => match self
                .amount
                .checked_mul(10)
                .and_then(|v| v.checked_add(d))
            {
                Some(v) => {
                    self.amount = v;
                    ParseResult::Continue
                }
                // No real count approaches u16::MAX; overflow fails the rule.
                None => ParseResult::Fail,
            },
            None if self.amount == 0 => ParseResult::Skip,
            None => ParseResult::TryTransition,
        }
    }

    /// Accumulated count, `None` when no digit matched.
    pub fn result(&self) -> Option<u16> {
        (self.amount > 0).then_some(self.amount)
    }

    pub fn reset(&mut self) {
        self.amount = 0;
    }
}

// -------------------------------------------------------------------------------------------------
// KeyMatcher
// -------------------------------------------------------------------------------------------------

/// Exactly one literal key. Stateless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatcher {
    want: Key,
}

impl KeyMatcher {
    pub fn new(want: Key) -> Self {
        Self { want }
    }

    pub fn parse(&self, key: Key) -> ParseResult {
        if key == self.want {
            ParseResult::Accept
        } else {
            ParseResult::Fail
        }
    }
}

// -------------------------------------------------------------------------------------------------
// MotionMatcher
// -------------------------------------------------------------------------------------------------

/// Self-contained sub-parser for `[count]<motion-key(s)>`.
///
/// Owns a nested `CountMatcher` behind a `count_done` latch so motion keys
/// never re-enter the counter, plus a small key buffer sized for the longest
/// motion sequence (`f<c>`, `gg`). Only the single-key motions resolve
/// today; an unbound first key rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionMatcher {
    count: CountMatcher,
    count_done: bool,
    keys: SmallVec<[Key; 4]>,
    resolved: Option<MotionKind>,
}

impl MotionMatcher {
    pub fn parse(&mut self, key: Key) -> ParseResult {
        if !self.count_done {
            match self.count.parse(key) {
                ParseResult::Continue => return ParseResult::Continue,
                ParseResult::Fail => return ParseResult::Fail,
                // Counter stepped aside; this same key starts the motion proper.
                ParseResult::Skip | ParseResult::TryTransition => self.count_done = true,
                // The counter never accepts on its own.
                ParseResult::Accept => return ParseResult::Fail,
            }
        }
        self.keys.push(key);
        self.resolve()
    }

    fn resolve(&mut self) -> ParseResult {
        let kind = match self.keys.as_slice() {
            [Key::Char('0')] => MotionKind::LineStart,
            [Key::Char('$')] => MotionKind::LineEnd,
            [Key::Char('h')] | [Key::Left] => MotionKind::Left,
            [Key::Char('l')] | [Key::Right] => MotionKind::Right,
            [Key::Char('k')] | [Key::Up] => MotionKind::Up,
            [Key::Char('j')] | [Key::Down] => MotionKind::Down,
            _ => return ParseResult::Fail,
        };
        self.resolved = Some(kind);
        ParseResult::Accept
    }

    /// The completed motion, once a kind has been resolved. A count that
    /// matched nothing defaults the repeat to 1.
    pub fn result(&self) -> Option<Motion> {
        self.resolved
            .map(|kind| Motion::new(kind, self.count.result().unwrap_or(1)))
    }

    pub fn reset(&mut self) {
        self.count.reset();
        self.count_done = false;
        self.keys.clear();
        self.resolved = None;
    }
}

// -------------------------------------------------------------------------------------------------
// Input: the closed matcher sum stored by rules
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Count(CountMatcher),
    Key(KeyMatcher),
    Motion(MotionMatcher),
}

impl Input {
    pub fn parse(&mut self, key: Key) -> ParseResult {
        match self {
            Input::Count(m) => m.parse(key),
            Input::Key(m) => m.parse(key),
            Input::Motion(m) => m.parse(key),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Input::Count(m) => m.reset(),
            Input::Key(_) => {}
            Input::Motion(m) => m.reset(),
        }
    }

    pub(crate) fn count_result(&self) -> Option<u16> {
        match self {
            Input::Count(m) => m.result(),
            _ => None,
        }
    }

    pub(crate) fn motion_result(&self) -> Option<Motion> {
        match self {
            Input::Motion(m) => m.result(),
            _ => None,
        }
    }

    pub(crate) fn is_motion(&self) -> bool {
        matches!(self, Input::Motion(_))
    }
}
