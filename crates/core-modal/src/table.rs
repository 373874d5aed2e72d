//! Grammar table: the closed built-in rule set and its pattern builder.
//!
//! Rules are declared as whitespace-separated pattern strings (`"<#> d <mv>"`)
//! materialized once at startup: `<#>` is an optional leading count, `<mv>` a
//! motion sub-parser, and any single-character token a literal key. The table
//! is immutable after construction; `ModalParser` deep-copies it into its own
//! running bank.

use crate::matcher::{CountMatcher, Input, KeyMatcher, MotionMatcher};
use crate::rule::{CmdTag, CommandParser};
use crate::{Mode, ModeMask, MotionKind};
use core_keys::Key;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Construction-time pattern validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("empty rule pattern")]
    EmptyPattern,
    #[error("unknown token `{0}` in rule pattern")]
    UnknownToken(String),
    #[error("rule pattern accepts no modes")]
    NoModes,
    #[error("move rule pattern lacks a `<mv>` input")]
    MissingMotion,
}

/// Immutable spec record for one grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRule {
    tag: CmdTag,
    pattern: String,
    valid_modes: ModeMask,
    inputs: SmallVec<[Input; 4]>,
}

impl GrammarRule {
    /// Parse a pattern string into a rule spec.
    pub fn parse(pattern: &str, tag: CmdTag, valid_modes: ModeMask) -> Result<Self, TableError> {
        if valid_modes.is_empty() {
            return Err(TableError::NoModes);
        }
        let mut inputs: SmallVec<[Input; 4]> = SmallVec::new();
        for token in pattern.split_whitespace() {
            match token {
                "<#>" => inputs.push(Input::Count(CountMatcher::default())),
                "<mv>" => inputs.push(Input::Motion(MotionMatcher::default())),
                tok => {
                    let mut chars = tok.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => inputs.push(Input::Key(KeyMatcher::new(Key::Char(c)))),
                        _ => return Err(TableError::UnknownToken(tok.to_string())),
                    }
                }
            }
        }
        if inputs.is_empty() {
            return Err(TableError::EmptyPattern);
        }
        if matches!(tag, CmdTag::Move) && !inputs.iter().any(Input::is_motion) {
            return Err(TableError::MissingMotion);
        }
        Ok(Self {
            tag,
            pattern: pattern.to_string(),
            valid_modes,
            inputs,
        })
    }

    pub fn tag(&self) -> CmdTag {
        self.tag
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn valid_modes(&self) -> ModeMask {
        self.valid_modes
    }

    /// Fresh running state machine for this rule.
    pub(crate) fn instantiate(&self) -> CommandParser {
        CommandParser::new(self.tag, self.valid_modes, self.inputs.clone())
    }
}

/// Ordered rule set. Registration order is load-bearing: the dispatcher
/// scans it front to back and the first `Accept` wins.
#[derive(Debug, Clone, Default)]
pub struct GrammarTable {
    rules: Vec<GrammarRule>,
}

impl GrammarTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and append one rule at the end of the registration order.
    pub fn push(
        &mut self,
        pattern: &str,
        tag: CmdTag,
        valid_modes: ModeMask,
    ) -> Result<(), TableError> {
        self.rules.push(GrammarRule::parse(pattern, tag, valid_modes)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrammarRule> {
        self.rules.iter()
    }
}

/// The built-in command grammar.
///
/// `v` and `i` are Normal-only: the only way out of Visual is Esc. The
/// linewise operator forms exist only in Normal, where an operator always
/// carries either a motion or its doubled key; the Visual operator rows
/// carry neither.
pub fn default_table() -> Result<GrammarTable, TableError> {
    let nv = ModeMask::NORMAL | ModeMask::VISUAL;
    let mut t = GrammarTable::new();
    t.push("<mv>", CmdTag::Move, nv)?;
    t.push("<#> d <mv>", CmdTag::Delete, ModeMask::NORMAL)?;
    t.push("<#> d d", CmdTag::Delete, ModeMask::NORMAL)?;
    t.push("<#> d", CmdTag::Delete, ModeMask::VISUAL)?;
    t.push("<#> c <mv>", CmdTag::Change, ModeMask::NORMAL)?;
    t.push("<#> c c", CmdTag::Change, ModeMask::NORMAL)?;
    t.push("<#> c", CmdTag::Change, ModeMask::VISUAL)?;
    t.push("<#> y <mv>", CmdTag::Yank, ModeMask::NORMAL)?;
    t.push("<#> y y", CmdTag::Yank, ModeMask::NORMAL)?;
    t.push("<#> y", CmdTag::Yank, ModeMask::VISUAL)?;
    t.push(
        "<#> I",
        CmdTag::SwitchMove {
            mv: MotionKind::LineStart,
            mode: Mode::Insert,
        },
        nv,
    )?;
    t.push(
        "<#> A",
        CmdTag::SwitchMove {
            mv: MotionKind::LineEnd,
            mode: Mode::Insert,
        },
        nv,
    )?;
    t.push(
        "<#> a",
        CmdTag::SwitchMove {
            mv: MotionKind::Right,
            mode: Mode::Insert,
        },
        nv,
    )?;
    t.push(
        "<#> O",
        CmdTag::NewLine {
            up: true,
            switch_mode: true,
        },
        nv,
    )?;
    t.push(
        "<#> o",
        CmdTag::NewLine {
            up: false,
            switch_mode: true,
        },
        nv,
    )?;
    t.push("<#> i", CmdTag::SwitchMode(Mode::Insert), ModeMask::NORMAL)?;
    t.push("<#> v", CmdTag::SwitchMode(Mode::Visual), ModeMask::NORMAL)?;
    t.push("<#> p", CmdTag::Paste, nv)?;
    t.push("<#> P", CmdTag::PasteBefore, nv)?;
    debug!(target: "modal.table", rules = t.len(), "default_table_built");
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_operator_motion_pattern() {
        let rule =
            GrammarRule::parse("<#> d <mv>", CmdTag::Delete, ModeMask::NORMAL).expect("pattern");
        assert_eq!(rule.pattern(), "<#> d <mv>");
        assert_eq!(rule.valid_modes(), ModeMask::NORMAL);
        assert_eq!(rule.tag(), CmdTag::Delete);
    }

    #[test]
    fn rejects_empty_pattern() {
        assert_eq!(
            GrammarRule::parse("   ", CmdTag::Paste, ModeMask::NORMAL),
            Err(TableError::EmptyPattern)
        );
    }

    #[test]
    fn rejects_unknown_token() {
        assert_eq!(
            GrammarRule::parse("<#> dd", CmdTag::Delete, ModeMask::NORMAL),
            Err(TableError::UnknownToken("dd".to_string()))
        );
        assert_eq!(
            GrammarRule::parse("<count> d", CmdTag::Delete, ModeMask::NORMAL),
            Err(TableError::UnknownToken("<count>".to_string()))
        );
    }

    #[test]
    fn rejects_empty_mode_mask() {
        assert_eq!(
            GrammarRule::parse("<mv>", CmdTag::Move, ModeMask::empty()),
            Err(TableError::NoModes)
        );
    }

    #[test]
    fn rejects_move_rule_without_motion() {
        assert_eq!(
            GrammarRule::parse("<#> m", CmdTag::Move, ModeMask::NORMAL),
            Err(TableError::MissingMotion)
        );
    }

    #[test]
    fn default_table_builds() {
        let table = default_table().expect("built-in table");
        assert_eq!(table.len(), 19);
        // The ambiguous operator families must keep their registration order:
        // motion form first, then the doubled linewise form, then visual.
        let delete_patterns: Vec<&str> = table
            .iter()
            .filter(|r| r.tag() == CmdTag::Delete)
            .map(GrammarRule::pattern)
            .collect();
        assert_eq!(delete_patterns, vec!["<#> d <mv>", "<#> d d", "<#> d"]);
    }

    #[test]
    fn default_table_visual_rules_never_carry_motion() {
        let table = default_table().expect("built-in table");
        for rule in table.iter() {
            if rule.valid_modes() == ModeMask::VISUAL {
                assert!(
                    !rule.pattern().contains("<mv>"),
                    "visual rule {} must not take a motion",
                    rule.pattern()
                );
            }
        }
    }

    #[test]
    fn custom_tag_flows_through_pattern() {
        let mut t = GrammarTable::new();
        t.push("<#> Z Z", CmdTag::Custom("write-quit"), ModeMask::NORMAL)
            .expect("custom rule");
        assert_eq!(t.len(), 1);
        let rule = t.iter().next().expect("one rule");
        assert_eq!(rule.tag(), CmdTag::Custom("write-quit"));
    }
}
