//! Property tests for the universally-quantified parser invariants: one
//! command per completed prefix, Esc cancellation at any position, and count
//! normalization.

use core_keys::Key;
use core_modal::{Cmd, CmdKind, Mode, Motion, MotionKind, PendingState};
use proptest::prelude::*;

mod common;
use common::{feed_str, parser};

fn motion_kind(c: char) -> MotionKind {
    match c {
        'h' => MotionKind::Left,
        'j' => MotionKind::Down,
        'k' => MotionKind::Up,
        'l' => MotionKind::Right,
        '$' => MotionKind::LineEnd,
        other => panic!("not a generated motion key: {other}"),
    }
}

fn operator_kind(c: char, motion: Option<Motion>) -> CmdKind {
    match c {
        'd' => CmdKind::Delete(motion),
        'c' => CmdKind::Change(motion),
        'y' => CmdKind::Yank(motion),
        other => panic!("not a generated operator key: {other}"),
    }
}

fn motion_key() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['h', 'j', 'k', 'l', '$'])
}

fn operator_key() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['d', 'c', 'y'])
}

proptest! {
    #[test]
    fn counted_motion_repeat_equals_digit_run(count in 1u16..=9999, m in motion_key()) {
        let mut p = parser();
        let seq = format!("{count}{m}");
        let keys: Vec<char> = seq.chars().collect();
        for (i, c) in keys.iter().enumerate() {
            let out = p.feed(Key::Char(*c));
            if i < keys.len() - 1 {
                prop_assert_eq!(out, None, "emitted before the motion key");
            } else {
                prop_assert_eq!(out, Some(Cmd::new(count, CmdKind::Move(motion_kind(m)))));
            }
        }
        prop_assert_eq!(p.pending_state(), PendingState::Idle);
    }

    #[test]
    fn operator_counts_stay_separate(
        outer in 1u16..=300,
        inner in 1u16..=99,
        op in operator_key(),
        m in motion_key(),
    ) {
        let mut p = parser();
        let seq = format!("{outer}{op}{inner}{m}");
        let cmds = feed_str(&mut p, &seq);
        let expected = Cmd::new(outer, operator_kind(op, Some(Motion::new(motion_kind(m), inner))));
        prop_assert_eq!(cmds, vec![expected]);
    }

    #[test]
    fn missing_counts_normalize_to_one(op in operator_key(), m in motion_key()) {
        let mut p = parser();
        let cmds = feed_str(&mut p, &format!("{op}{m}"));
        let expected = Cmd::new(1, operator_kind(op, Some(Motion::new(motion_kind(m), 1))));
        prop_assert_eq!(cmds, vec![expected]);
    }

    #[test]
    fn esc_cancels_at_any_position(
        outer in 1u16..=300,
        inner in 1u16..=99,
        op in operator_key(),
        m in motion_key(),
        cut in 0usize..64,
    ) {
        let seq = format!("{outer}{op}{inner}{m}");
        let keys: Vec<char> = seq.chars().collect();
        let cut = cut % keys.len();

        let mut p = parser();
        for c in &keys[..cut] {
            p.feed(Key::Char(*c));
        }
        prop_assert_eq!(
            p.feed(Key::Esc),
            Some(Cmd::new(1, CmdKind::SwitchMode(Mode::Normal)))
        );
        prop_assert_eq!(p.pending_state(), PendingState::Idle);
        prop_assert_eq!(p.mode(), Mode::Normal);

        // The full sequence still parses cleanly after cancellation.
        let cmds = feed_str(&mut p, &seq);
        let expected = Cmd::new(outer, operator_kind(op, Some(Motion::new(motion_kind(m), inner))));
        prop_assert_eq!(cmds, vec![expected]);
    }

    #[test]
    fn leading_zero_is_never_a_count_digit(m in motion_key()) {
        let mut p = parser();
        prop_assert_eq!(
            p.feed(Key::Char('0')),
            Some(Cmd::new(1, CmdKind::Move(MotionKind::LineStart)))
        );
        // And the bank is clean: the following motion has repeat 1.
        prop_assert_eq!(
            p.feed(Key::Char(m)),
            Some(Cmd::new(1, CmdKind::Move(motion_kind(m))))
        );
    }

    #[test]
    fn arbitrary_input_never_wedges_the_bank(junk in prop::collection::vec(any::<char>(), 0..64)) {
        let mut p = parser();
        for c in junk {
            // At most one command per key; never a panic.
            let _ = p.feed(Key::Char(c));
        }
        // Esc always restores a known-good state.
        prop_assert_eq!(
            p.feed(Key::Esc),
            Some(Cmd::new(1, CmdKind::SwitchMode(Mode::Normal)))
        );
        prop_assert_eq!(p.pending_state(), PendingState::Idle);
        let cmds = feed_str(&mut p, "2dd");
        prop_assert_eq!(cmds, vec![Cmd::new(2, CmdKind::Delete(None))]);
    }
}
