#![allow(dead_code)] // Shared across several integration tests; each binary uses a subset.

use core_keys::Key;
use core_modal::{Cmd, ModalParser, default_table};

pub fn parser() -> ModalParser {
    ModalParser::new(&default_table().expect("built-in grammar table"))
}

/// Feed each character of `seq` as a `Key::Char`, collecting every emitted
/// command.
pub fn feed_str(parser: &mut ModalParser, seq: &str) -> Vec<Cmd> {
    seq.chars()
        .filter_map(|c| parser.feed(Key::Char(c)))
        .collect()
}

/// Feed `seq` expecting silence on every key except the last, which must
/// emit exactly one command.
pub fn feed_expect_single(parser: &mut ModalParser, seq: &str) -> Cmd {
    let keys: Vec<char> = seq.chars().collect();
    let last = keys.len() - 1;
    for (i, c) in keys.iter().enumerate() {
        match parser.feed(Key::Char(*c)) {
            Some(cmd) if i == last => return cmd,
            Some(cmd) => panic!("command {cmd:?} emitted early at key {i} of {seq:?}"),
            None => assert!(i < last, "no command emitted at the end of {seq:?}"),
        }
    }
    unreachable!("empty sequence");
}
