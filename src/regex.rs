// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Public façade: `Regex` and `Captures`.
//!
//! This is the thin, ergonomic layer that everything else in the crate
//! exists to support: compile once, search many times against `&[u8]`
//! haystacks, read results back out as byte offsets.

use crate::error::Error;
use crate::program::Program;
use crate::vm;

/// A compiled pattern, ready to search byte slices.
#[derive(Debug, Clone)]
pub struct Regex {
    program: Program,
    case_insensitive: bool,
    utf8: bool,
}

impl Regex {
    /// Compiles `pattern`. `utf8` selects codepoint-at-a-time decoding
    /// (`.`/classes/`\<`/`\>` see one UTF-8 codepoint at a time) versus
    /// raw single-byte stepping.
    pub fn new(pattern: &str, case_insensitive: bool, utf8: bool) -> Result<Regex, Error> {
        let program = Program::compile(pattern.as_bytes(), utf8)?;
        Ok(Regex { program, case_insensitive, utf8 })
    }

    /// Number of capturing groups, not counting the implicit group 0
    /// (the whole match).
    pub fn capture_count(&self) -> usize {
        self.program.nsub
    }

    /// True if the pattern matches anywhere in `input`.
    pub fn is_match(&self, input: &[u8]) -> bool {
        let mut caps = vec![None; self.program.presub];
        vm::exec(&self.program, input, &mut caps, self.case_insensitive, self.utf8)
    }

    /// Finds the leftmost match in `input`, if any, along with every
    /// capturing group's span.
    pub fn captures<'t>(&self, input: &'t [u8]) -> Option<Captures<'t>> {
        let mut slots = vec![None; self.program.presub];
        if vm::exec(&self.program, input, &mut slots, self.case_insensitive, self.utf8) {
            Some(Captures { input, slots })
        } else {
            None
        }
    }
}

/// The spans found by one successful [`Regex::captures`] call. Group 0
/// is always the whole match; groups `1..=capture_count()` are the
/// pattern's parenthesized groups, `None` where a group never
/// participated (e.g. the untaken branch of an alternation).
#[derive(Debug, Clone)]
pub struct Captures<'t> {
    input: &'t [u8],
    slots: Vec<Option<usize>>,
}

impl<'t> Captures<'t> {
    /// The `(start, end)` byte offsets of group `group`, or `None` if
    /// that group didn't participate in the match.
    pub fn get(&self, group: usize) -> Option<(usize, usize)> {
        let start = *self.slots.get(2 * group)?;
        let end = *self.slots.get(2 * group + 1)?;
        Some((start?, end?))
    }

    /// The bytes matched by group `group`.
    pub fn bytes(&self, group: usize) -> Option<&'t [u8]> {
        let (start, end) = self.get(group)?;
        Some(&self.input[start..end])
    }

    /// Number of slots tracked, i.e. `2 * (capture_count() + 1)`.
    pub fn len(&self) -> usize {
        self.slots.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_match_basic() {
        let re = Regex::new("a+b", false, true).unwrap();
        assert!(re.is_match(b"xxaaabxx"));
        assert!(!re.is_match(b"xxx"));
    }

    #[test]
    fn captures_group_bytes() {
        let re = Regex::new(r"(\d+)-(\d+)", false, true).unwrap();
        let caps = re.captures(b"range 12-345 end").unwrap();
        assert_eq!(caps.bytes(0), Some(&b"12-345"[..]));
        assert_eq!(caps.bytes(1), Some(&b"12"[..]));
        assert_eq!(caps.bytes(2), Some(&b"345"[..]));
    }

    #[test]
    fn unparticipating_group_is_none() {
        let re = Regex::new("(a)|(b)", false, true).unwrap();
        let caps = re.captures(b"b").unwrap();
        assert_eq!(caps.get(1), None);
        assert_eq!(caps.get(2), Some((0, 1)));
    }

    #[test]
    fn case_insensitive_flag() {
        let re = Regex::new("HELLO", true, true).unwrap();
        assert!(re.is_match(b"say hello there"));
    }

    #[test]
    fn capture_count_excludes_group_zero() {
        let re = Regex::new("(a)(b)(c)", false, true).unwrap();
        assert_eq!(re.capture_count(), 3);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(Regex::new("a(b", false, true).is_err());
    }

    #[quickcheck_macros::quickcheck]
    fn matching_against_arbitrary_pattern_never_panics(pattern: String, haystack: String) -> bool {
        let _ = env_logger::try_init();
        match Regex::new(&pattern, false, true) {
            Ok(re) => {
                let _ = re.is_match(haystack.as_bytes());
                true
            }
            Err(_) => true,
        }
    }
}
