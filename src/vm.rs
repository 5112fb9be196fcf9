// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The Pike VM executor.
//!
//! [`exec`] simulates every live NFA thread in lockstep against the
//! input, one codepoint at a time. The two thread lists (`clist`,
//! `nlist`) hold threads parked against the current and next codepoint:
//! a thread consuming a `Char`/`Class`/`Any`/`Match` is parked on a list
//! to run against the *next* codepoint, while `Save`/`Jmp`/`Split`/the
//! zero-width assertions are resolved immediately in [`add_thread`] via
//! an explicit pc/capture-state stack (never real recursion, so depth
//! is bounded by `prog.splits` rather than by pattern nesting).
//!
//! This searches for the leftmost match by re-seeding a fresh "start
//! here" thread at the back of `clist` on every position for as long as
//! no match has been found yet (`matched.is_none()`) — once some thread
//! reaches `Match`, no further start attempts are seeded, since any
//! later start would be to the right of (lower priority than) the one
//! already found.

use crate::captures::{CaptureHandle, CapturePool};
use crate::classes::{ascii_lower, is_word_codepoint};
use crate::codec;
use crate::inst::Inst;
use crate::program::Program;
use crate::sparse::SparseSet;

#[derive(Clone, Copy)]
struct Thread {
    pc: usize,
    caps: CaptureHandle,
}

struct ThreadList {
    threads: Vec<Thread>,
}

impl ThreadList {
    fn with_capacity(cap: usize) -> ThreadList {
        ThreadList { threads: Vec::with_capacity(cap) }
    }

    fn clear(&mut self) {
        self.threads.clear();
    }

    fn push(&mut self, pc: usize, caps: CaptureHandle) {
        self.threads.push(Thread { pc, caps });
    }
}

fn word_byte_at(input: &[u8], pos: usize) -> bool {
    input.get(pos).map_or(false, |&b| is_word_codepoint(u32::from(b)))
}

/// Resolves the epsilon closure starting at `start_pc`/`start_caps`,
/// pushing every consuming instruction (`Char`/`Class`/`Any`/`Match`)
/// reached onto `list`. `is_next_list` selects which half of a shared
/// capture record gets copied on a lazy clone (see
/// `CapturePool::make_unique`): the full record when the thread is
/// headed for `nlist`, only the start half when it's a fresh seed or
/// continuation headed for `clist`.
#[allow(clippy::too_many_arguments)]
fn add_thread(
    prog: &Program,
    pool: &mut CapturePool,
    sparse: &mut SparseSet,
    stack: &mut Vec<(usize, CaptureHandle)>,
    list: &mut ThreadList,
    start_pc: usize,
    start_caps: CaptureHandle,
    input: &[u8],
    sp: usize,
    next_sp: usize,
    last: bool,
    is_next_list: bool,
) {
    stack.clear();
    let mut pc = start_pc;
    let mut caps = start_caps;
    loop {
        let mut fail = false;
        match &prog.insts[pc] {
            Inst::Save(slot) => {
                caps = pool.make_unique(caps, is_next_list);
                pool.set_slot(caps, *slot, next_sp);
                pc += 1;
            }
            Inst::Jmp(rel) => {
                pc = (pc as isize + 1 + rel) as usize;
            }
            Inst::Split { id, rel, prefer_target } => {
                if sparse.insert(*id) {
                    let target = (pc as isize + 1 + rel) as usize;
                    let fallthrough = pc + 1;
                    let (first, second) =
                        if *prefer_target { (target, fallthrough) } else { (fallthrough, target) };
                    pool.incref(caps);
                    stack.push((second, caps));
                    pc = first;
                } else {
                    fail = true;
                }
            }
            Inst::Bol => {
                if next_sp == 0 {
                    pc += 1;
                } else {
                    fail = true;
                }
            }
            Inst::Eol => {
                if last {
                    pc += 1;
                } else {
                    fail = true;
                }
            }
            Inst::WordStart => {
                let prev_is_boundary_start = sp != 0 || sp != next_sp;
                let word_sp = word_byte_at(input, sp);
                let word_next = word_byte_at(input, next_sp);
                if !(prev_is_boundary_start && word_sp) && word_next {
                    pc += 1;
                } else {
                    fail = true;
                }
            }
            Inst::WordEnd => {
                let word_sp = word_byte_at(input, sp);
                let word_next = word_byte_at(input, next_sp);
                if word_sp && !word_next {
                    pc += 1;
                } else {
                    fail = true;
                }
            }
            Inst::NotWordBoundary => {
                let prev_is_boundary_start = sp != 0 || sp != next_sp;
                let word_sp = word_byte_at(input, sp);
                let word_next = word_byte_at(input, next_sp);
                let wbeg = !(prev_is_boundary_start && word_sp) && word_next;
                let wend = word_sp && !word_next;
                if !(wbeg || wend) {
                    pc += 1;
                } else {
                    fail = true;
                }
            }
            Inst::Char(_) | Inst::Class(_) | Inst::Any | Inst::Match => {
                // The list now holds a reference too; the shared `if fail`
                // path below still decrefs `caps` to unwind this closure
                // branch, so the list's copy needs its own count.
                pool.incref(caps);
                list.push(pc, caps);
                fail = true; // not a real failure, just "this branch is done"; fall through to the resume logic below.
            }
        }
        if fail {
            pool.decref(caps);
            match stack.pop() {
                Some((p, c)) => {
                    pc = p;
                    caps = c;
                }
                None => return,
            }
        }
    }
}

/// Runs `prog` against `input`, writing `2*(nsub+1)` interleaved
/// `(start, end)` offsets into `captures_out` on success (entry `2k`
/// is group `k`'s start, `2k+1` its end; unset groups are left
/// `None`). `captures_out` must be exactly `prog.presub` long.
pub fn exec(
    prog: &Program,
    input: &[u8],
    captures_out: &mut [Option<usize>],
    case_insensitive: bool,
    utf8: bool,
) -> bool {
    debug_assert_eq!(captures_out.len(), prog.presub);
    log::trace!(
        "starting match: {} insts, sparse capacity {}",
        prog.len,
        prog.sparse_capacity()
    );

    let mut pool = CapturePool::new(prog.capture_pool_capacity(), prog.presub);
    let mut clist = ThreadList::with_capacity(prog.len);
    let mut nlist = ThreadList::with_capacity(prog.len);
    let mut sparse = SparseSet::new(prog.sparse_capacity());
    let mut stack: Vec<(usize, CaptureHandle)> = Vec::with_capacity(prog.splits as usize);

    let mut sp = 0usize;
    let mut last = input.is_empty();
    let mut matched: Option<CaptureHandle> = None;
    let mut codepoints_consumed = 0usize;

    let seed = pool.alloc();
    pool.set_slot(seed, 0, 0);
    add_thread(prog, &mut pool, &mut sparse, &mut stack, &mut clist, 0, seed, input, 0, 0, last, false);

    loop {
        let (c, i) = if last {
            (0u32, 0usize)
        } else {
            (codec::uc_code(&input[sp..], utf8), codec::uc_len(&input[sp..], utf8))
        };
        let next_sp = sp + i;
        if next_sp >= input.len() {
            last = true;
        }
        if i > 0 {
            codepoints_consumed += 1;
        }

        nlist.clear();
        sparse.clear();

        let mut idx = 0;
        while idx < clist.threads.len() {
            let Thread { pc, caps } = clist.threads[idx];
            idx += 1;
            match &prog.insts[pc] {
                Inst::Char(ch) => {
                    let hit = if i == 0 {
                        false
                    } else if case_insensitive {
                        ascii_lower(c) == ascii_lower(*ch)
                    } else {
                        c == *ch
                    };
                    if hit {
                        add_thread(
                            prog, &mut pool, &mut sparse, &mut stack, &mut nlist,
                            pc + 1, caps, input, sp, next_sp, last, true,
                        );
                    } else {
                        pool.decref(caps);
                    }
                }
                Inst::Class(cls) => {
                    let hit = i > 0 && cls.matches(c, case_insensitive);
                    if hit {
                        add_thread(
                            prog, &mut pool, &mut sparse, &mut stack, &mut nlist,
                            pc + 1, caps, input, sp, next_sp, last, true,
                        );
                    } else {
                        pool.decref(caps);
                    }
                }
                Inst::Any => {
                    if i > 0 {
                        add_thread(
                            prog, &mut pool, &mut sparse, &mut stack, &mut nlist,
                            pc + 1, caps, input, sp, next_sp, last, true,
                        );
                    } else {
                        pool.decref(caps);
                    }
                }
                Inst::Match => {
                    let nothing_better_pending = nlist.threads.is_empty();
                    if let Some(old) = matched.take() {
                        pool.decref(old);
                    }
                    matched = Some(caps);
                    if nothing_better_pending {
                        let winner = matched.take().unwrap();
                        write_captures(&pool, winner, captures_out);
                        log::debug!(
                            "matched after {} codepoint(s) consumed",
                            codepoints_consumed
                        );
                        return true;
                    }
                    break;
                }
                _ => unreachable!("only consuming instructions are ever queued onto a thread list"),
            }
        }
        // Anything still unprocessed in clist is strictly lower priority
        // than the match just recorded above; drop it rather than let it
        // run another round.
        while idx < clist.threads.len() {
            pool.decref(clist.threads[idx].caps);
            idx += 1;
        }

        if i == 0 {
            break;
        }
        std::mem::swap(&mut clist, &mut nlist);
        if matched.is_none() {
            let seed = pool.alloc();
            pool.set_slot(seed, 0, next_sp);
            add_thread(
                prog, &mut pool, &mut sparse, &mut stack, &mut clist,
                0, seed, input, sp, next_sp, last, false,
            );
        }
        sp = next_sp;
    }

    if let Some(winner) = matched {
        write_captures(&pool, winner, captures_out);
        log::debug!("matched after {} codepoint(s) consumed", codepoints_consumed);
        return true;
    }

    log::debug!("no match after {} codepoint(s) consumed", codepoints_consumed);
    false
}

fn write_captures(pool: &CapturePool, handle: CaptureHandle, out: &mut [Option<usize>]) {
    let slots = pool.slots(handle);
    let half = slots.len() / 2;
    for k in 0..half {
        out[2 * k] = slots[k];
        out[2 * k + 1] = slots[half + k];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pattern: &str, input: &str) -> Option<Vec<Option<usize>>> {
        let prog = Program::compile(pattern.as_bytes(), true).unwrap();
        let mut caps = vec![None; prog.presub];
        if exec(&prog, input.as_bytes(), &mut caps, false, true) {
            Some(caps)
        } else {
            None
        }
    }

    #[test]
    fn literal_match() {
        let caps = run("abc", "xxabcxx").unwrap();
        assert_eq!(caps[0], Some(2));
        assert_eq!(caps[1], Some(5));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(run("xyz", "abc").is_none());
    }

    #[test]
    fn greedy_star_is_maximal() {
        let caps = run("a*", "aaab").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(3));
    }

    #[test]
    fn lazy_star_is_minimal() {
        let caps = run("a*?", "aaab").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(0));
    }

    #[test]
    fn capture_group_spans_submatch() {
        let caps = run("a(b+)c", "abbbc").unwrap();
        assert_eq!((caps[0], caps[1]), (Some(0), Some(5)));
        assert_eq!((caps[2], caps[3]), (Some(1), Some(4)));
    }

    #[test]
    fn alternation_last_iteration_wins_capture() {
        let caps = run("(a|b)*", "abab").unwrap();
        assert_eq!((caps[2], caps[3]), (Some(3), Some(4)));
    }

    #[test]
    fn lazy_dot_star_stops_at_first_b() {
        let caps = run("a.*?b", "axxbyyb").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(4));
    }

    #[test]
    fn greedy_dot_star_consumes_to_last_b() {
        let caps = run("a.*b", "axxbyyb").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(7));
    }

    #[test]
    fn bounded_repetition_caps_at_max() {
        let caps = run("\\d{2,4}", "12345").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(4));
    }

    #[test]
    fn word_boundary_finds_whole_word() {
        let caps = run("\\<\\w+\\>", "  hi there").unwrap();
        assert_eq!(caps[0], Some(2));
        assert_eq!(caps[1], Some(4));
    }

    #[test]
    fn dot_does_not_match_empty_input() {
        assert!(run(".", "").is_none());
    }

    #[test]
    fn anchors_match_empty_input() {
        let caps = run("^$", "").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(0));
    }

    #[test]
    fn zero_bound_repetition_skips_atom() {
        let caps = run("a{0}b", "b").unwrap();
        assert_eq!(caps[0], Some(0));
        assert_eq!(caps[1], Some(1));
    }

    #[test]
    fn case_insensitive_ascii_matches_either_case() {
        let prog = Program::compile(b"A", true).unwrap();
        let mut caps = vec![None; prog.presub];
        assert!(exec(&prog, b"a", &mut caps, true, true));
    }

    #[test]
    fn match_is_idempotent() {
        let prog = Program::compile(b"(foo|bar)+", true).unwrap();
        let mut caps1 = vec![None; prog.presub];
        let mut caps2 = vec![None; prog.presub];
        assert!(exec(&prog, b"foobarfoo", &mut caps1, false, true));
        assert!(exec(&prog, b"foobarfoo", &mut caps2, false, true));
        assert_eq!(caps1, caps2);
    }
}
