// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The single rejection signal the compiler can raise.

use thiserror::Error;

/// Every way a pattern can fail to compile. There is no separate
/// runtime error type: matching either succeeds or it doesn't.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("trailing backslash at end of pattern")]
    TrailingBackslash,

    #[error("invalid hex digits in \\x, \\u, or \\U escape")]
    InvalidHexEscape,

    #[error("unterminated character class: missing ']'")]
    UnterminatedClass,

    #[error("quantifier applied to nothing")]
    EmptyQuantifierTarget,

    #[error("malformed repetition bound")]
    MalformedRepetition,

    #[error("repetition bound {value} exceeds the 65535 limit")]
    RepetitionBoundOverflow { value: u32 },

    #[error("malformed group: only '(' and '(?:' are supported")]
    MalformedGroup,

    #[error("unbalanced parentheses")]
    UnbalancedParens,
}

pub type Result<T> = std::result::Result<T, Error>;
