// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A Thompson-NFA / Pike VM regular expression engine.
//!
//! Patterns compile down to a small bytecode ([`inst::Inst`]) which a
//! linear-time virtual machine ([`vm`]) simulates breadth-first,
//! advancing every live thread one codepoint at a time so that no
//! single match attempt can blow up exponentially regardless of
//! pattern shape. [`Regex`] and [`Captures`] are the entry points most
//! callers need; the rest of the modules are the machinery underneath.
//!
//! ```
//! use regexvm::Regex;
//!
//! let re = Regex::new(r"(\w+)@(\w+)\.com", false, true).unwrap();
//! let caps = re.captures(b"contact: alice@example.com today").unwrap();
//! assert_eq!(caps.bytes(1), Some(&b"alice"[..]));
//! assert_eq!(caps.bytes(2), Some(&b"example"[..]));
//! ```

pub mod captures;
pub mod classes;
pub mod codec;
mod compiler;
pub mod error;
pub mod inst;
pub mod program;
mod regex;
pub mod sparse;
mod vm;

pub use crate::error::Error;
pub use crate::program::Program;
pub use crate::regex::{Captures, Regex};
