// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! A reader for S-expressions as used by Lisp-family languages and
//! rule-based grammar formalisms, building in-memory trees:
//!
//! * `read::read_all` / `read::read_str` collect all top-level
//!   expressions; `read::read_iter` delivers each one as soon as its
//!   closing paren has been seen; `stream::spawn` does the reading on
//!   its own thread, handing expressions over one at a time.
//!
//! * Two tree shapes, selected via `settings::Mode`: flexible
//!   (variable-arity lists, `(x)` is the same as `x`) and canonical
//!   (right-nested cons cells, see `node::Pair`).
//!
//! * Atoms are taken verbatim: no numbers, strings or quoting, just
//!   runs of characters other than whitespace and parens.
//!
//! * Trees render back to text via `Display`; the rendering reads back
//!   to an equal tree.

pub mod buffered_chars;
pub mod node;
pub mod pos;
pub mod read;
pub mod settings;
pub mod stream;
pub mod tokenize;
