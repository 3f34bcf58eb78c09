// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Settings for reading.

/// How closed groups are turned into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Variable-arity lists; a group with a single element is
    /// replaced by that element.
    #[default]
    Flexible,
    /// Right-nested `Pair` chains. Nested groups are spliced into the
    /// chain of the group containing them.
    Canonical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    /// How many groups may be open at the same time.
    pub max_depth: u32,
}

const DEFAULT_MAX_DEPTH: u32 = 500;

pub const FLEXIBLE: Settings = Settings {
    mode: Mode::Flexible,
    max_depth: DEFAULT_MAX_DEPTH,
};

pub const CANONICAL: Settings = Settings {
    mode: Mode::Canonical,
    max_depth: DEFAULT_MAX_DEPTH,
};

impl Default for Settings {
    fn default() -> Settings {
        FLEXIBLE
    }
}

impl Settings {
    pub fn with_max_depth(self, max_depth: u32) -> Settings {
        Settings { max_depth, ..self }
    }
}
