// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Translating a character stream to a token stream. The only tokens
//! are parentheses and atoms; whitespace separates atoms and is
//! dropped. See [read](../read/index.html) for building trees.

use crate::pos::Pos;
use crate::node::Symbol;
use genawaiter::rc::Gen;
use thiserror::Error;
use std::fmt::{Display, Write};
use std::io;

#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("IO error ({0}) after")]
    Io(io::Error),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct TokenizeErrorWithPos {
    pub err: TokenizeError,
    pub pos: Pos
}

impl TokenizeError {
    fn at(self, p: Pos) -> TokenizeErrorWithPos {
        TokenizeErrorWithPos {
            err: self,
            pos: p
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Atom(Symbol),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Token::Open => f.write_char('('),
            Token::Close => f.write_char(')'),
            Token::Atom(s) => Display::fmt(s, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos(pub Token, pub Pos);

pub fn maybe_open_close(c: char) -> Option<Token> {
    match c {
        '(' => Some(Token::Open),
        ')' => Some(Token::Close),
        _ => None
    }
}

/// Atoms are the longest runs of characters that are neither
/// whitespace nor parens. Stops after the first IO error.
pub fn tokenize<'s>(
    cs: impl Iterator<Item = io::Result<(char, Pos)>> + 's,
)
    -> impl Iterator<Item = Result<TokenWithPos, TokenizeErrorWithPos>> + 's
{
    Gen::new(|co| async move {
        let mut cs = cs;
        let mut tmp = String::new();
        let mut atom_start: Option<Pos> = None;
        let mut lastpos = Pos::START;
        while let Some(r) = cs.next() {
            let (c, pos) = match r {
                Err(e) => {
                    co.yield_(Err(TokenizeError::Io(e).at(lastpos))).await;
                    return;
                }
                Ok(cp) => cp
            };
            lastpos = pos;
            let maybe_paren = maybe_open_close(c);
            if maybe_paren.is_none() && !c.is_whitespace() {
                if atom_start.is_none() {
                    atom_start = Some(pos);
                    tmp.clear();
                }
                tmp.push(c);
                continue;
            }
            if let Some(start) = atom_start.take() {
                co.yield_(Ok(TokenWithPos(Token::Atom(Symbol::from_ref(&tmp)),
                                          start))).await;
            }
            if let Some(t) = maybe_paren {
                co.yield_(Ok(TokenWithPos(t, pos))).await;
            }
        }
        if let Some(start) = atom_start {
            co.yield_(Ok(TokenWithPos(Token::Atom(Symbol::from_ref(&tmp)),
                                      start))).await;
        }
    }).into_iter()
}
