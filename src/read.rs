// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Building trees from the token stream: [Reader](Reader) is the state
//! machine, [read](read) and [read_iter](read_iter) deliver each
//! top-level expression as soon as its closing paren was seen, and
//! [read_all](read_all) collects them.

use crate::buffered_chars::buffered_chars;
use crate::node::{Node, Pair, Symbol};
use crate::pos::Pos;
use crate::settings::{Mode, Settings};
use crate::tokenize::{tokenize, Token, TokenWithPos,
                      TokenizeError, TokenizeErrorWithPos};
use genawaiter::rc::Gen;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error ({0}) after")]
    Io(io::Error),
    #[error("premature EOF while expecting closing character ')' for '('")]
    UnbalancedParens,
    #[error("unexpected closing character ')'")]
    UnexpectedCloseParen,
    #[error("nesting too deep")]
    NestingTooDeep,
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ReadErrorWithPos {
    pub err: ReadError,
    pub pos: Pos
}

impl ReadError {
    fn at(self, p: Pos) -> ReadErrorWithPos {
        ReadErrorWithPos {
            err: self,
            pos: p
        }
    }
}

impl From<TokenizeErrorWithPos> for ReadErrorWithPos {
    fn from(ep: TokenizeErrorWithPos) -> ReadErrorWithPos {
        let TokenizeErrorWithPos { err, pos } = ep;
        match err {
            TokenizeError::Io(e) => ReadError::Io(e).at(pos)
        }
    }
}

#[derive(Error, Debug)]
pub enum ReadFileError {
    #[error("{path:?}: {err}")]
    Open { path: PathBuf, err: io::Error },
    #[error("{err} in {path:?}")]
    Read { path: PathBuf, err: ReadErrorWithPos },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    AwaitingTopLevel,
    /// The number of currently open groups
    InGroup(usize),
    Done,
    Failed,
}

// An open paren and what was collected since
#[derive(Debug)]
struct Group {
    start: Pos,
    items: Vec<Node>,
    // Canonical mode only: the chain collected so far ends in a cell
    // without `next`, i.e. its last item has to be wrapped, not stored
    // bare.
    open_tail: bool,
}

impl Group {
    fn new(start: Pos) -> Group {
        Group { start, items: Vec::new(), open_tail: false }
    }

    fn push_atom(&mut self, s: Symbol) {
        // The first element starts a chain of one cell (x); any later
        // atom goes into the `next` of the last cell.
        self.open_tail = self.items.is_empty();
        self.items.push(Node::Symbol(s));
    }

    fn into_flexible(mut self) -> Node {
        if self.items.len() == 1 {
            if let Some(node) = self.items.pop() {
                return node
            }
        }
        Node::List(self.items)
    }

    /// Append the chain of the closed group `inner` at the end of ours.
    fn splice(&mut self, inner: Group) {
        if inner.items.is_empty() {
            return
        }
        self.items.extend(inner.items);
        self.open_tail = inner.open_tail;
    }

    fn into_canonical(self) -> Node {
        let Group { mut items, open_tail, .. } = self;
        let last =
            if open_tail || items.len() < 2 {
                None
            } else {
                items.pop()
            };
        match Pair::chain(items, last) {
            Some(p) => Node::Pair(p),
            None => Node::List(Vec::new()),
        }
    }
}

/// Push-driven parser: `feed` it tokens, it returns each completed
/// top-level expression; call `finish` at the end of the input.
#[derive(Debug)]
pub struct Reader {
    settings: Settings,
    stack: Vec<Group>,
    terminated: Option<ReaderState>,
}

impl Reader {
    pub fn new(settings: Settings) -> Reader {
        Reader {
            settings,
            stack: Vec::new(),
            terminated: None,
        }
    }

    pub fn state(&self) -> ReaderState {
        if let Some(s) = self.terminated {
            s
        } else if self.stack.is_empty() {
            ReaderState::AwaitingTopLevel
        } else {
            ReaderState::InGroup(self.stack.len())
        }
    }

    /// Once `Done` or `Failed`, further tokens are ignored.
    pub fn feed(
        &mut self,
        token: TokenWithPos
    ) -> Result<Option<Node>, ReadErrorWithPos> {
        if self.terminated.is_some() {
            return Ok(None)
        }
        let r = self.step(token);
        if r.is_err() {
            self.terminated = Some(ReaderState::Failed);
        }
        r
    }

    fn step(
        &mut self,
        token: TokenWithPos
    ) -> Result<Option<Node>, ReadErrorWithPos> {
        let TokenWithPos(t, pos) = token;
        match t {
            Token::Open => {
                if self.stack.len() >= self.settings.max_depth as usize {
                    return Err(ReadError::NestingTooDeep.at(pos))
                }
                self.stack.push(Group::new(pos));
                Ok(None)
            }
            Token::Atom(s) => {
                if let Some(group) = self.stack.last_mut() {
                    group.push_atom(s);
                    Ok(None)
                } else {
                    Ok(Some(Node::Symbol(s)))
                }
            }
            Token::Close => {
                let group = self.stack.pop().ok_or_else(
                    || ReadError::UnexpectedCloseParen.at(pos))?;
                match (self.settings.mode, self.stack.last_mut()) {
                    (Mode::Flexible, Some(outer)) => {
                        outer.items.push(group.into_flexible());
                        Ok(None)
                    }
                    (Mode::Flexible, None) => Ok(Some(group.into_flexible())),
                    (Mode::Canonical, Some(outer)) => {
                        outer.splice(group);
                        Ok(None)
                    }
                    (Mode::Canonical, None) => Ok(Some(group.into_canonical())),
                }
            }
        }
    }

    /// Signal the end of the input. Fails if groups are still open,
    /// reporting the innermost one.
    pub fn finish(&mut self) -> Result<(), ReadErrorWithPos> {
        if self.terminated.is_some() {
            return Ok(())
        }
        if let Some(group) = self.stack.last() {
            self.terminated = Some(ReaderState::Failed);
            Err(ReadError::UnbalancedParens.at(group.start))
        } else {
            self.terminated = Some(ReaderState::Done);
            Ok(())
        }
    }
}

/// Yields each top-level expression as soon as it is complete. The
/// first error is yielded last.
pub fn read<'s>(
    ts: impl Iterator<Item = Result<TokenWithPos, TokenizeErrorWithPos>> + 's,
    settings: Settings,
) -> impl Iterator<Item = Result<Node, ReadErrorWithPos>> + 's
{
    Gen::new(|co| async move {
        let mut reader = Reader::new(settings);
        for te in ts {
            let r = match te {
                Ok(t) => reader.feed(t),
                Err(e) => Err(e.into()),
            };
            match r {
                Ok(Some(node)) => co.yield_(Ok(node)).await,
                Ok(None) => {}
                Err(e) => {
                    co.yield_(Err(e)).await;
                    return;
                }
            }
        }
        if let Err(e) = reader.finish() {
            co.yield_(Err(e)).await;
        }
    }).into_iter()
}

/// `read` from anything implementing `Read`.
pub fn read_iter<'s, R: Read + 's>(
    fh: R,
    settings: Settings,
) -> impl Iterator<Item = Result<Node, ReadErrorWithPos>> + 's
{
    read(tokenize(buffered_chars(fh)), settings)
}

/// The outcome of reading a whole input: the expressions completed
/// before the first error, and that error, if any.
#[derive(Debug)]
pub struct ReadAll {
    pub values: Vec<Node>,
    pub error: Option<ReadErrorWithPos>,
}

impl ReadAll {
    pub fn into_result(self) -> Result<Vec<Node>, ReadErrorWithPos> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.values)
        }
    }
}

pub fn read_all(
    fh: impl Read,
    settings: Settings,
) -> ReadAll
{
    let mut values = Vec::new();
    for r in read_iter(fh, settings) {
        match r {
            Ok(v) => values.push(v),
            Err(e) => return ReadAll { values, error: Some(e) }
        }
    }
    ReadAll { values, error: None }
}

pub fn read_str(s: &str, settings: Settings) -> ReadAll {
    read_all(s.as_bytes(), settings)
}

pub fn read_file(
    path: &Path,
    settings: Settings,
) -> Result<Vec<Node>, ReadFileError> {
    let fh = File::open(path).map_err(
        |err| ReadFileError::Open { path: path.to_path_buf(), err })?;
    let all = read_all(fh, settings);
    debug!(path = ?path, count = all.values.len(), failed = all.error.is_some(),
           "read file");
    all.into_result().map_err(
        |err| ReadFileError::Read { path: path.to_path_buf(), err })
}

/// Print each value on its own line.
pub fn write_all<'t>(
    out: impl Write,
    vals: impl IntoIterator<Item = &'t Node>
) -> Result<(), io::Error> {
    let mut out = out; // for `File`
    for v in vals.into_iter() {
        writeln!(out, "{}", v)?;
    }
    out.flush()
}
