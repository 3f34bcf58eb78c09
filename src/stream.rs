// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Reading on a separate thread. The reading thread hands over each
//! completed top-level expression through a rendezvous channel, so it
//! never gets more than one expression ahead of the consumer. Dropping
//! the [Stream](Stream) stops the reading thread at its next hand-over,
//! which also closes its input.

use crate::node::Node;
use crate::read::{read_iter, ReadErrorWithPos};
use crate::settings::Settings;
use std::io::Read;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

type Message = Result<Node, ReadErrorWithPos>;

/// The consumer side. Iterating yields the expressions in input order;
/// an error ends the iteration and is returned by `finish`.
#[derive(Debug)]
pub struct Stream {
    rx: Option<Receiver<Message>>,
    handle: Option<JoinHandle<()>>,
    error: Option<ReadErrorWithPos>,
}

/// Start reading `fh` on a new thread.
pub fn spawn<R>(fh: R, settings: Settings) -> Stream
    where R: Read + Send + 'static
{
    let (tx, rx) = sync_channel::<Message>(0);
    let handle = thread::spawn(move || {
        debug!(?settings, "reader thread started");
        let mut count = 0usize;
        for r in read_iter(fh, settings) {
            let failed = r.is_err();
            if tx.send(r).is_err() {
                debug!(count, "consumer hung up, stopping");
                return;
            }
            if failed {
                debug!(count, "reader thread stopped after error");
                return;
            }
            count += 1;
            trace!(count, "handed over expression");
        }
        debug!(count, "reader thread done");
    });
    Stream {
        rx: Some(rx),
        handle: Some(handle),
        error: None,
    }
}

impl Iterator for Stream {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.error.is_some() {
            return None
        }
        match self.rx.as_ref()?.recv() {
            Ok(Ok(node)) => Some(node),
            Ok(Err(e)) => {
                self.error = Some(e);
                None
            }
            Err(_) => None
        }
    }
}

impl Stream {
    /// The error that ended the iteration, if any.
    pub fn error(&self) -> Option<&ReadErrorWithPos> {
        self.error.as_ref()
    }

    /// Stop reading and wait for the reading thread to exit. Expressions
    /// not yet consumed are discarded; meant to be called once the
    /// iteration ended. Blocks while the thread waits for input.
    pub fn finish(mut self) -> Result<(), ReadErrorWithPos> {
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            if let Err(panic) = handle.join() {
                std::panic::resume_unwind(panic)
            }
        }
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(())
        }
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        // The thread notices the closed channel on its next send; it is
        // not joined, since it might be blocked reading its input.
        self.rx = None;
    }
}

/// Read all of `fh` on a separate thread, collecting the results.
pub fn spawn_read_all<R>(fh: R, settings: Settings)
                         -> (Vec<Node>, Option<ReadErrorWithPos>)
    where R: Read + Send + 'static
{
    let mut stream = spawn(fh, settings);
    let values: Vec<Node> = stream.by_ref().collect();
    match stream.finish() {
        Ok(()) => (values, None),
        Err(e) => (values, Some(e)),
    }
}
