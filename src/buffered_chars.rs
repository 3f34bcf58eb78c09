// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.


//! Get characters and their positions from anything implementing
//! `Read`, decoding it as UTF-8.

use crate::pos::Pos;
use std::io::{self, Read};
use utf8::{BufReadDecoder, BufReadDecoderError};
use genawaiter::rc::Gen;


fn decoder_error_to_io(e: BufReadDecoderError) -> io::Error {
    match e {
        BufReadDecoderError::Io(e) => e,
        BufReadDecoderError::InvalidByteSequence(bytes) =>
            io::Error::new(io::ErrorKind::InvalidData,
                           format!("invalid UTF-8 byte sequence {:?}", bytes)),
    }
}

/// Lazily decode `fh`. The first read or decoding error is yielded
/// and ends the stream.
pub fn buffered_chars<R>(
    fh: R
) -> impl Iterator<Item=io::Result<(char, Pos)>>
    where R: Read
{
    Gen::new(|co| async move {
        let mut inp = BufReadDecoder::new(io::BufReader::new(fh));
        let mut pos = Pos::START;
        while let Some(r) = inp.next_strict() {
            match r {
                Ok(s) => {
                    for c in s.chars() {
                        co.yield_(Ok((c, pos))).await;
                        pos = pos.advance(c);
                    }
                }
                Err(e) => {
                    co.yield_(Err(decoder_error_to_io(e))).await;
                    return;
                }
            }
        }
    }).into_iter()
}

#[cfg(test)]
mod tests {
    use super::buffered_chars;
    use crate::pos::Pos;

    #[test]
    fn positions_follow_lines() {
        let cs: Vec<(char, Pos)> = buffered_chars("a\nbc".as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(cs, vec![('a', Pos { line: 0, col: 0 }),
                            ('\n', Pos { line: 0, col: 1 }),
                            ('b', Pos { line: 1, col: 0 }),
                            ('c', Pos { line: 1, col: 1 })]);
    }

    #[test]
    fn multibyte_chars() {
        let s: String = buffered_chars("(λ x)".as_bytes())
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(s, "(λ x)");
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let input: &[u8] = b"ab\xff";
        let rs: Vec<_> = buffered_chars(input).collect();
        assert_eq!(rs.len(), 3);
        let e = rs[2].as_ref().unwrap_err();
        assert_eq!(e.kind(), std::io::ErrorKind::InvalidData);
    }
}
