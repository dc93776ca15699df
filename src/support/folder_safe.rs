//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Mailtags.
//
// Mailtags is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Mailtags is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Mailtags. If not, see <http://www.gnu.org/licenses/>.

//! IMAP's "modified UTF-7" (RFC 3501 §5.1.3), the encoding mail folder names
//! travel in.
//!
//! Tag keys are derived through this encoding so that any tag text, whatever
//! script it is written in, becomes a 7-bit token which an IMAP server will
//! accept as a keyword once the reserved characters have been replaced.

use std::borrow::Cow;

const SHIFT_IN: char = '&';
const SHIFT_IN_ESCAPED: &str = "&-";
const SHIFT_OUT: char = '-';

/// Encode the given string into modified UTF-7.
///
/// The encoded string is minimal and normalised: printable ASCII other than
/// `&` is passed through, `&` becomes `&-`, and each maximal run of anything
/// else is written as big-endian UTF-16 in the `,` variant of base64 between
/// `&` and an explicit `-`.
pub fn encode(s: &str) -> Cow<'_, str> {
    if s.bytes().all(is_direct) {
        return Cow::Borrowed(s);
    }

    let mut transformed = String::with_capacity(s.len() + 8);
    let mut indirect_start = None;
    for (ix, ch) in s.char_indices() {
        let direct = ch.is_ascii() && is_direct(ch as u8);
        if !direct && SHIFT_IN != ch {
            indirect_start.get_or_insert(ix);
            continue;
        }

        if let Some(start) = indirect_start.take() {
            encode_group(&mut transformed, &s[start..ix]);
        }

        if direct {
            transformed.push(ch);
        } else {
            transformed.push_str(SHIFT_IN_ESCAPED);
        }
    }

    if let Some(start) = indirect_start {
        encode_group(&mut transformed, &s[start..]);
    }

    Cow::Owned(transformed)
}

fn encode_group(dst: &mut String, group: &str) {
    let mut buf = Vec::<u8>::with_capacity(group.len() * 2);
    for unit in group.encode_utf16() {
        buf.extend_from_slice(&unit.to_be_bytes());
    }

    dst.push(SHIFT_IN);
    dst.push_str(&base64::encode_config(&buf, base64::IMAP_MUTF7));
    dst.push(SHIFT_OUT);
}

fn is_direct(byte: u8) -> bool {
    byte >= b' ' && byte < 0x7F && byte != SHIFT_IN as u8
}
