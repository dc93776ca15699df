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

//! Derivation of keys from tag text, and of style selectors from keys.
//!
//! Both directions are pure and never touch the store.

use std::fmt::Write as _;

use crate::support::folder_safe;

/// Characters in tag text that may not appear in a key. Each one becomes `_`.
///
/// These are the characters with special meaning in IMAP atoms and
/// `list-wildcards`, plus the space.
const RESERVED: &[char] =
    &[' ', '(', ')', '/', '{', '%', '*', '<', '>', '\\', '"'];

/// The character appended to a key to move away from a collision.
pub const UNIQUIFIER: char = 'A';

/// Derive the base key for a tag with the given text.
///
/// The result may already be in use by a different tag; see
/// `TagRegistry::add_tag()` for how collisions are resolved.
pub fn derive_key(text: &str) -> String {
    let replaced = text.replace(RESERVED, "_");
    // Some IMAP servers upper-case keywords, so keys are normalised to lower
    // case.
    folder_safe::encode(&replaced).to_ascii_lowercase()
}

/// Derive a token from `key` usable as a class name in markup and style
/// sheets.
///
/// The result always starts with `T`, so that user tags can never collide
/// with built-in names like "selected". Every byte which is not an ASCII
/// letter or digit is written as `_` and two lower-case hex digits.
pub fn derive_selector(key: &str) -> String {
    let mut selector = String::with_capacity(1 + key.len() * 3);
    selector.push('T');
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() {
            selector.push(byte as char);
        } else {
            // Writing to a String cannot fail
            let _ = write!(selector, "_{:02x}", byte);
        }
    }
    selector
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn derive_key_examples() {
        assert_eq!("work", derive_key("Work"));
        assert_eq!("to_do", derive_key("To Do"));
        assert_eq!("a_b_c_d_", derive_key("a(b)c/d{"));
        assert_eq!("_______", derive_key("%*<>\\\" "));
        assert_eq!("$label1", derive_key("$label1"));
        assert_eq!("r&-d", derive_key("R&D"));
        // Base64 output is lower-cased too
        assert_eq!("&zevnliqe-", derive_key("日本語"));
    }

    #[test]
    fn derive_selector_examples() {
        assert_eq!("T", derive_selector(""));
        assert_eq!("Twork", derive_selector("work"));
        assert_eq!("T_24label1", derive_selector("$label1"));
        assert_eq!("Tto_5fdo", derive_selector("to_do"));
        assert_eq!("Tr_26_2dd", derive_selector("r&-d"));
        assert_eq!("T_c3_a9", derive_selector("é"));
    }

    proptest! {
        #[test]
        fn derived_keys_are_lower_case_and_stable(s in ".*") {
            let key = derive_key(&s);
            prop_assert_eq!(&key, &derive_key(&s));
            prop_assert_eq!(key.to_ascii_lowercase(), key.clone());
            prop_assert!(!key.contains(RESERVED));
        }

        #[test]
        fn selectors_are_injective(a in ".*", b in ".*") {
            let sa = derive_selector(&a);
            prop_assert!(sa.starts_with('T'));
            prop_assert!(sa
                .bytes()
                .all(|c| c.is_ascii_alphanumeric() || b'_' == c));
            if a != b {
                prop_assert_ne!(sa, derive_selector(&b));
            }
        }
    }
}
