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

use std::cmp::Ordering;
use std::fmt;

/// A user-defined message tag.
///
/// Tags returned by the registry are snapshots; nothing done to a `Tag` is
/// reflected in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    key: String,
    text: String,
    color: String,
    ordinal: String,
}

impl Tag {
    pub fn new(
        key: impl Into<String>,
        text: impl Into<String>,
        color: impl Into<String>,
        ordinal: impl Into<String>,
    ) -> Self {
        Tag {
            key: key.into(),
            text: text.into(),
            color: color.into(),
            ordinal: ordinal.into(),
        }
    }

    /// The identifier of the tag, as applied to messages.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The label the user sees. May be empty.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The display colour, or empty for the default styling.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The sort token, or empty if the tag is unordered.
    pub fn ordinal(&self) -> &str {
        &self.ordinal
    }

    /// The string tags are ranked by: the ordinal, or the key if there is no
    /// ordinal.
    pub fn sort_token(&self) -> &str {
        sort_token(&self.key, &self.ordinal)
    }

    /// Compare two tags by priority. The lesser tag is the more important.
    pub fn priority_cmp(&self, other: &Tag) -> Ordering {
        self.sort_token().cmp(other.sort_token())
    }
}

pub(super) fn sort_token<'a>(key: &'a str, ordinal: &'a str) -> &'a str {
    if ordinal.is_empty() {
        key
    } else {
        ordinal
    }
}

/// One of the preference entries that make up a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagField {
    Tag,
    Color,
    Ordinal,
}

impl TagField {
    pub const ALL: [TagField; 3] =
        [TagField::Tag, TagField::Color, TagField::Ordinal];

    /// The suffix, including the separating `.`, which follows the key in
    /// the preference name.
    pub fn suffix(self) -> &'static str {
        match self {
            TagField::Tag => ".tag",
            TagField::Color => ".color",
            TagField::Ordinal => ".ordinal",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.suffix()[1..])
    }
}

/// How a key is turned into a preference name on lookup.
///
/// Keys are stored lower-case. Stores written before that rule existed may
/// hold mixed-case keys, which can only be read back by looking them up
/// verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCase {
    /// Lower-case the key before use.
    Normalize,
    /// Use the key exactly as given.
    Preserve,
}

impl KeyCase {
    pub fn apply(self, key: &str) -> String {
        match self {
            KeyCase::Normalize => key.to_ascii_lowercase(),
            KeyCase::Preserve => key.to_owned(),
        }
    }
}
