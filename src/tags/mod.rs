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

//! The registry of user-defined message tags.
//!
//! A tag has a key, which is what gets applied to messages (as an IMAP
//! keyword, for example), plus display text, a colour, and an ordinal which
//! ranks it against other tags. Keys are derived from the text the user
//! first gave the tag and never change afterwards, so renaming a tag keeps it
//! applied to the same messages.

mod codec;
mod migration;
mod model;
mod registry;
mod store;

pub use codec::{derive_key, derive_selector};
pub use migration::{Migration, CURRENT_VERSION};
pub use model::{KeyCase, Tag, TagField};
pub use registry::TagRegistry;
pub use store::TagPrefs;
