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

//! The hierarchical preference store that tags live in.
//!
//! Preferences are named by dotted paths (`mailnews.tags.work.color`) and hold
//! either a string, an integer, or a localized string. The store is flat; the
//! hierarchy exists only in the names, and a "branch" is just a name prefix.
//!
//! Nothing here knows about tags. The tag registry consumes a store through
//! the `PrefStore` trait so that it can run against memory in tests and
//! against a file in the command-line tool.

use crate::support::error::Error;

mod memory;
mod toml_file;

pub use memory::MemoryPrefs;
pub use toml_file::TomlPrefs;

/// The value held by a single preference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefValue {
    Int(i32),
    String(String),
    /// A string the user sees, which may be replaced by a translation.
    ///
    /// Only readable through `get_localized_string()`.
    Localized(String),
}

/// The operations the tag registry needs from a preference store.
///
/// All names are full preference names. Reads of absent names fail with
/// `Error::NotFound`; reads of a name holding another kind of value fail with
/// `Error::WrongType`.
pub trait PrefStore {
    fn get_string(&self, name: &str) -> Result<String, Error>;
    fn set_string(&mut self, name: &str, value: &str) -> Result<(), Error>;

    /// Read a localized string, falling back to a plain string preference of
    /// the same name.
    fn get_localized_string(&self, name: &str) -> Result<String, Error>;

    fn get_int(&self, name: &str) -> Result<i32, Error>;
    fn set_int(&mut self, name: &str, value: i32) -> Result<(), Error>;

    /// Remove the preference. Removing an absent preference is not an error.
    fn clear_pref(&mut self, name: &str) -> Result<(), Error>;

    /// Return the full names of all preferences starting with `prefix`, in
    /// the store's own enumeration order.
    fn child_names(&self, prefix: &str) -> Result<Vec<String>, Error>;
}
