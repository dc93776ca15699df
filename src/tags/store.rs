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

//! Maps tags onto preference entries.
//!
//! Each tag is up to three string preferences under the tag branch, named
//! `<key>.tag`, `<key>.color` and `<key>.ordinal`. A tag exists exactly when
//! its `<key>.tag` entry exists. The branch also holds a bare integer
//! `version` entry recording which storage scheme the entries follow.

use log::debug;

use super::model::{KeyCase, TagField};
use crate::prefs::PrefStore;
use crate::support::error::Error;

const VERSION: &str = "version";

/// Typed access to the tag entries of a preference store.
pub struct TagPrefs<S> {
    store: S,
    branch: String,
}

impl<S: PrefStore> TagPrefs<S> {
    /// Wrap `store`, with tag entries under the `branch` prefix.
    pub fn new(store: S, branch: impl Into<String>) -> Self {
        TagPrefs {
            store,
            branch: branch.into(),
        }
    }

    /// Access the whole store, outside of the tag branch.
    pub fn root(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn pref_name(&self, key: &str, field: TagField, case: KeyCase) -> String {
        let mut name = self.branch.clone();
        name.push_str(&case.apply(key));
        name.push_str(field.suffix());
        name
    }

    /// Read one field of the tag with the given key.
    ///
    /// Fails with `Error::NotFound` if the entry does not exist.
    pub fn get_field(
        &self,
        key: &str,
        field: TagField,
        case: KeyCase,
    ) -> Result<String, Error> {
        self.store.get_string(&self.pref_name(key, field, case))
    }

    /// Write one field of the tag with the given key.
    ///
    /// Writing an empty value removes the entry instead. The key is always
    /// lower-cased.
    pub fn set_field(
        &mut self,
        key: &str,
        field: TagField,
        value: &str,
    ) -> Result<(), Error> {
        let name = self.pref_name(key, field, KeyCase::Normalize);
        if value.is_empty() {
            debug!("Clearing {}", name);
            self.store.clear_pref(&name)
        } else {
            debug!("Setting {} = {:?}", name, value);
            self.store.set_string(&name, value)
        }
    }

    /// Remove every field of the tag with the given key.
    pub fn delete_all_fields(
        &mut self,
        key: &str,
        case: KeyCase,
    ) -> Result<(), Error> {
        for &field in &TagField::ALL {
            let name = self.pref_name(key, field, case);
            self.store.clear_pref(&name)?;
        }
        debug!("Deleted tag {}", case.apply(key));
        Ok(())
    }

    /// Return the names of all entries in the branch, relative to the branch,
    /// e.g. `work.tag` or `version`, in store enumeration order.
    pub fn entry_names(&self) -> Result<Vec<String>, Error> {
        let prefix_len = self.branch.len();
        Ok(self
            .store
            .child_names(&self.branch)?
            .into_iter()
            .map(|mut name| name.split_off(prefix_len))
            .collect())
    }

    /// Read an entry by its name relative to the branch, as returned by
    /// `entry_names()`.
    pub fn get_entry(&self, entry: &str) -> Result<String, Error> {
        self.store.get_string(&format!("{}{}", self.branch, entry))
    }

    /// Read the storage scheme version. An absent version is 0.
    pub fn version(&self) -> Result<i32, Error> {
        match self.store.get_int(&format!("{}{}", self.branch, VERSION)) {
            Ok(version) => Ok(version),
            Err(Error::NotFound) => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub fn set_version(&mut self, version: i32) -> Result<(), Error> {
        let name = format!("{}{}", self.branch, VERSION);
        self.store.set_int(&name, version)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prefs::MemoryPrefs;

    fn tag_prefs() -> TagPrefs<MemoryPrefs> {
        TagPrefs::new(MemoryPrefs::new(), "mailnews.tags.")
    }

    #[test]
    fn fields_round_trip() {
        let mut prefs = tag_prefs();
        prefs.set_field("Work", TagField::Tag, "Work").unwrap();
        prefs.set_field("work", TagField::Color, "#FF0000").unwrap();

        assert_eq!(
            "Work",
            prefs
                .get_field("WORK", TagField::Tag, KeyCase::Normalize)
                .unwrap()
        );
        assert_eq!(
            "#FF0000",
            prefs
                .root()
                .get_string("mailnews.tags.work.color")
                .unwrap()
        );
        assert_matches!(
            Err(Error::NotFound),
            prefs.get_field("work", TagField::Ordinal, KeyCase::Normalize)
        );
        // Writes always lower-case, so a verbatim mixed-case read misses
        assert_matches!(
            Err(Error::NotFound),
            prefs.get_field("Work", TagField::Tag, KeyCase::Preserve)
        );
    }

    #[test]
    fn empty_value_clears() {
        let mut prefs = tag_prefs();
        prefs.set_field("work", TagField::Color, "#FF0000").unwrap();
        prefs.set_field("work", TagField::Color, "").unwrap();
        assert!(prefs.root().is_empty());
    }

    #[test]
    fn preserve_case_reads_and_deletes_verbatim() {
        let mut store = MemoryPrefs::new();
        store.set_string("mailnews.tags.Urgent.tag", "Urgent").unwrap();
        store.set_string("mailnews.tags.Urgent.color", "red").unwrap();
        store.set_string("mailnews.tags.UrgentA.tag", "Other").unwrap();
        let mut prefs = TagPrefs::new(store, "mailnews.tags.");

        assert_matches!(
            Err(Error::NotFound),
            prefs.get_field("Urgent", TagField::Tag, KeyCase::Normalize)
        );
        assert_eq!(
            "Urgent",
            prefs
                .get_field("Urgent", TagField::Tag, KeyCase::Preserve)
                .unwrap()
        );

        prefs.delete_all_fields("Urgent", KeyCase::Preserve).unwrap();
        assert_eq!(vec!["UrgentA.tag"], prefs.entry_names().unwrap());
    }

    #[test]
    fn entry_names_are_relative() {
        let mut prefs = tag_prefs();
        prefs.set_field("a", TagField::Tag, "A").unwrap();
        prefs.set_version(2).unwrap();

        assert_eq!(vec!["a.tag", "version"], prefs.entry_names().unwrap());
        assert_eq!("A", prefs.get_entry("a.tag").unwrap());
    }

    #[test]
    fn version_defaults_to_zero() {
        let mut prefs = tag_prefs();
        assert_eq!(0, prefs.version().unwrap());
        prefs.set_version(2).unwrap();
        assert_eq!(2, prefs.version().unwrap());
    }
}
