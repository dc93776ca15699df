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

use std::collections::HashSet;
use std::path::PathBuf;

use log::{debug, error};

use super::codec::{self, UNIQUIFIER};
use super::model::{sort_token, KeyCase, Tag, TagField};
use super::store::TagPrefs;
use crate::prefs::{PrefStore, TomlPrefs};
use crate::support::config::{LegacyLabelConfig, TagConfig};
use crate::support::error::Error;

/// The registry of message tags defined by the user.
///
/// Tags are kept in a preference store (see `TagPrefs` for the layout), which
/// is the only authority on what tags exist. The registry additionally caches
/// the set of known keys so that `is_valid_key()` does not have to scan the
/// store; the cache is rebuilt by every operation which adds or deletes a tag.
///
/// Operations that write more than one preference are not atomic. If one
/// fails, the writes before it remain. Every mutation is idempotent, so the
/// remedy is to repeat the whole operation.
pub struct TagRegistry<S> {
    pub(super) prefs: TagPrefs<S>,
    pub(super) legacy: LegacyLabelConfig,
    keys: KeyCache,
}

/// The keys of all known tags, in priority order as of the last refresh.
#[derive(Default)]
struct KeyCache {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl KeyCache {
    fn rebuild(tags: &[Tag]) -> Self {
        let ordered: Vec<String> =
            tags.iter().map(|t| t.key().to_owned()).collect();
        let members = ordered.iter().cloned().collect();
        KeyCache { ordered, members }
    }
}

impl TagRegistry<TomlPrefs> {
    /// Open the registry kept in the preference file at `path`.
    pub fn open(
        path: impl Into<PathBuf>,
        config: &TagConfig,
    ) -> Result<Self, Error> {
        Self::new(TomlPrefs::open(path)?, config)
    }
}

impl<S: PrefStore> TagRegistry<S> {
    /// Create a registry over `store`.
    ///
    /// This brings the stored tags up to the current scheme first. A failed
    /// migration is logged but does not prevent the registry from being used;
    /// the stored version is left alone so that it is attempted again the next
    /// time a registry is created over the same store.
    pub fn new(store: S, config: &TagConfig) -> Result<Self, Error> {
        let mut registry = TagRegistry {
            prefs: TagPrefs::new(store, config.branch.clone()),
            legacy: config.legacy.clone(),
            keys: KeyCache::default(),
        };

        if let Err(e) = registry.migrate() {
            error!("Tag migration failed, will retry on next start: {}", e);
        }

        registry.refresh_key_cache()?;
        Ok(registry)
    }

    /// The underlying preference store.
    pub fn store(&self) -> &S {
        self.prefs.root()
    }

    pub fn into_inner(self) -> S {
        self.prefs.into_inner()
    }

    /// Return the display text of the tag with the given key.
    ///
    /// Fails with `Error::NotFound` if there is no such tag.
    pub fn get_tag_for_key(&self, key: &str) -> Result<String, Error> {
        self.prefs.get_field(key, TagField::Tag, KeyCase::Normalize)
    }

    /// Return the colour of the tag with the given key, or an empty string if
    /// it has none.
    pub fn get_color_for_key(&self, key: &str) -> Result<String, Error> {
        self.optional_field(key, TagField::Color, KeyCase::Normalize)
    }

    /// Return the ordinal of the tag with the given key, or an empty string
    /// if it has none.
    pub fn get_ordinal_for_key(&self, key: &str) -> Result<String, Error> {
        self.optional_field(key, TagField::Ordinal, KeyCase::Normalize)
    }

    fn optional_field(
        &self,
        key: &str,
        field: TagField,
        case: KeyCase,
    ) -> Result<String, Error> {
        match self.prefs.get_field(key, field, case) {
            Ok(value) => Ok(value),
            Err(Error::NotFound) => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    /// Set the display text of the tag with the given key.
    ///
    /// This does not refresh the key cache; use `add_tag_for_key()` to define
    /// a new tag.
    pub fn set_tag_for_key(
        &mut self,
        key: &str,
        text: &str,
    ) -> Result<(), Error> {
        self.prefs.set_field(key, TagField::Tag, text)
    }

    /// Set the colour of the tag with the given key. An empty colour removes
    /// it.
    pub fn set_color_for_key(
        &mut self,
        key: &str,
        color: &str,
    ) -> Result<(), Error> {
        self.prefs.set_field(key, TagField::Color, color)
    }

    /// Set the ordinal of the tag with the given key. An empty ordinal
    /// removes it.
    pub fn set_ordinal_for_key(
        &mut self,
        key: &str,
        ordinal: &str,
    ) -> Result<(), Error> {
        self.prefs.set_field(key, TagField::Ordinal, ordinal)
    }

    /// Define or redefine the tag with the given key.
    ///
    /// Empty `text`, `color` or `ordinal` remove the corresponding entry.
    pub fn add_tag_for_key(
        &mut self,
        key: &str,
        text: &str,
        color: &str,
        ordinal: &str,
    ) -> Result<(), Error> {
        self.prefs.set_field(key, TagField::Tag, text)?;
        self.prefs.set_field(key, TagField::Color, color)?;
        self.refresh_key_cache()?;
        self.prefs.set_field(key, TagField::Ordinal, ordinal)
    }

    /// Define a tag with the given text, deriving its key from the text.
    ///
    /// If the derived key already belongs to a tag with different text, `A`
    /// is appended until a free key (or one holding this same text) is found.
    /// Adding the same text twice therefore updates a single tag.
    ///
    /// Returns the key the tag was stored under.
    pub fn add_tag(
        &mut self,
        text: &str,
        color: &str,
        ordinal: &str,
    ) -> Result<String, Error> {
        let mut key = codec::derive_key(text);
        loop {
            match self.get_tag_for_key(&key) {
                Ok(existing) if !existing.is_empty() && existing != text => {
                    key.push(UNIQUIFIER);
                }
                _ => break,
            }
        }

        self.add_tag_for_key(&key, text, color, ordinal)?;
        let key = key.to_ascii_lowercase();
        debug!("Tag {:?} stored as {}", text, key);
        Ok(key)
    }

    /// Delete the tag with the given key.
    pub fn delete_key(&mut self, key: &str) -> Result<(), Error> {
        self.delete_key_as(key, KeyCase::Normalize)
    }

    pub(super) fn delete_key_as(
        &mut self,
        key: &str,
        case: KeyCase,
    ) -> Result<(), Error> {
        self.prefs.delete_all_fields(key, case)?;
        self.refresh_key_cache()
    }

    /// Return whether a tag with exactly this key was known at the last cache
    /// refresh.
    pub fn is_valid_key(&self, key: &str) -> bool {
        self.keys.members.contains(key)
    }

    /// Iterate the known keys in priority order as of the last cache refresh.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.ordered.iter().map(String::as_str)
    }

    /// Find the key of a tag whose text is exactly `text`.
    ///
    /// If several tags share the text, the first in store enumeration order
    /// wins. Returns an empty string if no tag matches.
    pub fn get_key_for_tag(&self, text: &str) -> Result<String, Error> {
        let suffix = TagField::Tag.suffix();
        for entry in self.prefs.entry_names()? {
            let key = match entry.strip_suffix(suffix) {
                Some(key) => key,
                None => continue,
            };

            if self.prefs.get_entry(&entry).ok().as_deref() == Some(text) {
                return Ok(key.to_ascii_lowercase());
            }
        }

        Ok(String::new())
    }

    /// Of the space-separated keys in `key_list`, return the one belonging
    /// to the most important tag, i.e. the one that would come first in
    /// `get_all_tags()`.
    ///
    /// Keys of unknown tags, or of tags with empty text, are ignored. Returns
    /// an empty string if no key qualifies.
    pub fn get_top_key(&self, key_list: &str) -> String {
        let mut top: Option<(&str, String)> = None;
        for key in key_list.split(' ').filter(|k| !k.is_empty()) {
            match self.get_tag_for_key(key) {
                Ok(ref text) if !text.is_empty() => (),
                _ => continue,
            }

            let ordinal = self.get_ordinal_for_key(key).unwrap_or_default();
            let token = sort_token(key, &ordinal);
            if top.as_ref().map_or(true, |&(_, ref best)| token < best.as_str())
            {
                top = Some((key, token.to_owned()));
            }
        }

        top.map(|(key, _)| key.to_owned()).unwrap_or_default()
    }

    /// Return the style selector for the given key.
    pub fn get_selector_for_key(&self, key: &str) -> String {
        codec::derive_selector(key)
    }

    /// Return every tag, most important first.
    ///
    /// Tags are ordered by ordinal, or by key for tags without an ordinal,
    /// comparing byte-wise.
    pub fn get_all_tags(&self) -> Result<Vec<Tag>, Error> {
        self.all_tags_as(KeyCase::Normalize)
    }

    pub(super) fn all_tags_as(&self, case: KeyCase) -> Result<Vec<Tag>, Error> {
        let mut entries = self.prefs.entry_names()?;
        entries.sort();

        // Usually about a third of the entries are tags
        let mut tags = Vec::<Tag>::new();
        tags.try_reserve(entries.len())
            .map_err(|_| Error::OutOfMemory)?;

        let mut seen = HashSet::<&str>::new();
        for entry in entries.iter().rev() {
            let key = match entry.rfind('.') {
                Some(dot) => &entry[..dot],
                None => continue,
            };

            if key.is_empty() || !seen.insert(key) {
                continue;
            }

            let text = match self.prefs.get_field(key, TagField::Tag, case) {
                Ok(text) => text,
                Err(Error::NotFound) => continue,
                Err(e) => return Err(e),
            };
            let color = self.optional_field(key, TagField::Color, case)?;
            let ordinal = self.optional_field(key, TagField::Ordinal, case)?;
            tags.push(Tag::new(key, text, color, ordinal));
        }

        tags.sort_by(Tag::priority_cmp);
        Ok(tags)
    }

    fn refresh_key_cache(&mut self) -> Result<(), Error> {
        let tags = self.get_all_tags()?;
        self.keys = KeyCache::rebuild(&tags);
        Ok(())
    }
}
