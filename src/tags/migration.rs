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

//! Bringing stored tags up to the current storage scheme.
//!
//! The scheme is recorded as an integer `version` in the tag branch:
//!
//! - 0 (or absent): there are no tags yet, but there may be labels from the
//!   older fixed-slot scheme. Each slot has a localized description and a
//!   colour, and becomes a tag with key `$label<N>`. A field the store lacks
//!   takes the configured default for its slot.
//!
//! - 1: tags exist, but their keys may be mixed case, which some IMAP servers
//!   do not preserve. Every tag is re-stored under its lower-cased key.
//!
//! - 2: current.
//!
//! A migration that fails leaves the version untouched so that it runs again
//! next time. Since every step re-stores the same values, repeating a
//! partially completed migration is harmless.

use log::info;

use super::model::KeyCase;
use super::registry::TagRegistry;
use crate::prefs::PrefStore;
use crate::support::error::Error;

pub const CURRENT_VERSION: i32 = 2;

/// The work needed to bring a store to `CURRENT_VERSION`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Migration {
    UpToDate,
    LowerCaseKeys,
    LegacyLabels,
}

impl Migration {
    pub fn for_version(version: i32) -> Self {
        if version > 1 {
            Migration::UpToDate
        } else if 1 == version {
            Migration::LowerCaseKeys
        } else {
            Migration::LegacyLabels
        }
    }
}

impl<S: PrefStore> TagRegistry<S> {
    /// Determine which migration the store needs, and run it.
    pub fn migrate(&mut self) -> Result<(), Error> {
        let migration = Migration::for_version(self.prefs.version()?);
        self.apply_migration(migration)
    }

    fn apply_migration(&mut self, migration: Migration) -> Result<(), Error> {
        match migration {
            Migration::UpToDate => return Ok(()),
            Migration::LowerCaseKeys => self.lower_case_keys()?,
            Migration::LegacyLabels => self.import_legacy_labels()?,
        }

        self.prefs.set_version(CURRENT_VERSION)?;
        info!("Tags migrated ({:?})", migration);
        Ok(())
    }

    fn lower_case_keys(&mut self) -> Result<(), Error> {
        info!("Converting tag keys to lower case");
        for tag in self.all_tags_as(KeyCase::Preserve)? {
            self.delete_key_as(tag.key(), KeyCase::Preserve)?;
            self.add_tag_for_key(
                tag.key(),
                tag.text(),
                tag.color(),
                tag.ordinal(),
            )?;
        }

        Ok(())
    }

    fn import_legacy_labels(&mut self) -> Result<(), Error> {
        info!("Importing {} legacy labels as tags", self.legacy.slots);
        for slot in 1..=self.legacy.slots {
            let default = self.legacy.defaults.get(slot - 1);
            let description = or_default(
                self.prefs.root().get_localized_string(&format!(
                    "{}{}",
                    self.legacy.description_prefix, slot
                )),
                default.map(|d| &d.text),
                slot,
            )?;
            let color = or_default(
                self.prefs.root().get_string(&format!(
                    "{}{}",
                    self.legacy.color_prefix, slot
                )),
                default.map(|d| &d.color),
                slot,
            )?;

            self.add_tag_for_key(
                &format!("$label{}", slot),
                &description,
                &color,
                "",
            )?;
        }

        Ok(())
    }
}

/// Resolve one field of a legacy label slot. An entry missing from the store
/// takes the configured default; without one, the slot is incomplete.
fn or_default(
    stored: Result<String, Error>,
    default: Option<&String>,
    slot: usize,
) -> Result<String, Error> {
    match (stored, default) {
        (Err(Error::NotFound), Some(default)) => Ok(default.clone()),
        (Err(Error::NotFound), None) => Err(Error::MigrationIncomplete(slot)),
        (r, _) => r,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prefs::{MemoryPrefs, PrefValue};
    use crate::support::config::TagConfig;
    use crate::tags::Tag;

    fn config_with_slots(slots: usize) -> TagConfig {
        let mut config = TagConfig::default();
        config.legacy.slots = slots;
        config.legacy.defaults.clear();
        config
    }

    fn add_label(
        store: &mut MemoryPrefs,
        slot: usize,
        text: &str,
        color: &str,
    ) {
        store.insert(
            format!("mailnews.labels.description.{}", slot),
            PrefValue::Localized(text.to_owned()),
        );
        store
            .set_string(&format!("mailnews.labels.color.{}", slot), color)
            .unwrap();
    }

    #[test]
    fn version_selects_migration() {
        assert_eq!(Migration::LegacyLabels, Migration::for_version(-1));
        assert_eq!(Migration::LegacyLabels, Migration::for_version(0));
        assert_eq!(Migration::LowerCaseKeys, Migration::for_version(1));
        assert_eq!(Migration::UpToDate, Migration::for_version(2));
        assert_eq!(Migration::UpToDate, Migration::for_version(3));
    }

    #[test]
    fn legacy_labels_become_tags() {
        crate::init_test_log();

        let mut store = MemoryPrefs::new();
        add_label(&mut store, 1, "Important", "#FF0000");
        add_label(&mut store, 2, "Personal", "#0000FF");

        let registry =
            TagRegistry::new(store, &config_with_slots(2)).unwrap();
        assert_eq!(
            vec![
                Tag::new("$label1", "Important", "#FF0000", ""),
                Tag::new("$label2", "Personal", "#0000FF", ""),
            ],
            registry.get_all_tags().unwrap()
        );
        assert!(registry.is_valid_key("$label1"));
        assert!(registry.is_valid_key("$label2"));
        assert_eq!(
            CURRENT_VERSION,
            registry.store().get_int("mailnews.tags.version").unwrap()
        );
    }

    #[test]
    fn legacy_labels_incomplete() {
        crate::init_test_log();

        let mut store = MemoryPrefs::new();
        add_label(&mut store, 1, "Important", "#FF0000");
        add_label(&mut store, 2, "Personal", "#0000FF");
        store.insert(
            "mailnews.labels.description.3",
            PrefValue::Localized("Later".to_owned()),
        );

        // Construction survives the failure
        let mut registry =
            TagRegistry::new(store, &config_with_slots(3)).unwrap();
        assert_matches!(
            Err(Error::NotFound),
            registry.store().get_int("mailnews.tags.version")
        );
        // Slots before the missing one were not rolled back
        assert!(registry.is_valid_key("$label2"));
        assert!(!registry.is_valid_key("$label3"));

        assert_matches!(
            Err(Error::MigrationIncomplete(3)),
            registry.migrate()
        );

        let mut store = registry.into_inner();
        store.set_string("mailnews.labels.color.3", "#993399").unwrap();
        let registry =
            TagRegistry::new(store, &config_with_slots(3)).unwrap();
        assert_eq!(
            "#993399",
            registry.get_color_for_key("$label3").unwrap()
        );
        assert_eq!(3, registry.get_all_tags().unwrap().len());
        assert_eq!(
            CURRENT_VERSION,
            registry.store().get_int("mailnews.tags.version").unwrap()
        );
    }

    #[test]
    fn fresh_store_gets_default_labels() {
        crate::init_test_log();

        let registry =
            TagRegistry::new(MemoryPrefs::new(), &TagConfig::default())
                .unwrap();
        assert_eq!(
            CURRENT_VERSION,
            registry.store().get_int("mailnews.tags.version").unwrap()
        );
        assert_eq!(
            vec![
                Tag::new("$label1", "Important", "#FF0000", ""),
                Tag::new("$label2", "Work", "#FF9900", ""),
                Tag::new("$label3", "Personal", "#009900", ""),
                Tag::new("$label4", "To Do", "#3333FF", ""),
                Tag::new("$label5", "Later", "#993399", ""),
            ],
            registry.get_all_tags().unwrap()
        );
    }

    #[test]
    fn stored_labels_override_defaults() {
        let mut store = MemoryPrefs::new();
        add_label(&mut store, 2, "Office", "#123456");
        // Only the description of slot 4 is customised
        store.insert(
            "mailnews.labels.description.4",
            PrefValue::Localized("Someday".to_owned()),
        );

        let registry =
            TagRegistry::new(store, &TagConfig::default()).unwrap();
        assert_eq!("Important", registry.get_tag_for_key("$label1").unwrap());
        assert_eq!("Office", registry.get_tag_for_key("$label2").unwrap());
        assert_eq!("#123456", registry.get_color_for_key("$label2").unwrap());
        assert_eq!("Someday", registry.get_tag_for_key("$label4").unwrap());
        assert_eq!("#3333FF", registry.get_color_for_key("$label4").unwrap());
        assert_eq!(5, registry.get_all_tags().unwrap().len());
    }

    #[test]
    fn slots_beyond_defaults_must_be_stored() {
        let mut config = TagConfig::default();
        config.legacy.slots = 6;

        let mut registry =
            TagRegistry::new(MemoryPrefs::new(), &config).unwrap();
        assert_matches!(
            Err(Error::MigrationIncomplete(6)),
            registry.migrate()
        );
        assert!(registry.is_valid_key("$label5"));

        let mut store = registry.into_inner();
        add_label(&mut store, 6, "Archive", "#777777");
        let registry = TagRegistry::new(store, &config).unwrap();
        assert_eq!(6, registry.get_all_tags().unwrap().len());
        assert_eq!(
            CURRENT_VERSION,
            registry.store().get_int("mailnews.tags.version").unwrap()
        );
    }

    #[test]
    fn plain_string_descriptions_accepted() {
        let mut store = MemoryPrefs::new();
        store
            .set_string("mailnews.labels.description.1", "To Do")
            .unwrap();
        store.set_string("mailnews.labels.color.1", "").unwrap();

        let registry =
            TagRegistry::new(store, &config_with_slots(1)).unwrap();
        assert_eq!(
            vec![Tag::new("$label1", "To Do", "", "")],
            registry.get_all_tags().unwrap()
        );
    }

    #[test]
    fn mixed_case_keys_lowered() {
        crate::init_test_log();

        let mut store = MemoryPrefs::new();
        store.set_int("mailnews.tags.version", 1).unwrap();
        store.set_string("mailnews.tags.Urgent.tag", "Urgent").unwrap();
        store.set_string("mailnews.tags.Urgent.color", "red").unwrap();
        store.set_string("mailnews.tags.Urgent.ordinal", "0").unwrap();
        store.set_string("mailnews.tags.done.tag", "Done").unwrap();
        // Labels are not imported on this path
        add_label(&mut store, 1, "Important", "#FF0000");

        let registry =
            TagRegistry::new(store, &TagConfig::default()).unwrap();
        assert_eq!(
            vec![
                Tag::new("urgent", "Urgent", "red", "0"),
                Tag::new("done", "Done", "", ""),
            ],
            registry.get_all_tags().unwrap()
        );
        assert!(registry.is_valid_key("urgent"));
        assert!(!registry.is_valid_key("Urgent"));
        assert!(registry
            .store()
            .child_names("mailnews.tags.Urgent")
            .unwrap()
            .is_empty());
        assert_eq!(
            CURRENT_VERSION,
            registry.store().get_int("mailnews.tags.version").unwrap()
        );
    }

    #[test]
    fn current_version_untouched() {
        let mut store = MemoryPrefs::new();
        store.set_int("mailnews.tags.version", 2).unwrap();
        store.set_string("mailnews.tags.Urgent.tag", "Urgent").unwrap();
        add_label(&mut store, 1, "Important", "#FF0000");

        let registry =
            TagRegistry::new(store.clone(), &config_with_slots(1)).unwrap();
        // The mixed-case key cannot be read with normal lookups
        assert!(registry.get_all_tags().unwrap().is_empty());
        assert_eq!(store, registry.into_inner());
    }
}
