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

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{MemoryPrefs, PrefStore, PrefValue};
use crate::support::{error::Error, file_ops};

/// On-disk layout of a preference file.
///
/// ```toml
/// [prefs]
/// "mailnews.tags.version" = 2
/// "mailnews.tags.work.tag" = "Work"
///
/// [localized]
/// "mailnews.labels.description.1" = "Important"
/// ```
#[derive(Serialize, Deserialize, Default)]
struct PrefsFile {
    #[serde(default)]
    prefs: BTreeMap<String, FileValue>,
    #[serde(default)]
    localized: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FileValue {
    Int(i32),
    String(String),
}

/// A preference store persisted as a TOML file.
///
/// The whole file is loaded on open. Every mutation rewrites the file
/// atomically before returning, so a crash never leaves a torn file, though
/// a multi-step operation may be cut off between steps.
#[derive(Debug)]
pub struct TomlPrefs {
    path: PathBuf,
    values: MemoryPrefs,
}

impl TomlPrefs {
    /// Open the preference file at `path`.
    ///
    /// A file that does not exist yet is an empty store; it is created by the
    /// first mutation. A file that cannot be read or parsed makes the store
    /// unavailable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if io::ErrorKind::NotFound == e.kind() => String::new(),
            Err(e) => {
                return Err(Error::StoreUnavailable {
                    path,
                    source: Box::new(e),
                })
            }
        };

        let file: PrefsFile = match toml::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                return Err(Error::StoreUnavailable {
                    path,
                    source: Box::new(e),
                })
            }
        };

        let values = file
            .prefs
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    FileValue::Int(i) => PrefValue::Int(i),
                    FileValue::String(s) => PrefValue::String(s),
                };
                (name, value)
            })
            .chain(
                file.localized
                    .into_iter()
                    .map(|(name, s)| (name, PrefValue::Localized(s))),
            )
            .collect::<MemoryPrefs>();

        debug!("Loaded {} preferences from {}", values.len(), path.display());
        Ok(Self { path, values })
    }

    /// The current contents of the store.
    pub fn values(&self) -> &MemoryPrefs {
        &self.values
    }

    /// Apply `f` to a copy of the contents and write the copy out. The
    /// in-memory contents change only once the file has been replaced.
    fn mutate(
        &mut self,
        f: impl FnOnce(&mut MemoryPrefs) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut values = self.values.clone();
        f(&mut values)?;
        self.save(&values)?;
        self.values = values;
        Ok(())
    }

    fn save(&self, values: &MemoryPrefs) -> Result<(), Error> {
        let mut file = PrefsFile::default();
        for (name, value) in values.iter() {
            match *value {
                PrefValue::Int(i) => {
                    file.prefs.insert(name.to_owned(), FileValue::Int(i));
                }
                PrefValue::String(ref s) => {
                    file.prefs
                        .insert(name.to_owned(), FileValue::String(s.clone()));
                }
                PrefValue::Localized(ref s) => {
                    file.localized.insert(name.to_owned(), s.clone());
                }
            }
        }

        let text = toml::to_string(&file)?;
        file_ops::spit(&self.path, text.as_bytes())?;
        Ok(())
    }
}

impl PrefStore for TomlPrefs {
    fn get_string(&self, name: &str) -> Result<String, Error> {
        self.values.get_string(name)
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.mutate(|values| values.set_string(name, value))
    }

    fn get_localized_string(&self, name: &str) -> Result<String, Error> {
        self.values.get_localized_string(name)
    }

    fn get_int(&self, name: &str) -> Result<i32, Error> {
        self.values.get_int(name)
    }

    fn set_int(&mut self, name: &str, value: i32) -> Result<(), Error> {
        self.mutate(|values| values.set_int(name, value))
    }

    fn clear_pref(&mut self, name: &str) -> Result<(), Error> {
        if self.values.get(name).is_none() {
            return Ok(());
        }

        self.mutate(|values| values.clear_pref(name))
    }

    fn child_names(&self, prefix: &str) -> Result<Vec<String>, Error> {
        self.values.child_names(prefix)
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("prefs.toml");

        let prefs = TomlPrefs::open(&path).unwrap();
        assert!(prefs.values().is_empty());
        // Opening does not create the file
        assert!(!path.exists());
    }

    #[test]
    fn mutations_persist() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("prefs.toml");

        let mut prefs = TomlPrefs::open(&path).unwrap();
        prefs.set_string("mailnews.tags.work.tag", "Work").unwrap();
        prefs.set_string("mailnews.tags.work.color", "#FF0000").unwrap();
        prefs.set_int("mailnews.tags.version", 2).unwrap();
        prefs.clear_pref("mailnews.tags.work.color").unwrap();

        let reopened = TomlPrefs::open(&path).unwrap();
        assert_eq!(
            "Work",
            reopened.get_string("mailnews.tags.work.tag").unwrap()
        );
        assert_eq!(2, reopened.get_int("mailnews.tags.version").unwrap());
        assert_matches!(
            Err(Error::NotFound),
            reopened.get_string("mailnews.tags.work.color")
        );
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let tmpdir = TempDir::new().unwrap();
        let dir = tmpdir.path().join("profile");
        fs::create_dir(&dir).unwrap();
        let path = dir.join("prefs.toml");

        let mut prefs = TomlPrefs::open(&path).unwrap();
        prefs.set_string("mailnews.tags.work.tag", "Work").unwrap();

        fs::remove_dir_all(&dir).unwrap();
        assert_matches!(
            Err(Error::Io(_)),
            prefs.set_string("mailnews.tags.work.tag", "Office")
        );
        assert_matches!(
            Err(Error::Io(_)),
            prefs.set_int("mailnews.tags.version", 2)
        );
        assert_matches!(
            Err(Error::Io(_)),
            prefs.clear_pref("mailnews.tags.work.tag")
        );

        assert_eq!(
            "Work",
            prefs.get_string("mailnews.tags.work.tag").unwrap()
        );
        assert_matches!(
            Err(Error::NotFound),
            prefs.get_int("mailnews.tags.version")
        );
    }

    #[test]
    fn localized_table() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("prefs.toml");
        fs::write(
            &path,
            r##"
[prefs]
"mailnews.labels.color.1" = "#FF0000"

[localized]
"mailnews.labels.description.1" = "Important"
"##,
        )
        .unwrap();

        let mut prefs = TomlPrefs::open(&path).unwrap();
        assert_eq!(
            "Important",
            prefs
                .get_localized_string("mailnews.labels.description.1")
                .unwrap()
        );
        assert_matches!(
            Err(Error::WrongType),
            prefs.get_string("mailnews.labels.description.1")
        );

        // Localized values survive an unrelated rewrite
        prefs.set_int("mailnews.tags.version", 0).unwrap();
        let reopened = TomlPrefs::open(&path).unwrap();
        assert_eq!(
            Some(&PrefValue::Localized("Important".to_owned())),
            reopened.values().get("mailnews.labels.description.1")
        );
    }

    #[test]
    fn garbage_file_is_unavailable() {
        let tmpdir = TempDir::new().unwrap();
        let path = tmpdir.path().join("prefs.toml");
        fs::write(&path, "this is [not toml").unwrap();

        assert_matches!(
            Err(Error::StoreUnavailable { .. }),
            TomlPrefs::open(&path)
        );
    }
}
