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
use std::iter::FromIterator;
use std::ops::Bound;

use super::{PrefStore, PrefValue};
use crate::support::error::Error;

/// A preference store held entirely in memory.
///
/// Preferences enumerate in byte-wise order of their full names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryPrefs {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directly set a preference to an arbitrary value.
    ///
    /// Unlike `set_string()`, this can store localized strings and empty
    /// strings.
    pub fn insert(&mut self, name: impl Into<String>, value: PrefValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PrefValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrefValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PrefValue)> for MemoryPrefs {
    fn from_iter<I: IntoIterator<Item = (K, PrefValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl PrefStore for MemoryPrefs {
    fn get_string(&self, name: &str) -> Result<String, Error> {
        match self.values.get(name) {
            Some(&PrefValue::String(ref s)) => Ok(s.clone()),
            Some(_) => Err(Error::WrongType),
            None => Err(Error::NotFound),
        }
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.values
            .insert(name.to_owned(), PrefValue::String(value.to_owned()));
        Ok(())
    }

    fn get_localized_string(&self, name: &str) -> Result<String, Error> {
        match self.values.get(name) {
            Some(&PrefValue::Localized(ref s))
            | Some(&PrefValue::String(ref s)) => Ok(s.clone()),
            Some(&PrefValue::Int(_)) => Err(Error::WrongType),
            None => Err(Error::NotFound),
        }
    }

    fn get_int(&self, name: &str) -> Result<i32, Error> {
        match self.values.get(name) {
            Some(&PrefValue::Int(i)) => Ok(i),
            Some(_) => Err(Error::WrongType),
            None => Err(Error::NotFound),
        }
    }

    fn set_int(&mut self, name: &str, value: i32) -> Result<(), Error> {
        self.values.insert(name.to_owned(), PrefValue::Int(value));
        Ok(())
    }

    fn clear_pref(&mut self, name: &str) -> Result<(), Error> {
        self.values.remove(name);
        Ok(())
    }

    fn child_names(&self, prefix: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .values
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
