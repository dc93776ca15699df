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

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// The configuration of a tag registry.
///
/// This is normally read from a TOML file. Every field has a default matching
/// the layout mail clients have historically used, so an empty file (or no
/// file at all) is a valid configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagConfig {
    /// The preference namespace under which `<key>.tag`, `<key>.color`,
    /// `<key>.ordinal` and `version` live. Includes the trailing `.`.
    pub branch: String,

    /// Where to find the fixed-slot labels which preceded keyed tags.
    pub legacy: LegacyLabelConfig,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            branch: "mailnews.tags.".to_owned(),
            legacy: LegacyLabelConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LegacyLabelConfig {
    /// Prefix of the localized label descriptions. The slot number, starting
    /// at 1, is appended.
    pub description_prefix: String,
    /// Prefix of the plain label colours, numbered like the descriptions.
    pub color_prefix: String,
    /// The number of slots to migrate.
    pub slots: usize,
    /// The labels a slot falls back to when the store has no description or
    /// colour for it, indexed from slot 1. A slot with neither a stored entry
    /// nor a default stops the migration.
    pub defaults: Vec<LegacyLabel>,
}

/// The built-in text and colour of one legacy label slot.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LegacyLabel {
    pub text: String,
    pub color: String,
}

impl LegacyLabel {
    fn new(text: &str, color: &str) -> Self {
        Self {
            text: text.to_owned(),
            color: color.to_owned(),
        }
    }
}

impl Default for LegacyLabelConfig {
    fn default() -> Self {
        Self {
            description_prefix: "mailnews.labels.description.".to_owned(),
            color_prefix: "mailnews.labels.color.".to_owned(),
            slots: 5,
            defaults: vec![
                LegacyLabel::new("Important", "#FF0000"),
                LegacyLabel::new("Work", "#FF9900"),
                LegacyLabel::new("Personal", "#009900"),
                LegacyLabel::new("To Do", "#3333FF"),
                LegacyLabel::new("Later", "#993399"),
            ],
        }
    }
}

impl TagConfig {
    /// Load the configuration from the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
