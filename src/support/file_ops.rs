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

//! Miscellaneous functions for working with files.

use std::io::{self, Write};
use std::path::Path;

/// Write `data` into the file at `path`, atomically, replacing whatever was
/// there.
///
/// The file is first staged in the same directory as `path` so that the
/// final rename never crosses a file system boundary.
pub fn spit(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tf = tempfile::NamedTempFile::new_in(dir)?;
    tf.as_file_mut().write_all(data)?;
    tf.as_file_mut().sync_all()?;
    tf.persist(path)?;
    Ok(())
}
