// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

/// Keep only `[A-Za-z0-9.-]`; everything else becomes `_` (spec §4.1).
fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Maps a resource name to its on-disk path: split at the last `/`,
/// sanitize both halves, join under `cache_path` (spec §4.1).
pub fn disk_path(cache_path: &Path, name: &str) -> PathBuf {
    match name.rfind('/') {
        Some(i) => cache_path
            .join(sanitize(&name[..i]))
            .join(sanitize(&name[i + 1..])),
        None => cache_path.join(sanitize(name)),
    }
}

/// The disk-backed tier of the cache: binary-opaque blobs keyed by
/// sanitized path, plus the `failedAvailTestUrls.txt` sidecar.
pub struct DiskCache {
    root: PathBuf,
    failed_avail_path: PathBuf,
    /// In-memory mirror of the sidecar, loaded once at startup and
    /// appended to as tests fail; double-buffered the same way the touch
    /// set is (spec §4.1's "cross-worker invariants").
    failed_avail: Mutex<HashSet<String>>,
}

impl DiskCache {
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let failed_avail_path = root.join("failedAvailTestUrls.txt");
        let failed_avail = if failed_avail_path.exists() {
            fs::read_to_string(&failed_avail_path)?
                .lines()
                .map(|l| l.to_owned())
                .collect()
        } else {
            HashSet::new()
        };
        Ok(Self {
            root,
            failed_avail_path,
            failed_avail: Mutex::new(failed_avail),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read(&self, name: &str) -> Option<Vec<u8>> {
        fs::read(disk_path(&self.root, name)).ok()
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let path = disk_path(&self.root, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn has_failed_availability(&self, name: &str) -> bool {
        self.failed_avail.lock().contains(name)
    }

    /// Record `name` as failed, persisting the updated sidecar file.
    pub fn mark_failed_availability(&self, name: &str) -> anyhow::Result<()> {
        let mut set = self.failed_avail.lock();
        if !set.insert(name.to_owned()) {
            return Ok(());
        }
        let mut contents = set.iter().cloned().collect::<Vec<_>>();
        contents.sort();
        fs::write(&self.failed_avail_path, contents.join("\n") + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize("a b?c"), "a_b_c");
        assert_eq!(sanitize("tile-4.2.bin"), "tile-4.2.bin");
    }

    #[test]
    fn test_disk_path_splits_at_last_slash() {
        let path = disk_path(Path::new("/cache"), "https://host/a/b/tile?x=1.bin");
        assert_eq!(
            path,
            Path::new("/cache/https___host_a_b/tile_x_1.bin")
        );
    }

    #[test]
    fn test_disk_path_with_no_slash() {
        let path = disk_path(Path::new("/cache"), "token:abc");
        assert_eq!(path, Path::new("/cache/token_abc"));
    }

    #[test]
    fn test_failed_avail_round_trips_through_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        {
            let cache = DiskCache::open(dir.path())?;
            cache.mark_failed_availability("https://host/bad.bin")?;
        }
        let reopened = DiskCache::open(dir.path())?;
        assert!(reopened.has_failed_availability("https://host/bad.bin"));
        Ok(())
    }
}
