use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, error};

use super::registry::DEFAULT_ROOM;

/// Durable store mapping a room id to a single text file.
///
/// Room content lives in one flat file per room under the editor
/// directory. The store never deletes files; an empty room whose registry
/// entry is torn down keeps its persisted content.
#[derive(Clone)]
pub struct RoomStore {
    dir: PathBuf,
}

impl RoomStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Map a room id to its file name.
    ///
    /// Room ids are sanitized before filesystem use rather than trusted
    /// from upstream routing: only ASCII alphanumerics, `-` and `_`
    /// survive. An id that sanitizes to nothing maps to `_`.
    fn file_name(room_id: &str) -> String {
        if room_id.is_empty() || room_id == DEFAULT_ROOM {
            return format!("{DEFAULT_ROOM}.txt");
        }
        let sanitized: String = room_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if sanitized.is_empty() {
            return "_.txt".to_string();
        }
        format!("{sanitized}.txt")
    }

    fn path_for(&self, room_id: &str) -> PathBuf {
        self.dir.join(Self::file_name(room_id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load previously saved content, or `None` if the room was never
    /// saved. Read errors other than not-found are logged and treated as
    /// absent content.
    pub async fn load(&self, room_id: &str) -> Option<String> {
        let path = self.path_for(room_id);
        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("Loaded room content from {}", path.display());
                Some(content)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                error!("Failed to load room content from {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Overwrite the persisted blob for a room.
    pub async fn save(&self, room_id: &str, content: &str) -> io::Result<()> {
        let path = self.path_for(room_id);
        fs::write(&path, content).await?;
        debug!("Auto-saved room content to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (RoomStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (RoomStore::new(dir.path()), dir)
    }

    #[test]
    fn default_room_maps_to_reserved_file_name() {
        assert_eq!(RoomStore::file_name("default"), "default.txt");
        assert_eq!(RoomStore::file_name(""), "default.txt");
    }

    #[test]
    fn room_ids_are_sanitized_for_filesystem_use() {
        assert_eq!(RoomStore::file_name("42"), "42.txt");
        assert_eq!(RoomStore::file_name("my-room_1"), "my-room_1.txt");
        assert_eq!(RoomStore::file_name("../../etc/passwd"), "etcpasswd.txt");
        assert_eq!(RoomStore::file_name("../.."), "_.txt");
    }

    #[tokio::test]
    async fn load_of_never_saved_room_is_none() {
        let (store, _dir) = test_store();
        assert_eq!(store.load("7").await, None);
    }

    #[tokio::test]
    async fn save_then_load_returns_content() {
        let (store, _dir) = test_store();
        store.save("7", "hello world").await.unwrap();
        assert_eq!(store.load("7").await.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn save_overwrites_previous_content() {
        let (store, _dir) = test_store();
        store.save("7", "first").await.unwrap();
        store.save("7", "second").await.unwrap();
        assert_eq!(store.load("7").await.as_deref(), Some("second"));
    }
}
