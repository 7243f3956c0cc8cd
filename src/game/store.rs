use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::warn;

/// Local key-value persistence used for the leaderboard.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// In-process store. Clones share their contents, so a test can keep a handle on what
/// the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Self {
        if !data_dir.exists() {
            if let Err(err) = fs::create_dir_all(data_dir) {
                warn!(target: "leaderboard", "Could not create {}: {}", data_dir.display(), err);
            }
        }
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.data_dir.join(format!("{}.json", file_stem))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.path_for(key), value)
    }
}
