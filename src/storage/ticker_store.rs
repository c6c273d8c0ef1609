use crate::model::StoreError;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Remembers the last ticker the user analysed.
pub trait TickerStore: Send + Sync {
    fn load_last_ticker(&self) -> Option<String>;
    fn save_last_ticker(&self, ticker: &str) -> Result<(), StoreError>;
}

/// Keeps the ticker as a single line of text in a local file.
pub struct FileTickerStore {
    path: PathBuf,
}

impl FileTickerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TickerStore for FileTickerStore {
    /// A missing, unreadable or blank file all mean "nothing remembered".
    fn load_last_ticker(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let ticker = content.lines().next().unwrap_or("").trim().to_string();
                (!ticker.is_empty()).then_some(ticker)
            }
            Err(e) => {
                debug!("No last ticker at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save_last_ticker(&self, ticker: &str) -> Result<(), StoreError> {
        fs::write(&self.path, ticker.trim())?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryTickerStore {
        last: Mutex<Option<String>>,
    }

    impl MemoryTickerStore {
        pub fn with(ticker: &str) -> Self {
            Self {
                last: Mutex::new(Some(ticker.to_string())),
            }
        }
    }

    impl TickerStore for MemoryTickerStore {
        fn load_last_ticker(&self) -> Option<String> {
            self.last.lock().unwrap().clone()
        }

        fn save_last_ticker(&self, ticker: &str) -> Result<(), StoreError> {
            *self.last.lock().unwrap() = Some(ticker.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_no_ticker() {
        let dir = TempDir::new().unwrap();
        let store = FileTickerStore::new(dir.path().join("last_ticker.txt"));
        assert_eq!(store.load_last_ticker(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileTickerStore::new(dir.path().join("last_ticker.txt"));
        store.save_last_ticker("TSLA").unwrap();
        assert_eq!(store.load_last_ticker(), Some("TSLA".into()));
        store.save_last_ticker("NVDA").unwrap();
        assert_eq!(store.load_last_ticker(), Some("NVDA".into()));
    }

    #[test]
    fn blank_file_means_no_ticker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_ticker.txt");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTickerStore::new(path).load_last_ticker(), None);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = FileTickerStore::new(dir.path().join("nope").join("last_ticker.txt"));
        assert!(store.save_last_ticker("AAPL").is_err());
    }
}
