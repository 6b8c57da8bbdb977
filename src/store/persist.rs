use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Storage key for the persisted completed-scenario id set (JSON array).
pub const COMPLETED_SCENARIOS_KEY: &str = "guide.completed_scenarios";

/// Storage key for the one-time onboarding-seen flag ("true" when set).
pub const ONBOARDING_SEEN_KEY: &str = "guide.onboarding_seen";

/// Durable key-value storage. The engine only ever reads at startup and
/// writes through on completion, so the contract is deliberately tiny.
/// Implementations absorb their own failures: guidance persistence must
/// never take the application down.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store with shared contents: clones see each other's writes,
/// so a test can keep a handle while the session store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Write-through JSON file store. A missing or malformed file reads as
/// empty; write failures are warned about and dropped.
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: &str) -> FileStore {
        let path = PathBuf::from(path);

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(e) => {
                    eprintln!(
                        "Warning: state file '{}' is malformed, starting empty: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        FileStore { path, entries }
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize state file: {}", e);
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, json) {
            eprintln!(
                "Warning: failed to write state file '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }
}
