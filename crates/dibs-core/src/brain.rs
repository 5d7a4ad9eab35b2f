use std::{collections::BTreeMap, path::PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{ports::Brain, Result};

/// In-memory brain. The default for tests and for hosts that bring their
/// own persistence.
#[derive(Default)]
pub struct MemoryBrain {
    records: Mutex<BTreeMap<String, Value>>,
}

#[async_trait]
impl Brain for MemoryBrain {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.records.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    saved_at: String,
    records: BTreeMap<String, Value>,
}

/// File-backed brain: loads a JSON snapshot on open and rewrites it on
/// every `set`.
///
/// The rewrite happens inside the command's read-modify-write cycle, so the
/// snapshot never captures half of a transition.
pub struct FileBrain {
    path: PathBuf,
    records: Mutex<BTreeMap<String, Value>>,
}

impl FileBrain {
    pub fn open(path: PathBuf) -> Result<Self> {
        let records = match std::fs::read_to_string(&path) {
            Ok(txt) => serde_json::from_str::<Snapshot>(&txt)?.records,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn persist(&self, records: &BTreeMap<String, Value>) -> Result<()> {
        let snapshot = Snapshot {
            saved_at: chrono::Utc::now().to_rfc3339(),
            records: records.clone(),
        };
        let txt = serde_json::to_string(&snapshot)?;
        std::fs::write(&self.path, txt)?;
        Ok(())
    }
}

#[async_trait]
impl Brain for FileBrain {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(key.to_string(), value);
        self.persist(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_brain_round_trips() {
        let brain = MemoryBrain::default();
        assert_eq!(brain.get("uatOwners").await.unwrap(), None);

        brain
            .set("uatOwners", json!({"zelda": "TestUser"}))
            .await
            .unwrap();
        assert_eq!(
            brain.get("uatOwners").await.unwrap(),
            Some(json!({"zelda": "TestUser"}))
        );
    }

    #[tokio::test]
    async fn file_brain_survives_reopen() {
        let path = PathBuf::from(format!("/tmp/dibs-brain-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let brain = FileBrain::open(path.clone()).unwrap();
            brain
                .set("deployQueue", json!({"alpaca": {"waiting": ["A"]}}))
                .await
                .unwrap();
        }

        let reopened = FileBrain::open(path.clone()).unwrap();
        assert_eq!(
            reopened.get("deployQueue").await.unwrap(),
            Some(json!({"alpaca": {"waiting": ["A"]}}))
        );

        let _ = std::fs::remove_file(&path);
    }
}
