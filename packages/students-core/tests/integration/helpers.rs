//! Shared fixtures for integration tests.

use std::sync::Arc;

use students_core::{MemoryStorage, SqliteStorage, Storage};

/// One storage engine under test, labelled for assertion messages.
pub struct Engine {
    pub name: &'static str,
    pub storage: Arc<dyn Storage>,
}

/// Fresh, empty instances of every storage engine.
pub async fn engines() -> Vec<Engine> {
    vec![
        Engine {
            name: "memory",
            storage: Arc::new(MemoryStorage::new()),
        },
        Engine {
            name: "sqlite",
            storage: Arc::new(SqliteStorage::in_memory().await.unwrap()),
        },
    ]
}

/// Inserts Ann and returns her id.
pub async fn create_ann(storage: &dyn Storage) -> i64 {
    storage
        .create_student("Ann", "ann@x.com", 20)
        .await
        .unwrap()
}
