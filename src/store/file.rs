// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! JSON-file card store.
//!
//! Cards live in a single JSON array at `<data_dir>/cards.json`,
//! rewritten wholesale on every write. Writes are serialized through a
//! mutex so concurrent accepts neither lose nor duplicate cards.

use crate::error::Result;
use crate::models::Card;
use crate::store::CardStore;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join("cards.json"),
            write_lock: Mutex::new(()),
        }
    }

    async fn ensure_data_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&self.path).await? {
            fs::write(&self.path, b"[]").await?;
        }
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Card>> {
        self.ensure_data_file().await?;
        let raw = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl CardStore for JsonFileStore {
    async fn add_card(&self, card: Card) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut cards = self.load().await?;
        cards.push(card);
        let raw = serde_json::to_vec_pretty(&cards)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        let mut cards = self.load().await?;
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn card(message: &str, secs: i64) -> Card {
        Card {
            id: Uuid::new_v4(),
            from_name: "alice".to_string(),
            to_name: "bob".to_string(),
            message: message.to_string(),
            anonymous: false,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn roundtrips_and_orders_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.add_card(card("first", 0)).await.unwrap();
        store.add_card(card("second", 10)).await.unwrap();

        let cards = store.list_cards().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].message, "second");
        assert_eq!(cards[1].message, "first");
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.list_cards().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cards_survive_a_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::new(dir.path());
            store.add_card(card("durable", 0)).await.unwrap();
        }
        let reopened = JsonFileStore::new(dir.path());
        let cards = reopened.list_cards().await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].message, "durable");
    }

    #[tokio::test]
    async fn concurrent_writes_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_card(card(&format!("card {i}"), i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list_cards().await.unwrap().len(), 8);
    }
}
