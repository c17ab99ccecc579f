// src/memory/store_server.rs — Async message passing for Store

use crate::memory::store::{ContactMessageRow, LearningProgressRow, Store, TaughtContentRow};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum StoreCommand {
    InsertLearningProgress {
        topic: String,
        level: String,
        learning_style: String,
        mode: String,
        resp: oneshot::Sender<anyhow::Result<i64>>,
    },
    QueryLearningProgress {
        resp: oneshot::Sender<anyhow::Result<Vec<LearningProgressRow>>>,
    },
    InsertTaughtContent {
        topic: String,
        content: String,
        difficulty: String,
        examples: Vec<String>,
        mode: String,
        resp: oneshot::Sender<anyhow::Result<i64>>,
    },
    QueryTaughtContent {
        topic: Option<String>,
        resp: oneshot::Sender<anyhow::Result<Vec<TaughtContentRow>>>,
    },
    InsertContactMessage {
        name: String,
        email: String,
        subject: String,
        message: String,
        resp: oneshot::Sender<anyhow::Result<i64>>,
    },
    QueryContactMessages {
        unread_only: bool,
        resp: oneshot::Sender<anyhow::Result<Vec<ContactMessageRow>>>,
    },
    MarkContactRead {
        id: i64,
        resp: oneshot::Sender<anyhow::Result<bool>>,
    },
}

/// A handle to the Store that uses message passing.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    pub fn new(tx: mpsc::Sender<StoreCommand>) -> Self {
        Self { tx }
    }

    pub async fn insert_learning_progress(
        &self,
        topic: String,
        level: String,
        learning_style: String,
        mode: String,
    ) -> anyhow::Result<i64> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertLearningProgress {
                topic,
                level,
                learning_style,
                mode,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn query_learning_progress(&self) -> anyhow::Result<Vec<LearningProgressRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::QueryLearningProgress { resp: resp_tx })
            .await?;
        resp_rx.await?
    }

    pub async fn insert_taught_content(
        &self,
        topic: String,
        content: String,
        difficulty: String,
        examples: Vec<String>,
        mode: String,
    ) -> anyhow::Result<i64> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertTaughtContent {
                topic,
                content,
                difficulty,
                examples,
                mode,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn query_taught_content(
        &self,
        topic: Option<String>,
    ) -> anyhow::Result<Vec<TaughtContentRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::QueryTaughtContent { topic, resp: resp_tx })
            .await?;
        resp_rx.await?
    }

    pub async fn insert_contact_message(
        &self,
        name: String,
        email: String,
        subject: String,
        message: String,
    ) -> anyhow::Result<i64> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::InsertContactMessage {
                name,
                email,
                subject,
                message,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn query_contact_messages(
        &self,
        unread_only: bool,
    ) -> anyhow::Result<Vec<ContactMessageRow>> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::QueryContactMessages {
                unread_only,
                resp: resp_tx,
            })
            .await?;
        resp_rx.await?
    }

    pub async fn mark_contact_read(&self, id: i64) -> anyhow::Result<bool> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::MarkContactRead { id, resp: resp_tx })
            .await?;
        resp_rx.await?
    }
}

/// Helper to spawn the store server and return a handle.
pub fn spawn_store_server(store: Store) -> (StoreHandle, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(100);
    let handle = StoreHandle::new(tx);
    let join_handle = tokio::spawn(run_store_server(store, rx));
    (handle, join_handle)
}

/// Owns the connection; runs until every handle is dropped.
pub async fn run_store_server(store: Store, mut rx: mpsc::Receiver<StoreCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            StoreCommand::InsertLearningProgress {
                topic,
                level,
                learning_style,
                mode,
                resp,
            } => {
                let res = store.insert_learning_progress(&topic, &level, &learning_style, &mode);
                let _ = resp.send(res);
            }
            StoreCommand::QueryLearningProgress { resp } => {
                let _ = resp.send(store.query_learning_progress());
            }
            StoreCommand::InsertTaughtContent {
                topic,
                content,
                difficulty,
                examples,
                mode,
                resp,
            } => {
                let res =
                    store.insert_taught_content(&topic, &content, &difficulty, &examples, &mode);
                let _ = resp.send(res);
            }
            StoreCommand::QueryTaughtContent { topic, resp } => {
                let _ = resp.send(store.query_taught_content(topic.as_deref()));
            }
            StoreCommand::InsertContactMessage {
                name,
                email,
                subject,
                message,
                resp,
            } => {
                let res = store.insert_contact_message(&name, &email, &subject, &message);
                let _ = resp.send(res);
            }
            StoreCommand::QueryContactMessages { unread_only, resp } => {
                let _ = resp.send(store.query_contact_messages(unread_only));
            }
            StoreCommand::MarkContactRead { id, resp } => {
                let _ = resp.send(store.mark_contact_read(id));
            }
        }
    }
    tracing::debug!("Store server stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::schema;
    use rusqlite::Connection;

    fn spawn() -> StoreHandle {
        let conn = Connection::open_in_memory().unwrap();
        schema::run_migrations(&conn).unwrap();
        spawn_store_server(Store::new(conn)).0
    }

    #[tokio::test]
    async fn test_handle_round_trip() {
        let handle = spawn();
        let id = handle
            .insert_learning_progress(
                "Rust".into(),
                "beginner".into(),
                "visual".into(),
                "static".into(),
            )
            .await
            .unwrap();
        assert_eq!(id, 1);

        let rows = handle.query_learning_progress().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].learning_style, "visual");
    }

    #[tokio::test]
    async fn test_clones_share_one_connection() {
        let handle = spawn();
        let other = handle.clone();
        handle
            .insert_contact_message("A".into(), "a@b.co".into(), "Hi".into(), "Hello".into())
            .await
            .unwrap();
        let rows = other.query_contact_messages(true).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(other.mark_contact_read(rows[0].id).await.unwrap());
        assert!(handle.query_contact_messages(true).await.unwrap().is_empty());
    }
}
