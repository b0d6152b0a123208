//! Settings reader - the three independent reads behind the screen

use std::sync::Arc;

use crate::backend::SettingsBackend;
use crate::error::{error_message, Result};
use crate::service::UiMessage;

/// One of the reads the screen depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    ServerSettings,
    MetadataSettings,
    Categories,
}

impl Query {
    /// Fixed order used when picking which error to show
    pub const ALL: [Query; 3] = [
        Query::ServerSettings,
        Query::MetadataSettings,
        Query::Categories,
    ];
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::ServerSettings => write!(f, "ServerSettings"),
            Query::MetadataSettings => write!(f, "MetadataServerSettings"),
            Query::Categories => write!(f, "Categories"),
        }
    }
}

/// Issues reads and posts their outcome to the UI
#[derive(Clone)]
pub struct SettingsReader {
    backend: Arc<dyn SettingsBackend>,
    ui_sender: async_channel::Sender<UiMessage>,
}

impl SettingsReader {
    pub fn new(
        backend: Arc<dyn SettingsBackend>,
        ui_sender: async_channel::Sender<UiMessage>,
    ) -> Self {
        Self { backend, ui_sender }
    }

    /// Run all three reads concurrently
    pub async fn load_all(&self) {
        let (server, metadata, categories) = tokio::join!(
            self.fetch(Query::ServerSettings),
            self.fetch(Query::MetadataSettings),
            self.fetch(Query::Categories),
        );

        for (query, result) in Query::ALL.into_iter().zip([server, metadata, categories]) {
            if let Err(e) = result {
                log::warn!("Initial {} read failed: {}", query, e);
            }
        }
    }

    /// Re-issue a single read. Failures only reach the log here; the UI sees
    /// them through the posted result.
    pub async fn refetch(&self, query: Query) {
        if let Err(e) = self.fetch(query).await {
            log::error!("DownloadSettings::refetch{}: {}", query, e);
        }
    }

    /// Re-read in the background after a write. The loaded value stays on
    /// screen while this runs and a failure only reaches the log.
    pub async fn refresh(&self, query: Query) {
        log::debug!("Refreshing {}", query);
        match self.read(query).await {
            Ok(msg) => {
                let _ = self.ui_sender.send(msg).await;
            }
            Err(e) => log::error!("DownloadSettings::refetch{}: {}", query, e),
        }
    }

    /// Run one read and post its result
    pub async fn fetch(&self, query: Query) -> Result<()> {
        log::debug!("Fetching {}", query);
        self.ui_sender.send(UiMessage::QueryStarted(query)).await?;

        match self.read(query).await {
            Ok(msg) => {
                self.ui_sender.send(msg).await?;
                Ok(())
            }
            Err(e) => {
                self.ui_sender
                    .send(failed(query, error_message(&e)))
                    .await?;
                Err(e)
            }
        }
    }

    async fn read(&self, query: Query) -> Result<UiMessage> {
        Ok(match query {
            Query::ServerSettings => {
                UiMessage::ServerSettingsLoaded(Ok(self.backend.server_settings().await?))
            }
            Query::MetadataSettings => {
                UiMessage::MetadataSettingsLoaded(Ok(self.backend.metadata_settings().await?))
            }
            Query::Categories => UiMessage::CategoriesLoaded(Ok(self.backend.categories().await?)),
        })
    }
}

fn failed(query: Query, message: String) -> UiMessage {
    match query {
        Query::ServerSettings => UiMessage::ServerSettingsLoaded(Err(message)),
        Query::MetadataSettings => UiMessage::MetadataSettingsLoaded(Err(message)),
        Query::Categories => UiMessage::CategoriesLoaded(Err(message)),
    }
}
