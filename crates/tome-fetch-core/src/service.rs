//! Settings service - bridges tokio async runtime with UI main loop

use std::sync::Arc;

use crate::backend::SettingsBackend;
use crate::metadata::MetadataSettingUpdate;
use crate::reader::{Query, SettingsReader};
use crate::types::{Category, IncludeOrExclude, MetadataDownloadSettings, ServerSettings};
use crate::writer::{ServerSettingUpdate, SettingsWriter};

/// Commands sent from UI to the service (via async channel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Issue all three reads concurrently
    LoadAll,
    /// Re-issue one read
    Refetch(Query),
    /// Persist one server setting
    UpdateServerSetting(ServerSettingUpdate),
    /// Persist one metadata setting
    UpdateMetadataSetting(MetadataSettingUpdate),
    /// Change whether categories take part in auto-download
    UpdateCategoryInclusion {
        ids: Vec<i32>,
        include: IncludeOrExclude,
    },
    /// Shutdown the service
    Shutdown,
}

/// Messages sent from the service to UI (via channel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMessage {
    /// Service runtime is up
    ServiceReady,
    /// A read was issued and is in flight
    QueryStarted(Query),
    ServerSettingsLoaded(Result<ServerSettings, String>),
    MetadataSettingsLoaded(Result<MetadataDownloadSettings, String>),
    CategoriesLoaded(Result<Vec<Category>, String>),
    /// A write was rejected
    SaveFailed { title: String, detail: String },
}

/// Settings service that runs in a separate thread with tokio
pub struct SettingsService {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsService {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    /// Spawn the service in a background thread
    /// Takes the command receiver to process commands from the UI
    pub fn spawn(
        self,
        ui_sender: async_channel::Sender<UiMessage>,
        cmd_receiver: async_channel::Receiver<SettingsCommand>,
    ) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(self.run(ui_sender, cmd_receiver));
        })
    }

    /// Command loop; returns on `Shutdown` or when the UI side hangs up
    pub async fn run(
        self,
        ui_sender: async_channel::Sender<UiMessage>,
        cmd_receiver: async_channel::Receiver<SettingsCommand>,
    ) {
        let reader = SettingsReader::new(self.backend.clone(), ui_sender.clone());
        let writer = SettingsWriter::new(self.backend, reader.clone(), ui_sender.clone());

        log::info!("Settings service started");

        // Notify UI that the service is ready
        let _ = ui_sender.send(UiMessage::ServiceReady).await;

        loop {
            match cmd_receiver.recv().await {
                Ok(SettingsCommand::Shutdown) => {
                    log::info!("Settings service shutting down");
                    break;
                }
                Ok(cmd) => handle_command(&reader, &writer, cmd),
                Err(_) => {
                    log::warn!("Command channel closed");
                    break;
                }
            }
        }
    }
}

/// Handle a command from the UI. Every command runs as its own task so a
/// slow request never holds up the next edit.
fn handle_command(reader: &SettingsReader, writer: &SettingsWriter, cmd: SettingsCommand) {
    match cmd {
        SettingsCommand::LoadAll => {
            let reader = reader.clone();
            tokio::spawn(async move { reader.load_all().await });
        }

        SettingsCommand::Refetch(query) => {
            let reader = reader.clone();
            tokio::spawn(async move { reader.refetch(query).await });
        }

        SettingsCommand::UpdateServerSetting(update) => {
            writer.update_setting(update);
        }

        SettingsCommand::UpdateMetadataSetting(update) => {
            writer.update_metadata_setting(update);
        }

        SettingsCommand::UpdateCategoryInclusion { ids, include } => {
            writer.update_category_inclusion(ids, include);
        }

        SettingsCommand::Shutdown => {
            // Handled in the main loop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::screen::{ScreenModel, ScreenState};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory backend recording every call
    #[derive(Default)]
    struct FakeBackend {
        settings: Mutex<ServerSettings>,
        metadata: Mutex<MetadataDownloadSettings>,
        fail_server_reads: Mutex<u32>,
        reject_writes: bool,
        server_reads: Mutex<u32>,
        metadata_reads: Mutex<u32>,
        category_reads: Mutex<u32>,
        patches: Mutex<Vec<serde_json::Value>>,
        metadata_writes: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SettingsBackend for FakeBackend {
        async fn server_settings(&self) -> Result<ServerSettings> {
            *self.server_reads.lock().unwrap() += 1;
            let mut failures = self.fail_server_reads.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Network("connection refused".into()));
            }
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn metadata_settings(&self) -> Result<MetadataDownloadSettings> {
            *self.metadata_reads.lock().unwrap() += 1;
            Ok(*self.metadata.lock().unwrap())
        }

        async fn categories(&self) -> Result<Vec<Category>> {
            *self.category_reads.lock().unwrap() += 1;
            Ok(Vec::new())
        }

        async fn update_server_setting(&self, update: &ServerSettingUpdate) -> Result<()> {
            self.patches.lock().unwrap().push(update.to_patch());
            if self.reject_writes {
                return Err(Error::GraphQl(vec!["read-only server".into()]));
            }
            if let ServerSettingUpdate::DownloadAsCbz(v) = update {
                self.settings.lock().unwrap().download_as_cbz = *v;
            }
            Ok(())
        }

        async fn update_metadata_setting(&self, update: &MetadataSettingUpdate) -> Result<()> {
            self.metadata_writes
                .lock()
                .unwrap()
                .push((update.key(), update.value()));
            apply_metadata(update, &mut self.metadata.lock().unwrap());
            Ok(())
        }

        async fn update_category_inclusion(
            &self,
            _ids: &[i32],
            _include: IncludeOrExclude,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn apply_metadata(update: &MetadataSettingUpdate, settings: &mut MetadataDownloadSettings) {
        match *update {
            MetadataSettingUpdate::DeleteChaptersManuallyMarkedRead(v) => {
                settings.delete_chapters_manually_marked_read = v
            }
            MetadataSettingUpdate::DeleteChaptersWhileReading(v) => {
                settings.delete_chapters_while_reading = v
            }
            MetadataSettingUpdate::DeleteChaptersWithBookmark(v) => {
                settings.delete_chapters_with_bookmark = v
            }
            MetadataSettingUpdate::DownloadAheadLimit(v) => settings.download_ahead_limit = v,
        }
    }

    fn start(
        backend: Arc<FakeBackend>,
    ) -> (
        async_channel::Sender<SettingsCommand>,
        async_channel::Receiver<UiMessage>,
        tokio::task::JoinHandle<()>,
    ) {
        let (ui_sender, ui_receiver) = async_channel::bounded(100);
        let (cmd_sender, cmd_receiver) = async_channel::bounded(100);
        let handle = tokio::spawn(SettingsService::new(backend).run(ui_sender, cmd_receiver));
        (cmd_sender, ui_receiver, handle)
    }

    async fn next_message(ui_receiver: &async_channel::Receiver<UiMessage>) -> UiMessage {
        tokio::time::timeout(Duration::from_secs(5), ui_receiver.recv())
            .await
            .expect("timed out waiting for UI message")
            .expect("UI channel closed")
    }

    /// Collect messages until `done` has matched `count` of them
    async fn collect_until(
        ui_receiver: &async_channel::Receiver<UiMessage>,
        count: usize,
        done: impl Fn(&UiMessage) -> bool,
    ) -> Vec<UiMessage> {
        let mut seen = Vec::new();
        let mut matched = 0;
        while matched < count {
            let msg = next_message(ui_receiver).await;
            if done(&msg) {
                matched += 1;
            }
            seen.push(msg);
        }
        seen
    }

    fn is_loaded(msg: &UiMessage) -> bool {
        matches!(
            msg,
            UiMessage::ServerSettingsLoaded(_)
                | UiMessage::MetadataSettingsLoaded(_)
                | UiMessage::CategoriesLoaded(_)
        )
    }

    #[tokio::test]
    async fn load_all_issues_three_reads() {
        let backend = Arc::new(FakeBackend::default());
        let (cmd, ui, handle) = start(backend.clone());

        assert_eq!(next_message(&ui).await, UiMessage::ServiceReady);
        cmd.send(SettingsCommand::LoadAll).await.unwrap();
        let messages = collect_until(&ui, 3, is_loaded).await;

        assert!(messages.contains(&UiMessage::ServerSettingsLoaded(Ok(ServerSettings::default()))));
        assert!(messages.contains(&UiMessage::CategoriesLoaded(Ok(Vec::new()))));
        assert_eq!(*backend.server_reads.lock().unwrap(), 1);
        assert_eq!(*backend.metadata_reads.lock().unwrap(), 1);
        assert_eq!(*backend.category_reads.lock().unwrap(), 1);

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn toggle_sends_one_single_field_mutation() {
        let backend = Arc::new(FakeBackend::default());
        let (cmd, ui, handle) = start(backend.clone());
        next_message(&ui).await;

        cmd.send(SettingsCommand::UpdateServerSetting(
            ServerSettingUpdate::DownloadAsCbz(true),
        ))
        .await
        .unwrap();

        // The write is followed by a refetch of the server settings
        let messages = collect_until(&ui, 1, is_loaded).await;
        let expected = ServerSettings {
            download_as_cbz: true,
            ..Default::default()
        };
        assert_eq!(
            messages.last(),
            Some(&UiMessage::ServerSettingsLoaded(Ok(expected)))
        );

        let patches = backend.patches.lock().unwrap().clone();
        assert_eq!(patches, vec![serde_json::json!({ "downloadAsCbz": true })]);
        assert_eq!(*backend.metadata_reads.lock().unwrap(), 0);

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn rejected_write_reports_failure() {
        let backend = Arc::new(FakeBackend {
            reject_writes: true,
            ..Default::default()
        });
        let (cmd, ui, handle) = start(backend.clone());
        next_message(&ui).await;

        cmd.send(SettingsCommand::UpdateServerSetting(
            ServerSettingUpdate::UseAnilist(true),
        ))
        .await
        .unwrap();

        let messages = collect_until(&ui, 1, is_loaded).await;
        assert!(messages.contains(&UiMessage::SaveFailed {
            title: "Failed to save changes".into(),
            detail: "read-only server".into(),
        }));
        // Server truth is re-read, so the control falls back to it
        assert_eq!(
            messages.last(),
            Some(&UiMessage::ServerSettingsLoaded(Ok(ServerSettings::default())))
        );

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failed_write_and_failed_refresh_keep_content() {
        let backend = Arc::new(FakeBackend {
            reject_writes: true,
            ..Default::default()
        });
        let (cmd, ui, handle) = start(backend.clone());
        next_message(&ui).await;

        let mut model = ScreenModel::new();
        cmd.send(SettingsCommand::LoadAll).await.unwrap();
        for msg in collect_until(&ui, 3, is_loaded).await {
            model.apply(&msg);
        }
        assert!(matches!(model.state(), ScreenState::Ready(_)));

        // The write is rejected and the read after it fails too
        *backend.fail_server_reads.lock().unwrap() = 1;
        cmd.send(SettingsCommand::UpdateServerSetting(
            ServerSettingUpdate::DownloadAsCbz(true),
        ))
        .await
        .unwrap();

        let msg = next_message(&ui).await;
        assert!(matches!(msg, UiMessage::SaveFailed { .. }));
        model.apply(&msg);

        while *backend.server_reads.lock().unwrap() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        while let Ok(msg) = ui.try_recv() {
            assert!(!matches!(msg, UiMessage::QueryStarted(_)));
            model.apply(&msg);
        }

        assert_eq!(*backend.fail_server_reads.lock().unwrap(), 0);
        assert!(matches!(model.state(), ScreenState::Ready(_)));

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn metadata_write_goes_through_metadata_path() {
        let backend = Arc::new(FakeBackend::default());
        let (cmd, ui, handle) = start(backend.clone());
        next_message(&ui).await;

        cmd.send(SettingsCommand::UpdateMetadataSetting(
            MetadataSettingUpdate::DownloadAheadLimit(5),
        ))
        .await
        .unwrap();

        let messages = collect_until(&ui, 1, is_loaded).await;
        assert!(matches!(
            messages.last(),
            Some(UiMessage::MetadataSettingsLoaded(Ok(m))) if m.download_ahead_limit == 5
        ));
        assert_eq!(
            backend.metadata_writes.lock().unwrap().clone(),
            vec![("webUI_downloadAheadLimit".to_string(), "5".to_string())]
        );
        assert!(backend.patches.lock().unwrap().is_empty());

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn refetch_failure_is_posted_not_fatal() {
        let backend = Arc::new(FakeBackend {
            fail_server_reads: Mutex::new(2),
            ..Default::default()
        });
        let (cmd, ui, handle) = start(backend.clone());
        next_message(&ui).await;

        cmd.send(SettingsCommand::Refetch(Query::ServerSettings))
            .await
            .unwrap();
        let messages = collect_until(&ui, 1, is_loaded).await;
        assert_eq!(
            messages,
            vec![
                UiMessage::QueryStarted(Query::ServerSettings),
                UiMessage::ServerSettingsLoaded(Err("connection refused".into())),
            ]
        );

        cmd.send(SettingsCommand::Refetch(Query::ServerSettings))
            .await
            .unwrap();
        collect_until(&ui, 1, is_loaded).await;
        cmd.send(SettingsCommand::Refetch(Query::ServerSettings))
            .await
            .unwrap();
        let messages = collect_until(&ui, 1, is_loaded).await;
        assert!(matches!(
            messages.last(),
            Some(UiMessage::ServerSettingsLoaded(Ok(_)))
        ));
        assert_eq!(*backend.metadata_reads.lock().unwrap(), 0);

        cmd.send(SettingsCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }
}
