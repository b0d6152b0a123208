//! Main window module

mod imp;

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};

use tome_fetch_core::{EditValue, SettingKey, SettingsCommand, UiMessage};

glib::wrapper! {
    pub struct TomeFetchWindow(ObjectSubclass<imp::TomeFetchWindow>)
        @extends adw::ApplicationWindow, gtk::ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl TomeFetchWindow {
    pub fn new(
        app: &crate::application::TomeFetchApplication,
        cmd_sender: async_channel::Sender<SettingsCommand>,
    ) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .property("default-width", 720)
            .property("default-height", 860)
            .property("title", "Tome-Fetch")
            .build();

        let _ = window.imp().cmd_sender.set(cmd_sender);

        window.setup_ui();
        window.setup_actions();

        window
    }

    fn setup_ui(&self) {
        self.imp().setup_ui(self);
    }

    fn setup_actions(&self) {
        // Reload everything from the server
        let reload_action = gio::ActionEntry::builder("reload")
            .activate(|window: &Self, _, _| {
                window.send_command(SettingsCommand::LoadAll);
            })
            .build();

        self.add_action_entries([reload_action]);
    }

    pub fn handle_ui_message(&self, msg: UiMessage) {
        match msg {
            UiMessage::ServiceReady => {
                log::info!("Settings service ready");
            }

            UiMessage::SaveFailed { title, detail } => {
                self.show_error(&format!("{}: {}", title, detail));
            }

            msg => {
                let changed = self.imp().model.borrow_mut().apply(&msg);
                if changed {
                    self.render();
                }
            }
        }
    }

    fn render(&self) {
        let state = self.imp().model.borrow().state();
        if let Some(view) = self.imp().settings_view.get() {
            view.render(&state);
        }
    }

    /// Re-issue only the reads that failed
    pub fn retry(&self) {
        let commands = self.imp().model.borrow_mut().retry();
        for cmd in commands {
            self.send_command(cmd);
        }
        self.render();
    }

    /// Persist one edited field
    pub fn send_edit(&self, key: SettingKey, value: EditValue) {
        if let Some(cmd) = key.command(value) {
            self.send_command(cmd);
        }
    }

    pub fn send_command(&self, cmd: SettingsCommand) {
        if let Some(sender) = self.imp().cmd_sender.get() {
            let _ = sender.send_blocking(cmd);
        }
    }

    pub fn show_toast(&self, message: &str) {
        if let Some(overlay) = self.imp().toast_overlay.get() {
            let toast = adw::Toast::new(message);
            toast.set_timeout(3);
            overlay.add_toast(toast);
        }
    }

    fn show_error(&self, message: &str) {
        log::error!("Error: {}", message);
        if let Some(overlay) = self.imp().toast_overlay.get() {
            let toast = adw::Toast::new(message);
            toast.set_timeout(5);
            overlay.add_toast(toast);
        }
    }
}
