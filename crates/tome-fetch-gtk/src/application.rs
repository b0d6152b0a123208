//! Application module - AdwApplication subclass

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::{gio, glib};
use std::cell::OnceCell;
use std::sync::Arc;

use crate::window::TomeFetchWindow;
use tome_fetch_core::{ClientConfig, GraphQlClient, SettingsCommand, SettingsService, UiMessage};

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct TomeFetchApplication {
        pub cmd_sender: OnceCell<async_channel::Sender<SettingsCommand>>,
        pub window: OnceCell<TomeFetchWindow>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for TomeFetchApplication {
        const NAME: &'static str = "TomeFetchApplication";
        type Type = super::TomeFetchApplication;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for TomeFetchApplication {}

    impl ApplicationImpl for TomeFetchApplication {
        fn activate(&self) {
            let app = self.obj();

            // Get or create the window
            if let Some(window) = self.window.get() {
                window.present();
                return;
            }

            // Load connection settings
            let config = match ClientConfig::load() {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to load configuration, using defaults: {}", e);
                    ClientConfig::default()
                }
            };

            let client = match GraphQlClient::new(&config) {
                Ok(client) => client,
                Err(e) => {
                    log::error!("Failed to create GraphQL client: {}", e);
                    app.quit();
                    return;
                }
            };
            log::info!("Using server at {}", client.endpoint());

            // Create channels
            let (ui_sender, ui_receiver) = async_channel::bounded::<UiMessage>(100);
            let (cmd_sender, cmd_receiver) = async_channel::bounded::<SettingsCommand>(100);
            let _ = self.cmd_sender.set(cmd_sender.clone());

            // Settings service runs its own tokio runtime on a background thread
            SettingsService::new(Arc::new(client)).spawn(ui_sender, cmd_receiver);

            // Create the main window
            let window = TomeFetchWindow::new(&*app, cmd_sender.clone());
            let _ = self.window.set(window.clone());

            // Set up UI message handler
            let window_weak = window.downgrade();
            glib::spawn_future_local(async move {
                while let Ok(msg) = ui_receiver.recv().await {
                    if let Some(window) = window_weak.upgrade() {
                        window.handle_ui_message(msg);
                    } else {
                        break;
                    }
                }
            });

            let _ = cmd_sender.send_blocking(SettingsCommand::LoadAll);
            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            let app = self.obj();

            // Set up application actions
            app.setup_actions();

            // Set up keyboard shortcuts
            app.setup_shortcuts();
        }

        fn shutdown(&self) {
            if let Some(sender) = self.cmd_sender.get() {
                let _ = sender.send_blocking(SettingsCommand::Shutdown);
            }
            self.parent_shutdown();
        }
    }

    impl GtkApplicationImpl for TomeFetchApplication {}
    impl AdwApplicationImpl for TomeFetchApplication {}
}

glib::wrapper! {
    pub struct TomeFetchApplication(ObjectSubclass<imp::TomeFetchApplication>)
        @extends gio::Application, gtk::Application, adw::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl TomeFetchApplication {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("application-id", "io.github.tome.Fetch")
            .property("flags", gio::ApplicationFlags::FLAGS_NONE)
            .build()
    }

    fn setup_actions(&self) {
        // Quit action
        let quit_action = gio::ActionEntry::builder("quit")
            .activate(|app: &Self, _, _| {
                app.quit();
            })
            .build();

        // About action
        let about_action = gio::ActionEntry::builder("about")
            .activate(|app: &Self, _, _| {
                app.show_about();
            })
            .build();

        self.add_action_entries([quit_action, about_action]);
    }

    fn setup_shortcuts(&self) {
        self.set_accels_for_action("app.quit", &["<Primary>q"]);
        self.set_accels_for_action("win.reload", &["<Primary>r", "F5"]);
    }

    fn show_about(&self) {
        let window = self.active_window();

        let about = adw::AboutDialog::builder()
            .application_name("Tome-Fetch")
            .application_icon("io.github.tome.Fetch")
            .developer_name("Tome-Fetch Contributors")
            .version(env!("CARGO_PKG_VERSION"))
            .website("https://github.com/tome-fetch/tome-fetch")
            .issue_url("https://github.com/tome-fetch/tome-fetch/issues")
            .license_type(gtk::License::Mpl20)
            .comments("Download settings for your manga server")
            .build();

        if let Some(window) = window {
            about.present(Some(&window));
        }
    }
}

impl Default for TomeFetchApplication {
    fn default() -> Self {
        Self::new()
    }
}
