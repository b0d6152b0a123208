//! Window implementation

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::{OnceCell, RefCell};

use crate::views::SettingsView;
use tome_fetch_core::{ScreenModel, SettingsCommand};

#[derive(Default)]
pub struct TomeFetchWindow {
    pub cmd_sender: OnceCell<async_channel::Sender<SettingsCommand>>,
    pub toast_overlay: OnceCell<adw::ToastOverlay>,
    pub settings_view: OnceCell<SettingsView>,
    pub model: RefCell<ScreenModel>,
}

#[glib::object_subclass]
impl ObjectSubclass for TomeFetchWindow {
    const NAME: &'static str = "TomeFetchWindow";
    type Type = super::TomeFetchWindow;
    type ParentType = adw::ApplicationWindow;
}

impl ObjectImpl for TomeFetchWindow {
    fn constructed(&self) {
        self.parent_constructed();
    }
}

impl WidgetImpl for TomeFetchWindow {}
impl WindowImpl for TomeFetchWindow {}
impl ApplicationWindowImpl for TomeFetchWindow {}
impl AdwApplicationWindowImpl for TomeFetchWindow {}

impl TomeFetchWindow {
    pub fn setup_ui(&self, window: &super::TomeFetchWindow) {
        // Create toast overlay
        let toast_overlay = adw::ToastOverlay::new();
        let _ = self.toast_overlay.set(toast_overlay.clone());

        let settings_view = SettingsView::new(window);
        let _ = self.settings_view.set(settings_view.clone());

        // Render the initial (loading) state
        settings_view.render(&self.model.borrow().state());

        // Wrap in toast overlay
        toast_overlay.set_child(Some(&settings_view));

        // Set window content
        window.set_content(Some(&toast_overlay));
    }
}
