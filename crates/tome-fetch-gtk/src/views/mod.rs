//! Views module - page components

mod settings_view;

pub use settings_view::SettingsView;
