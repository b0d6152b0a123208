//! Tome-Fetch GTK - GTK4/libadwaita frontend for the Tome-Fetch download settings

mod application;
mod dialogs;
mod views;
mod widgets;
mod window;

use adw::prelude::*;

use application::TomeFetchApplication;

fn main() -> glib::ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Tome-Fetch GTK v{}", env!("CARGO_PKG_VERSION"));

    // Create and run application
    let app = TomeFetchApplication::new();
    app.run()
}
