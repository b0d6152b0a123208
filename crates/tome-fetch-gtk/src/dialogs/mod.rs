//! Dialogs module - modal dialogs

mod number_setting_dialog;
mod text_setting_dialog;

pub use number_setting_dialog::{NumberSettingDialog, NumberSettingSpec};
pub use text_setting_dialog::TextSettingDialog;
