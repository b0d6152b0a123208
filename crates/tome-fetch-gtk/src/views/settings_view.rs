//! Settings view - download settings page
//!
//! Renders the core `ScreenState`. Widgets are built once per screen and
//! afterwards updated in place, so refetches after an edit do not reset the
//! scroll position.

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;

use crate::dialogs::{NumberSettingDialog, NumberSettingSpec, TextSettingDialog};
use crate::widgets::FormatHints;
use crate::window::TomeFetchWindow;
use tome_fetch_core::screen::SCREEN_TITLE;
use tome_fetch_core::{
    Category, DownloadScreen, EditValue, IncludeOrExclude, Row, ScreenState, SelectOption,
    SettingKey, SettingsCommand,
};

const INCLUSION_CHOICES: [(IncludeOrExclude, &str); 3] = [
    (IncludeOrExclude::Unset, "Default"),
    (IncludeOrExclude::Include, "Include"),
    (IncludeOrExclude::Exclude, "Exclude"),
];

/// Widget backing an editable row
#[derive(Clone)]
pub enum RowWidget {
    Switch(adw::SwitchRow),
    Action(adw::ActionRow),
    Combo(adw::ComboRow),
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct SettingsView {
        pub window: RefCell<Option<TomeFetchWindow>>,
        pub stack: OnceCell<gtk::Stack>,
        pub error_page: OnceCell<adw::StatusPage>,
        pub content: OnceCell<adw::Bin>,
        pub rows: RefCell<HashMap<SettingKey, RowWidget>>,
        pub screen: RefCell<Option<DownloadScreen>>,
        /// Set while values are pushed into widgets, so their change
        /// signals are not mistaken for user edits
        pub updating: Cell<bool>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for SettingsView {
        const NAME: &'static str = "SettingsView";
        type Type = super::SettingsView;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for SettingsView {}
    impl WidgetImpl for SettingsView {}
    impl BoxImpl for SettingsView {}
}

glib::wrapper! {
    pub struct SettingsView(ObjectSubclass<imp::SettingsView>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl SettingsView {
    pub fn new(window: &TomeFetchWindow) -> Self {
        let view: Self = glib::Object::new();
        *view.imp().window.borrow_mut() = Some(window.clone());
        view.setup_ui();
        view
    }

    fn setup_ui(&self) {
        self.set_orientation(gtk::Orientation::Vertical);
        self.set_spacing(0);

        // Header bar
        let header = adw::HeaderBar::new();
        let title = adw::WindowTitle::new(SCREEN_TITLE, "");
        header.set_title_widget(Some(&title));

        let reload_btn = gtk::Button::from_icon_name("view-refresh-symbolic");
        reload_btn.set_tooltip_text(Some("Reload"));
        reload_btn.set_action_name(Some("win.reload"));
        header.pack_end(&reload_btn);

        self.append(&header);

        // Loading state
        let spinner = gtk::Spinner::new();
        spinner.set_spinning(true);
        spinner.set_size_request(32, 32);
        spinner.set_halign(gtk::Align::Center);
        spinner.set_valign(gtk::Align::Center);

        // Error state
        let error_page = adw::StatusPage::new();
        error_page.set_icon_name(Some("dialog-error-symbolic"));
        let retry_btn = gtk::Button::with_label("Retry");
        retry_btn.set_halign(gtk::Align::Center);
        retry_btn.add_css_class("pill");
        retry_btn.add_css_class("suggested-action");
        retry_btn.connect_clicked(glib::clone!(
            #[weak(rename_to = view)]
            self,
            move |_| {
                if let Some(window) = view.imp().window.borrow().as_ref() {
                    window.retry();
                };
            }
        ));
        error_page.set_child(Some(&retry_btn));
        let _ = self.imp().error_page.set(error_page.clone());

        // Content state; the preferences page inside is swapped on rebuild
        let content = adw::Bin::new();
        let _ = self.imp().content.set(content.clone());

        let stack = gtk::Stack::new();
        stack.set_vexpand(true);
        stack.set_transition_type(gtk::StackTransitionType::Crossfade);
        stack.add_named(&spinner, Some("loading"));
        stack.add_named(&error_page, Some("error"));
        stack.add_named(&content, Some("content"));
        stack.set_visible_child_name("loading");
        let _ = self.imp().stack.set(stack.clone());

        self.append(&stack);
    }

    pub fn render(&self, state: &ScreenState) {
        let imp = self.imp();
        let Some(stack) = imp.stack.get() else {
            return;
        };

        match state {
            ScreenState::Loading => {
                stack.set_visible_child_name("loading");
            }

            ScreenState::Error { message, detail } => {
                if let Some(page) = imp.error_page.get() {
                    page.set_title(message);
                    page.set_description(Some(detail.as_str()));
                }
                stack.set_visible_child_name("error");
            }

            ScreenState::Ready(screen) => {
                let rebuild = match imp.screen.borrow().as_ref() {
                    Some(current) => current.categories != screen.categories,
                    None => true,
                };

                if rebuild {
                    self.build_page(screen);
                } else {
                    self.update_rows(screen);
                }
                *imp.screen.borrow_mut() = Some(screen.clone());
                stack.set_visible_child_name("content");
            }
        }
    }

    fn build_page(&self, screen: &DownloadScreen) {
        let imp = self.imp();
        imp.updating.set(true);
        imp.rows.borrow_mut().clear();

        let page = adw::PreferencesPage::new();
        for section in screen.sections() {
            let group = adw::PreferencesGroup::new();
            if let Some(title) = &section.title {
                group.set_title(title);
            }
            for row in &section.rows {
                self.add_row(&group, row);
            }
            page.add(&group);
        }

        if let Some(content) = imp.content.get() {
            content.set_child(Some(&page));
        }
        imp.updating.set(false);
    }

    fn add_row(&self, group: &adw::PreferencesGroup, row: &Row) {
        match row {
            Row::Info { title, subtitle } => {
                let info_row = adw::ActionRow::new();
                info_row.set_title(title);
                info_row.set_subtitle(subtitle);
                info_row.set_subtitle_lines(0);
                info_row.set_activatable(false);
                group.add(&info_row);
            }

            Row::Toggle {
                key,
                title,
                subtitle,
                active,
                sensitive,
            } => {
                let switch_row = adw::SwitchRow::new();
                switch_row.set_title(title);
                if let Some(subtitle) = subtitle {
                    switch_row.set_subtitle(subtitle);
                }
                switch_row.set_active(*active);
                switch_row.set_sensitive(*sensitive);

                let key = *key;
                switch_row.connect_active_notify(glib::clone!(
                    #[weak(rename_to = view)]
                    self,
                    move |row| {
                        view.on_edit(key, EditValue::Bool(row.is_active()));
                    }
                ));
                group.add(&switch_row);
                self.register(key, RowWidget::Switch(switch_row));
            }

            Row::Text {
                key, title, subtitle, ..
            } => {
                let text_row = adw::ActionRow::new();
                text_row.set_title(title);
                text_row.set_subtitle(subtitle);
                text_row.set_use_markup(false);
                text_row.set_activatable(true);
                text_row.add_suffix(&gtk::Image::from_icon_name("document-edit-symbolic"));

                let key = *key;
                text_row.connect_activated(glib::clone!(
                    #[weak(rename_to = view)]
                    self,
                    move |_| {
                        view.edit_text(key);
                    }
                ));
                group.add(&text_row);
                self.register(key, RowWidget::Action(text_row));
            }

            Row::FormatHints(field) => {
                let hints_row = adw::PreferencesRow::new();
                hints_row.set_title(field.title());
                hints_row.set_activatable(false);
                hints_row.set_child(Some(&FormatHints::new(*field, self)));
                group.add(&hints_row);
            }

            Row::Number {
                key,
                title,
                subtitle,
                sensitive,
                ..
            } => {
                let number_row = adw::ActionRow::new();
                number_row.set_title(title);
                number_row.set_subtitle(subtitle);
                number_row.set_activatable(true);
                number_row.set_sensitive(*sensitive);
                number_row.add_suffix(&gtk::Image::from_icon_name("go-next-symbolic"));

                let key = *key;
                number_row.connect_activated(glib::clone!(
                    #[weak(rename_to = view)]
                    self,
                    move |_| {
                        view.edit_number(key);
                    }
                ));
                group.add(&number_row);
                self.register(key, RowWidget::Action(number_row));
            }

            Row::Select {
                key,
                title,
                subtitle,
                options,
                selected,
                sensitive,
            } => {
                let combo_row = adw::ComboRow::new();
                combo_row.set_title(title);
                if let Some(subtitle) = subtitle {
                    combo_row.set_subtitle(subtitle);
                }
                combo_row.set_model(Some(&string_list(options)));
                combo_row.set_selected(*selected as u32);
                combo_row.set_sensitive(*sensitive);

                let key = *key;
                combo_row.connect_selected_notify(glib::clone!(
                    #[weak(rename_to = view)]
                    self,
                    move |row| {
                        view.on_select(key, row.selected() as usize);
                    }
                ));
                group.add(&combo_row);
                self.register(key, RowWidget::Combo(combo_row));
            }

            Row::Categories {
                title,
                summary,
                categories,
                ..
            } => {
                let expander = adw::ExpanderRow::new();
                expander.set_title(title);
                expander.set_subtitle(summary);
                for category in categories {
                    expander.add_row(&self.category_row(category));
                }
                group.add(&expander);
            }
        }
    }

    fn category_row(&self, category: &Category) -> adw::ComboRow {
        let labels: Vec<&str> = INCLUSION_CHOICES.iter().map(|(_, label)| *label).collect();
        let selected = INCLUSION_CHOICES
            .iter()
            .position(|(flag, _)| *flag == category.include_in_download)
            .unwrap_or(0);

        let row = adw::ComboRow::new();
        row.set_title(&category.name);
        row.set_use_markup(false);
        row.set_model(Some(&gtk::StringList::new(&labels)));
        row.set_selected(selected as u32);

        let id = category.id;
        row.connect_selected_notify(glib::clone!(
            #[weak(rename_to = view)]
            self,
            move |row| {
                if view.imp().updating.get() {
                    return;
                }
                if let Some((include, _)) = INCLUSION_CHOICES.get(row.selected() as usize) {
                    view.send_command(SettingsCommand::UpdateCategoryInclusion {
                        ids: vec![id],
                        include: *include,
                    });
                }
            }
        ));
        row
    }

    fn register(&self, key: SettingKey, widget: RowWidget) {
        self.imp().rows.borrow_mut().insert(key, widget);
    }

    /// Push new server values into the existing widgets
    fn update_rows(&self, screen: &DownloadScreen) {
        let imp = self.imp();
        imp.updating.set(true);

        let rows = imp.rows.borrow();
        for row in screen.sections().iter().flat_map(|s| s.rows.iter()) {
            let Some(widget) = row.key().and_then(|key| rows.get(&key)) else {
                continue;
            };

            match (row, widget) {
                (
                    Row::Toggle {
                        active, sensitive, ..
                    },
                    RowWidget::Switch(switch_row),
                ) => {
                    switch_row.set_active(*active);
                    switch_row.set_sensitive(*sensitive);
                }

                (Row::Text { subtitle, .. }, RowWidget::Action(action_row)) => {
                    action_row.set_subtitle(subtitle);
                }

                (
                    Row::Number {
                        subtitle, sensitive, ..
                    },
                    RowWidget::Action(action_row),
                ) => {
                    action_row.set_subtitle(subtitle);
                    action_row.set_sensitive(*sensitive);
                }

                (
                    Row::Select {
                        options,
                        selected,
                        sensitive,
                        ..
                    },
                    RowWidget::Combo(combo_row),
                ) => {
                    if combo_row.model().map(|m| m.n_items()) != Some(options.len() as u32) {
                        combo_row.set_model(Some(&string_list(options)));
                    }
                    combo_row.set_selected(*selected as u32);
                    combo_row.set_sensitive(*sensitive);
                }

                _ => {
                    log::warn!("Row {:?} does not match its widget", row.key());
                }
            }
        }

        imp.updating.set(false);
    }

    /// Current description of the row bound to `key`
    fn current_row(&self, key: SettingKey) -> Option<Row> {
        let sections = self.imp().screen.borrow().as_ref()?.sections();
        sections
            .into_iter()
            .flat_map(|s| s.rows)
            .find(|row| row.key() == Some(key))
    }

    fn on_edit(&self, key: SettingKey, value: EditValue) {
        if self.imp().updating.get() {
            return;
        }
        if let Some(window) = self.imp().window.borrow().as_ref() {
            window.send_edit(key, value);
        }
    }

    fn on_select(&self, key: SettingKey, index: usize) {
        if self.imp().updating.get() {
            return;
        }
        if let Some(Row::Select { options, .. }) = self.current_row(key) {
            if let Some(option) = options.get(index) {
                self.on_edit(key, option.value.clone());
            }
        }
    }

    fn send_command(&self, cmd: SettingsCommand) {
        if let Some(window) = self.imp().window.borrow().as_ref() {
            window.send_command(cmd);
        }
    }

    fn edit_text(&self, key: SettingKey) {
        let Some(Row::Text {
            title,
            dialog_description,
            value,
            ..
        }) = self.current_row(key)
        else {
            return;
        };
        let window = self.imp().window.borrow().clone();
        let Some(window) = window else {
            return;
        };

        let dialog = TextSettingDialog::new(
            &title,
            &dialog_description,
            &value,
            glib::clone!(
                #[weak(rename_to = view)]
                self,
                move |text| {
                    view.on_edit(key, EditValue::Text(text));
                }
            ),
        );
        dialog.present(Some(&window));
    }

    fn edit_number(&self, key: SettingKey) {
        let Some(Row::Number {
            title,
            dialog_description,
            value,
            min,
            max,
            unit,
            ..
        }) = self.current_row(key)
        else {
            return;
        };
        let window = self.imp().window.borrow().clone();
        let Some(window) = window else {
            return;
        };

        let dialog = NumberSettingDialog::new(
            NumberSettingSpec {
                title: &title,
                description: &dialog_description,
                value,
                min,
                max,
                unit: &unit,
            },
            glib::clone!(
                #[weak(rename_to = view)]
                self,
                move |number| {
                    view.on_edit(key, EditValue::Int(number));
                }
            ),
        );
        dialog.present(Some(&window));
    }

    pub fn show_toast(&self, message: &str) {
        if let Some(window) = self.imp().window.borrow().as_ref() {
            window.show_toast(message);
        }
    }
}

fn string_list(options: &[SelectOption]) -> gtk::StringList {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    gtk::StringList::new(&labels)
}
