//! Text Setting Dialog - edits a free-text setting such as a path or format

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;

type SaveCallback = Box<dyn Fn(String)>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct TextSettingDialog {
        pub entry: RefCell<Option<gtk::Entry>>,
        pub description: RefCell<Option<gtk::Label>>,
        pub on_save: RefCell<Option<SaveCallback>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for TextSettingDialog {
        const NAME: &'static str = "TextSettingDialog";
        type Type = super::TextSettingDialog;
        type ParentType = adw::Dialog;
    }

    impl ObjectImpl for TextSettingDialog {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for TextSettingDialog {}
    impl AdwDialogImpl for TextSettingDialog {}
}

glib::wrapper! {
    pub struct TextSettingDialog(ObjectSubclass<imp::TextSettingDialog>)
        @extends adw::Dialog, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl TextSettingDialog {
    pub fn new<F>(title: &str, description: &str, value: &str, on_save: F) -> Self
    where
        F: Fn(String) + 'static,
    {
        let dialog: Self = glib::Object::new();
        dialog.set_title(title);

        let imp = dialog.imp();
        if let Some(label) = imp.description.borrow().as_ref() {
            label.set_label(description);
            label.set_visible(!description.is_empty());
        }
        if let Some(entry) = imp.entry.borrow().as_ref() {
            entry.set_text(value);
        }
        *imp.on_save.borrow_mut() = Some(Box::new(on_save));
        dialog
    }

    fn setup_ui(&self) {
        self.set_content_width(480);

        let content = gtk::Box::new(gtk::Orientation::Vertical, 0);

        // Header bar
        let header = adw::HeaderBar::new();
        header.set_show_start_title_buttons(false);
        header.set_show_end_title_buttons(false);

        let cancel_btn = gtk::Button::with_label("Cancel");
        cancel_btn.connect_clicked(glib::clone!(
            #[weak(rename_to = dialog)]
            self,
            move |_| {
                dialog.close();
            }
        ));
        header.pack_start(&cancel_btn);

        let save_btn = gtk::Button::with_label("Save");
        save_btn.add_css_class("suggested-action");
        save_btn.connect_clicked(glib::clone!(
            #[weak(rename_to = dialog)]
            self,
            move |_| {
                dialog.save();
            }
        ));
        header.pack_end(&save_btn);

        content.append(&header);

        let page = gtk::Box::new(gtk::Orientation::Vertical, 12);
        page.set_margin_start(16);
        page.set_margin_end(16);
        page.set_margin_top(16);
        page.set_margin_bottom(16);

        let description = gtk::Label::new(None);
        description.set_halign(gtk::Align::Start);
        description.set_wrap(true);
        description.set_xalign(0.0);
        description.add_css_class("dim-label");
        *self.imp().description.borrow_mut() = Some(description.clone());
        page.append(&description);

        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_activates_default(false);
        entry.connect_activate(glib::clone!(
            #[weak(rename_to = dialog)]
            self,
            move |_| {
                dialog.save();
            }
        ));
        *self.imp().entry.borrow_mut() = Some(entry.clone());
        page.append(&entry);

        content.append(&page);
        self.set_child(Some(&content));
    }

    fn save(&self) {
        let text = self
            .imp()
            .entry
            .borrow()
            .as_ref()
            .map(|e| e.text().to_string())
            .unwrap_or_default();

        if let Some(on_save) = self.imp().on_save.borrow().as_ref() {
            on_save(text);
        }
        self.close();
    }
}
