//! Number Setting Dialog - picks a bounded integer with a slider

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;

type SaveCallback = Box<dyn Fn(i64)>;

/// Bounds and labels for a number dialog
pub struct NumberSettingSpec<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub value: i32,
    pub min: i32,
    pub max: i32,
    pub unit: &'a str,
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct NumberSettingDialog {
        pub scale: RefCell<Option<gtk::Scale>>,
        pub description: RefCell<Option<gtk::Label>>,
        pub value_label: RefCell<Option<gtk::Label>>,
        pub unit: RefCell<String>,
        pub on_save: RefCell<Option<SaveCallback>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for NumberSettingDialog {
        const NAME: &'static str = "NumberSettingDialog";
        type Type = super::NumberSettingDialog;
        type ParentType = adw::Dialog;
    }

    impl ObjectImpl for NumberSettingDialog {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for NumberSettingDialog {}
    impl AdwDialogImpl for NumberSettingDialog {}
}

glib::wrapper! {
    pub struct NumberSettingDialog(ObjectSubclass<imp::NumberSettingDialog>)
        @extends adw::Dialog, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget;
}

impl NumberSettingDialog {
    pub fn new<F>(spec: NumberSettingSpec<'_>, on_save: F) -> Self
    where
        F: Fn(i64) + 'static,
    {
        let dialog: Self = glib::Object::new();
        dialog.set_title(spec.title);

        let imp = dialog.imp();
        *imp.unit.borrow_mut() = spec.unit.to_string();

        if let Some(label) = imp.description.borrow().as_ref() {
            label.set_label(spec.description);
            label.set_visible(!spec.description.is_empty());
        }
        if let Some(scale) = imp.scale.borrow().as_ref() {
            let (min, max) = (f64::from(spec.min), f64::from(spec.max.max(spec.min)));
            scale.set_range(min, max);
            scale.set_value(f64::from(spec.value).clamp(min, max));
        }
        dialog.update_value_label();

        *imp.on_save.borrow_mut() = Some(Box::new(on_save));
        dialog
    }

    fn setup_ui(&self) {
        self.set_content_width(420);

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

        let value_label = gtk::Label::new(None);
        value_label.add_css_class("title-2");
        *self.imp().value_label.borrow_mut() = Some(value_label.clone());
        page.append(&value_label);

        let scale = gtk::Scale::with_range(gtk::Orientation::Horizontal, 0.0, 1.0, 1.0);
        scale.set_digits(0);
        scale.set_round_digits(0);
        scale.set_hexpand(true);
        scale.connect_value_changed(glib::clone!(
            #[weak(rename_to = dialog)]
            self,
            move |_| {
                dialog.update_value_label();
            }
        ));
        *self.imp().scale.borrow_mut() = Some(scale.clone());
        page.append(&scale);

        content.append(&page);
        self.set_child(Some(&content));
    }

    fn current_value(&self) -> i64 {
        self.imp()
            .scale
            .borrow()
            .as_ref()
            .map(|s| s.value().round() as i64)
            .unwrap_or_default()
    }

    fn update_value_label(&self) {
        let value = self.current_value();
        let unit = self.imp().unit.borrow();
        if let Some(label) = self.imp().value_label.borrow().as_ref() {
            if unit.is_empty() {
                label.set_label(&value.to_string());
            } else {
                label.set_label(&format!("{} {}", value, unit));
            }
        }
    }

    fn save(&self) {
        let value = self.current_value();
        if let Some(on_save) = self.imp().on_save.borrow().as_ref() {
            on_save(value);
        }
        self.close();
    }
}
