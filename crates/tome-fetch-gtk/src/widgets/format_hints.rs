//! FormatHints widget - clickable placeholder tokens for a format field

use adw::prelude::*;
use gtk::subclass::prelude::*;
use gtk::glib;

use crate::views::SettingsView;
use tome_fetch_core::FormatField;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct FormatHints;

    #[glib::object_subclass]
    impl ObjectSubclass for FormatHints {
        const NAME: &'static str = "FormatHints";
        type Type = super::FormatHints;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for FormatHints {}
    impl WidgetImpl for FormatHints {}
    impl BoxImpl for FormatHints {}
}

glib::wrapper! {
    pub struct FormatHints(ObjectSubclass<imp::FormatHints>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl FormatHints {
    pub fn new(field: FormatField, view: &SettingsView) -> Self {
        let hints: Self = glib::Object::new();
        hints.setup_ui(field, view);
        hints
    }

    fn setup_ui(&self, field: FormatField, view: &SettingsView) {
        self.set_orientation(gtk::Orientation::Vertical);
        self.set_spacing(4);
        self.set_margin_start(12);
        self.set_margin_end(12);
        self.set_margin_top(8);
        self.set_margin_bottom(8);

        let heading = gtk::Label::new(Some("Available variables:"));
        heading.set_halign(gtk::Align::Start);
        heading.add_css_class("dim-label");
        heading.add_css_class("caption");
        self.append(&heading);

        let flow = gtk::FlowBox::new();
        flow.set_selection_mode(gtk::SelectionMode::None);
        flow.set_homogeneous(false);
        flow.set_max_children_per_line(6);
        flow.set_column_spacing(4);
        flow.set_row_spacing(4);

        for variable in field.variables() {
            let token = variable.variable;
            let chip = gtk::Button::with_label(token);
            chip.add_css_class("flat");
            chip.add_css_class("caption");
            chip.set_tooltip_text(Some(variable.description));
            chip.connect_clicked(glib::clone!(
                #[weak]
                view,
                move |button| {
                    button.clipboard().set_text(token);
                    view.show_toast(&format!("Copied {}", token));
                }
            ));
            flow.insert(&chip, -1);
        }

        self.append(&flow);
    }
}
