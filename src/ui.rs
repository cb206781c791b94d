use crate::settings::{DisplaySettings, Settings};

/// What the user asked for during one egui frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub recenter: bool,
    pub display_changed: bool,
}

/// Read-only facts shown in the top bar.
pub struct UiStatus<'a> {
    pub dataset: &'a str,
    pub samples: usize,
    pub rows: usize,
    pub animating: bool,
    pub dragging: bool,
}

pub struct Ui {
    show_display_settings: bool,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            show_display_settings: false,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, status: &UiStatus, settings: &mut Settings) -> UiActions {
        let mut actions = UiActions::default();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("⟲ Recenter").clicked() {
                    actions.recenter = true;
                }

                ui.separator();

                if ui
                    .button(if self.show_display_settings {
                        "✅ Display"
                    } else {
                        "⬜ Display"
                    })
                    .clicked()
                {
                    self.show_display_settings = !self.show_display_settings;
                }

                ui.separator();
                ui.label(format!("🌍 {}", status.dataset));
                ui.label(format!("{} samples in {} rows", status.samples, status.rows));

                if status.animating {
                    ui.separator();
                    ui.label("recentering…");
                } else if status.dragging {
                    ui.separator();
                    ui.label("dragging");
                }
            });
        });

        if self.show_display_settings {
            actions.display_changed = self.show_display_window(ctx, &mut settings.display);
            if actions.display_changed {
                settings.save();
            }
        }

        actions
    }

    fn show_display_window(&mut self, ctx: &egui::Context, display: &mut DisplaySettings) -> bool {
        let mut display_changed = false;

        egui::Window::new("🎨 Display Settings")
            .default_width(300.0)
            .resizable(true)
            .open(&mut self.show_display_settings)
            .show(ctx, |ui| {
                let mut changed = false;

                ui.label("Background:");
                changed |= ui
                    .color_edit_button_rgb(&mut display.background_color)
                    .changed();

                ui.label("Light:");
                changed |= ui.color_edit_button_rgb(&mut display.light_color).changed();

                ui.label("Ambient:");
                changed |= ui
                    .add(egui::Slider::new(&mut display.ambient, 0.0..=1.0))
                    .changed();

                ui.separator();

                if ui.button("Reset to Defaults").clicked() {
                    *display = DisplaySettings::default();
                    changed = true;
                }

                display_changed = changed;
            });

        display_changed
    }
}
