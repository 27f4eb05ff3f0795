use eframe::egui;

use super::{CareApp, Tab, help};

impl eframe::App for CareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_screenshot_events(ctx);

        let wants_keyboard = ctx.wants_keyboard_input();
        let modal_open = self.confirm_clear.is_some() || self.note_prompt.is_some();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if modal_open {
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                    self.confirm_clear = None;
                    self.note_prompt = None;
                }
                return;
            }
            if !wants_keyboard {
                if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                    self.undo_active();
                }
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                    self.cancel_active();
                }
                if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                    || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
                {
                    self.delete_active();
                }
            }
        });

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("CareSketch").strong());
                ui.separator();
                for tab in Tab::ALL {
                    if ui.selectable_label(self.tab == tab, tab.label()).clicked() {
                        self.tab = tab;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Help").clicked() {
                        self.show_help = !self.show_help;
                    }
                });
            });
        });

        egui::SidePanel::left("side_panel")
            .resizable(true)
            .min_width(230.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                    Tab::Genogram => self.genogram_panel(ui),
                    Tab::BodyChart => self.body_chart_panel(ui),
                    Tab::HouseLayout => self.house_panel(ui),
                });
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.tab {
                        Tab::Genogram => {
                            ui.label(format!("Selected: {}", self.genogram.selected.len()));
                            ui.separator();
                            ui.label(format!("People: {}", self.genogram.scene.people.len()));
                        }
                        Tab::BodyChart => {
                            ui.label(format!("Markers: {}", self.body_chart.scene.markers.len()));
                        }
                        Tab::HouseLayout => {
                            ui.label(format!("Notes: {}", self.house.scene.notes.len()));
                            ui.separator();
                            ui.label(format!("Walls: {}", self.house.scene.walls.len()));
                            ui.separator();
                            ui.label(format!("Items: {}", self.house.scene.items.len()));
                        }
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| match self.tab {
                Tab::Genogram => self.genogram_canvas(ui),
                Tab::BodyChart => self.body_chart_canvas(ui),
                Tab::HouseLayout => self.house_canvas(ui),
            });
        });

        self.draw_confirm_clear(ctx);
        self.draw_note_prompt(ctx);
        help::draw_help_window(ctx, &mut self.show_help);
    }
}

impl CareApp {
    fn draw_confirm_clear(&mut self, ctx: &egui::Context) {
        let Some(tab) = self.confirm_clear else {
            return;
        };
        let mut open = true;
        let mut decided = false;
        egui::Window::new("Clear all")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Remove everything on the {} canvas? This can be undone.",
                    tab.label()
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.clear_scene(tab);
                        self.status = Some(format!("{} cleared", tab.label()));
                        decided = true;
                    }
                    if ui.button("Cancel").clicked() {
                        decided = true;
                    }
                });
            });
        if decided || !open {
            self.confirm_clear = None;
        }
    }

    fn draw_note_prompt(&mut self, ctx: &egui::Context) {
        if self.note_prompt.is_none() {
            return;
        }
        let mut commit = false;
        let mut cancel = false;
        egui::Window::new("Add note")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let Some(prompt) = &mut self.note_prompt else {
                    return;
                };
                let response = ui.text_edit_singleline(&mut prompt.text);
                response.request_focus();
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                }
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if commit {
            if let Some(prompt) = self.note_prompt.take() {
                self.house.add_note(prompt.pos, &prompt.text);
            }
        } else if cancel {
            self.note_prompt = None;
        }
    }
}
