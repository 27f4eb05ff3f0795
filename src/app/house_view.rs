use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::{CANVAS_FILL, CareApp, NotePrompt, SELECTION_COLOR, Tab, canvas_pos, draw_dashed_line};
use crate::geometry::Point;
use crate::house_layout::{
    GRID_SIZE, HouseScene, InProgress, Item, ItemCategory, ItemKind, Template, Tool,
};

const GRID_COLOR: egui::Color32 = egui::Color32::from_rgb(0xe5, 0xe7, 0xeb);
const WALL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const ITEM_STROKE: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const NOTE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x6b, 0x72, 0x80);
const NOTE_FONT_SIZE: f32 = 14.0;

impl CareApp {
    pub(super) fn house_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("House layout");
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.house.history.is_empty(), egui::Button::new("Undo"))
                .clicked()
            {
                self.house.undo();
            }
            if ui
                .add_enabled(self.house.selected.is_some(), egui::Button::new("Delete"))
                .clicked()
            {
                self.house.delete_selected();
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            for tool in Tool::ALL {
                if ui
                    .selectable_label(self.house.tool == tool, tool.label())
                    .clicked()
                {
                    self.house.set_tool(tool);
                }
            }
        });
        match self.house.tool {
            Tool::Select => ui.small("Drag items to move them. Drag the corner handle of a selected item to resize."),
            Tool::Wall => ui.small("Click once for each wall endpoint."),
            Tool::Note => ui.small("Click the canvas to place a note."),
        };
        if ui.checkbox(&mut self.show_grid, "Show grid").changed() {
            self.persist_settings();
        }

        ui.add_space(8.0);
        ui.label("Furniture & fixtures");
        ui.horizontal(|ui| {
            ui.label("Find");
            ui.text_edit_singleline(&mut self.palette_query);
        });
        let query = self.palette_query.trim().to_string();
        if query.is_empty() {
            for category in ItemCategory::ALL {
                ui.small(category.label());
                ui.horizontal_wrapped(|ui| {
                    for kind in ItemKind::ALL {
                        if kind.category() != category {
                            continue;
                        }
                        if ui.button(kind.label()).clicked() {
                            let pos = self.house.spawn_pos();
                            self.house.add_item(kind, pos);
                        }
                    }
                });
            }
        } else {
            let matcher = SkimMatcherV2::default();
            let mut matches: Vec<(ItemKind, i64)> = ItemKind::ALL
                .iter()
                .filter_map(|&kind| {
                    matcher
                        .fuzzy_match(kind.label(), &query)
                        .map(|score| (kind, score))
                })
                .collect();
            matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.label().cmp(b.0.label())));
            if matches.is_empty() {
                ui.small("No matches");
            }
            ui.horizontal_wrapped(|ui| {
                for (kind, _) in matches {
                    if ui.button(kind.label()).clicked() {
                        let pos = self.house.spawn_pos();
                        self.house.add_item(kind, pos);
                    }
                }
            });
        }

        if let Some(id) = self.house.selected {
            if self.house.scene.item(id).is_some() {
                self.item_details(ui, id);
            } else if self.house.scene.note(id).is_some() {
                self.note_details(ui, id);
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label("Templates");
        ui.horizontal(|ui| {
            for template in Template::ALL {
                if ui.button(template.label()).clicked() {
                    self.house.load_template(template);
                    self.status = Some(format!("Loaded {} template", template.label()));
                }
            }
        });

        ui.add_space(12.0);
        ui.separator();
        if ui.button("Save image").clicked() {
            let ctx = ui.ctx().clone();
            self.request_canvas_export(&ctx, Tab::HouseLayout);
        }
        if ui
            .add_enabled(!self.house.scene.is_empty(), egui::Button::new("Clear all"))
            .clicked()
        {
            self.confirm_clear = Some(Tab::HouseLayout);
        }
    }

    fn item_details(&mut self, ui: &mut egui::Ui, id: u64) {
        let Some((kind, rotation)) = self.house.scene.item(id).map(|i| (i.kind, i.rotation)) else {
            return;
        };
        ui.add_space(8.0);
        ui.separator();
        ui.label(egui::RichText::new(kind.label()).color(kind.color()).strong());
        ui.label(format!("Rotation: {rotation}°"));
        ui.horizontal(|ui| {
            if ui.button("Rotate 90°").clicked() {
                self.house.rotate_selected();
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Bring to front").clicked() {
                self.house.bring_selected_to_front();
            }
            if ui.button("Send to back").clicked() {
                self.house.send_selected_to_back();
            }
        });

        let mut push_undo_on_focus = false;
        if let Some(item) = self.house.scene.item_mut(id) {
            ui.label("Notes");
            let r = ui.text_edit_multiline(&mut item.notes);
            push_undo_on_focus |= r.gained_focus();
        }
        if push_undo_on_focus {
            self.house.push_undo();
        }
    }

    fn note_details(&mut self, ui: &mut egui::Ui, id: u64) {
        ui.add_space(8.0);
        ui.separator();
        ui.label("Note");
        let mut push_undo_on_focus = false;
        if let Some(note) = self.house.scene.note_mut(id) {
            let r = ui.text_edit_singleline(&mut note.text);
            push_undo_on_focus |= r.gained_focus();
        }
        if push_undo_on_focus {
            self.house.push_undo();
        }
    }

    pub(super) fn house_canvas(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width().max(400.0);
        let height = (width * 0.7).max(600.0);
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::click_and_drag());
        self.canvas_rect = Some(rect);
        let origin = rect.min;

        let painter = ui.painter_at(rect);
        let pointer = ui.ctx().input(|i| i.pointer.interact_pos());
        let pressed = response.drag_started() || response.clicked();
        let released = response.drag_stopped() || response.clicked();
        let measure = |text: &str| {
            painter
                .layout_no_wrap(
                    text.to_string(),
                    egui::FontId::proportional(NOTE_FONT_SIZE),
                    NOTE_COLOR,
                )
                .size()
                .x
        };

        if pressed {
            if let Some(pos) = pointer {
                let local = Point::from_pos2((pos - origin).to_pos2());
                if self.house.tool == Tool::Note {
                    self.note_prompt = Some(NotePrompt {
                        pos: local,
                        text: String::new(),
                    });
                } else {
                    self.house.pointer_pressed(local, measure);
                }
            }
        }
        let wall_pending = matches!(self.house.in_progress, Some(InProgress::Wall { .. }));
        if response.dragged() || (wall_pending && response.hovered()) {
            if let Some(pos) = pointer {
                self.house
                    .pointer_moved(Point::from_pos2((pos - origin).to_pos2()));
            }
        }
        if released {
            self.house.pointer_released();
        }
        if response.hovered() {
            match self.house.tool {
                Tool::Select => {}
                Tool::Wall => ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair),
                Tool::Note => ui.ctx().set_cursor_icon(egui::CursorIcon::Text),
            }
        }

        painter.rect_filled(rect, 0.0, CANVAS_FILL);
        if self.show_grid {
            draw_grid(&painter, rect);
        }
        draw_walls(&painter, origin, &self.house.scene);
        draw_items(&painter, origin, &self.house.scene, self.house.selected);
        if let Some(InProgress::Wall { start, current }) = self.house.in_progress {
            draw_dashed_line(
                &painter,
                canvas_pos(origin, start),
                canvas_pos(origin, current),
                egui::Stroke::new(6.0, SELECTION_COLOR),
                5.0,
                5.0,
            );
        }
        if let Some(id) = self.house.selected {
            if let Some(item) = self.house.scene.item(id) {
                let handle = item.resize_handle_rect().translate(origin.to_vec2());
                painter.rect_filled(handle, 0.0, SELECTION_COLOR);
            }
        }
        draw_labels(&painter, origin, &self.house.scene, self.house.selected);
    }
}

fn draw_grid(painter: &egui::Painter, rect: egui::Rect) {
    let stroke = egui::Stroke::new(1.0, GRID_COLOR);
    let mut x = rect.left();
    while x <= rect.right() {
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            stroke,
        );
        x += GRID_SIZE;
    }
    let mut y = rect.top();
    while y <= rect.bottom() {
        painter.line_segment(
            [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
            stroke,
        );
        y += GRID_SIZE;
    }
}

fn draw_walls(painter: &egui::Painter, origin: egui::Pos2, scene: &HouseScene) {
    let stroke = egui::Stroke::new(6.0, WALL_COLOR);
    for wall in &scene.walls {
        painter.line_segment(
            [canvas_pos(origin, wall.start), canvas_pos(origin, wall.end)],
            stroke,
        );
    }
}

fn draw_items(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scene: &HouseScene,
    selected: Option<u64>,
) {
    for index in scene.draw_order() {
        let item = &scene.items[index];
        let is_selected = selected == Some(item.id);
        let rect = item.rect().translate(origin.to_vec2());
        let color = item.kind.color();
        let alpha = if is_selected { 0xcc } else { 0x80 };
        let fill = egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha);
        let stroke = if is_selected {
            egui::Stroke::new(3.0, SELECTION_COLOR)
        } else {
            egui::Stroke::new(1.0, ITEM_STROKE)
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
        if item.kind == ItemKind::Door {
            draw_door_swing(painter, item, origin);
        }
    }
}

/// Quarter-circle swing arc in the door's hinge corner.
fn draw_door_swing(painter: &egui::Painter, item: &Item, origin: egui::Pos2) {
    let center = canvas_pos(origin, Point::new(item.pos.x + 10.0, item.pos.y + 10.0));
    let radius = 8.0;
    let stroke = egui::Stroke::new(2.0, ItemKind::Door.color());
    let steps = 8;
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let angle = i as f32 / steps as f32 * std::f32::consts::FRAC_PI_2;
        points.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
    }
    painter.add(egui::Shape::line(points, stroke));
}

fn draw_labels(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scene: &HouseScene,
    selected: Option<u64>,
) {
    for item in &scene.items {
        let rect = item.rect().translate(origin.to_vec2());
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            item.kind.label(),
            egui::FontId::proportional(12.0),
            LABEL_COLOR,
        );
    }
    for note in &scene.notes {
        let is_selected = selected == Some(note.id);
        let color = if is_selected { SELECTION_COLOR } else { NOTE_COLOR };
        let rect = painter.text(
            canvas_pos(origin, note.pos),
            egui::Align2::LEFT_TOP,
            &note.text,
            egui::FontId::proportional(NOTE_FONT_SIZE),
            color,
        );
        if is_selected {
            painter.rect_stroke(
                rect.expand(2.0),
                0.0,
                egui::Stroke::new(1.0, SELECTION_COLOR),
                egui::StrokeKind::Middle,
            );
        }
    }
}
