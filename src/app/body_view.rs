use eframe::egui;

use super::{CANVAS_FILL, CareApp, SELECTION_COLOR, Tab, canvas_pos};
use crate::body_chart::{
    BodyChartScene, Marker, MarkerKind, PRESSURE_HOTSPOTS, PRESSURE_SORE_STAGES, Severity,
};
use crate::geometry::Point;

const CANVAS_WIDTH: f32 = 650.0;
const CANVAS_HEIGHT: f32 = 700.0;
/// Figure centers. The front and back outlines sit side by side.
const FRONT_CENTER_X: f32 = 175.0;
const BACK_CENTER_X: f32 = 475.0;
/// Hotspot coordinates are stored for a 600 px wide reference canvas.
const HOTSPOT_SHIFT_X: f32 = CANVAS_WIDTH / 2.0 - 300.0;

const FIGURE_FILL: egui::Color32 = egui::Color32::from_rgb(0xf9, 0xfa, 0xfb);
const FIGURE_STROKE: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const CAPTION_COLOR: egui::Color32 = egui::Color32::BLACK;
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const HOTSPOT_FILL: egui::Color32 = egui::Color32::from_rgb(0xfe, 0xfc, 0xe8);
const HOTSPOT_STROKE: egui::Color32 = egui::Color32::from_rgb(0xfa, 0xcc, 0x15);
const HOTSPOT_LABEL: egui::Color32 = egui::Color32::from_rgb(0xca, 0x8a, 0x04);

impl CareApp {
    pub(super) fn body_chart_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Body chart");
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    !self.body_chart.history.is_empty(),
                    egui::Button::new("Undo"),
                )
                .clicked()
            {
                self.body_chart.undo();
            }
            if ui
                .add_enabled(
                    self.body_chart.selected.is_some(),
                    egui::Button::new("Delete"),
                )
                .clicked()
            {
                self.body_chart.delete_selected();
            }
        });

        ui.add_space(8.0);
        ui.label("Marker type");
        for kind in MarkerKind::ALL {
            let text = egui::RichText::new(kind.label()).color(kind.color());
            if ui
                .selectable_label(self.body_chart.active_kind == kind, text)
                .clicked()
            {
                self.body_chart.active_kind = kind;
            }
        }
        ui.small("Draw on a figure with the mouse held down. Clicking a marker selects it.");

        if let Some(id) = self.body_chart.selected {
            self.marker_details(ui, id);
        }

        ui.add_space(12.0);
        ui.separator();
        if ui.button("Save image").clicked() {
            let ctx = ui.ctx().clone();
            self.request_canvas_export(&ctx, Tab::BodyChart);
        }
        if ui
            .add_enabled(
                !self.body_chart.scene.is_empty(),
                egui::Button::new("Clear all"),
            )
            .clicked()
        {
            self.confirm_clear = Some(Tab::BodyChart);
        }
    }

    fn marker_details(&mut self, ui: &mut egui::Ui, id: u64) {
        let Some(kind) = self.body_chart.scene.marker(id).map(|m| m.kind) else {
            return;
        };
        ui.add_space(8.0);
        ui.separator();
        ui.label(
            egui::RichText::new(kind.label())
                .color(kind.color())
                .strong(),
        );

        let mut push_undo_on_focus = false;
        if let Some(marker) = self.body_chart.scene.marker_mut(id) {
            ui.horizontal(|ui| {
                ui.label("Text");
                let r = ui.text_edit_singleline(&mut marker.text);
                push_undo_on_focus |= r.gained_focus();
            });
        }
        if push_undo_on_focus {
            self.body_chart.push_undo();
        }

        let Some((old_stage, old_severity)) = self
            .body_chart
            .scene
            .marker(id)
            .map(|m| (m.stage.clone(), m.severity))
        else {
            return;
        };

        if kind == MarkerKind::PressureSore {
            let mut stage = old_stage.clone();
            ui.horizontal(|ui| {
                ui.label("Stage");
                egui::ComboBox::from_id_salt("marker_stage")
                    .selected_text(stage.clone())
                    .show_ui(ui, |ui| {
                        for s in PRESSURE_SORE_STAGES {
                            ui.selectable_value(&mut stage, s.to_string(), s);
                        }
                    });
            });
            if stage != old_stage {
                self.body_chart.push_undo();
                if let Some(marker) = self.body_chart.scene.marker_mut(id) {
                    marker.stage = stage;
                }
            }
        }

        let mut severity = old_severity;
        ui.horizontal(|ui| {
            ui.label("Severity");
            egui::ComboBox::from_id_salt("marker_severity")
                .selected_text(severity.label())
                .show_ui(ui, |ui| {
                    for s in Severity::ALL {
                        ui.selectable_value(&mut severity, s, s.label());
                    }
                });
        });
        if severity != old_severity {
            self.body_chart.push_undo();
            if let Some(marker) = self.body_chart.scene.marker_mut(id) {
                marker.severity = severity;
            }
        }

        let mut push_undo_on_focus = false;
        if let Some(marker) = self.body_chart.scene.marker_mut(id) {
            ui.label("Notes");
            let r = ui.text_edit_multiline(&mut marker.notes);
            push_undo_on_focus |= r.gained_focus();
        }
        if push_undo_on_focus {
            self.body_chart.push_undo();
        }
    }

    pub(super) fn body_chart_canvas(&mut self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(CANVAS_WIDTH, CANVAS_HEIGHT),
                egui::Sense::click_and_drag(),
            );
            self.canvas_rect = Some(rect);
            let origin = rect.min;

            let pointer = ui.ctx().input(|i| i.pointer.interact_pos());
            let pressed = response.drag_started() || response.clicked();
            let released = response.drag_stopped() || response.clicked();

            if pressed {
                if let Some(pos) = pointer {
                    self.body_chart
                        .pointer_pressed(Point::from_pos2((pos - origin).to_pos2()));
                }
            }
            if response.dragged() {
                if let Some(pos) = pointer {
                    self.body_chart
                        .pointer_moved(Point::from_pos2((pos - origin).to_pos2()));
                }
            }
            if released {
                self.body_chart.pointer_released();
            }
            if response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, CANVAS_FILL);
            draw_figures(&painter, origin);
            draw_markers(
                &painter,
                origin,
                &self.body_chart.scene,
                self.body_chart.selected,
            );
            if let Some(path) = &self.body_chart.current_path {
                if path.len() > 1 {
                    let points: Vec<egui::Pos2> =
                        path.iter().map(|p| canvas_pos(origin, *p)).collect();
                    let stroke = egui::Stroke::new(3.0, self.body_chart.active_kind.color());
                    painter.add(egui::Shape::line(points, stroke));
                }
            }
        });
    }
}

fn draw_figures(painter: &egui::Painter, origin: egui::Pos2) {
    for (center_x, caption) in [(FRONT_CENTER_X, "(Front)"), (BACK_CENTER_X, "(Back)")] {
        draw_outline(painter, origin, center_x);
        painter.text(
            canvas_pos(origin, Point::new(center_x, 50.0)),
            egui::Align2::CENTER_CENTER,
            caption,
            egui::FontId::proportional(16.0),
            CAPTION_COLOR,
        );
    }
    for spot in &PRESSURE_HOTSPOTS {
        let center = canvas_pos(
            origin,
            Point::new(spot.pos.x + HOTSPOT_SHIFT_X, spot.pos.y),
        );
        painter.circle_filled(center, spot.radius, HOTSPOT_FILL);
        draw_dashed_circle(
            painter,
            center,
            spot.radius,
            egui::Stroke::new(1.0, HOTSPOT_STROKE),
        );
        painter.text(
            center + egui::vec2(0.0, spot.radius + 8.0),
            egui::Align2::CENTER_CENTER,
            spot.label,
            egui::FontId::proportional(10.0),
            HOTSPOT_LABEL,
        );
    }
}

/// Head, torso and limbs as simple primitives, enough to anchor markers
/// anatomically.
fn draw_outline(painter: &egui::Painter, origin: egui::Pos2, center_x: f32) {
    let stroke = egui::Stroke::new(2.0, FIGURE_STROKE);
    let head = canvas_pos(origin, Point::new(center_x, 80.0));
    painter.circle_filled(head, 40.0, FIGURE_FILL);
    painter.circle_stroke(head, 40.0, stroke);
    let parts = [
        (-50.0, 120.0, 50.0, 320.0),
        (-80.0, 130.0, -50.0, 280.0),
        (50.0, 130.0, 80.0, 280.0),
        (-40.0, 320.0, -10.0, 470.0),
        (10.0, 320.0, 40.0, 470.0),
    ];
    for (x0, y0, x1, y1) in parts {
        let rect = egui::Rect::from_min_max(
            canvas_pos(origin, Point::new(center_x + x0, y0)),
            canvas_pos(origin, Point::new(center_x + x1, y1)),
        );
        painter.rect_filled(rect, 0.0, FIGURE_FILL);
        painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
    }
}

fn draw_markers(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scene: &BodyChartScene,
    selected: Option<u64>,
) {
    for marker in &scene.markers {
        draw_marker_path(painter, origin, marker, selected == Some(marker.id));
    }
    for marker in &scene.markers {
        if marker.text.is_empty() {
            continue;
        }
        let centroid = marker.centroid();
        painter.text(
            canvas_pos(origin, Point::new(centroid.x, centroid.y - 15.0)),
            egui::Align2::CENTER_CENTER,
            &marker.text,
            egui::FontId::proportional(12.0),
            LABEL_COLOR,
        );
    }
}

fn draw_marker_path(painter: &egui::Painter, origin: egui::Pos2, marker: &Marker, selected: bool) {
    if marker.path.len() < 2 {
        return;
    }
    let points: Vec<egui::Pos2> = marker.path.iter().map(|p| canvas_pos(origin, *p)).collect();
    let color = marker.kind.color();
    let stroke = if selected {
        egui::Stroke::new(4.0, SELECTION_COLOR)
    } else {
        egui::Stroke::new(3.0, color)
    };
    // Longer paths read as enclosed regions and get a translucent fill.
    if marker.path.len() > 3 {
        let fill = egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 0x40);
        painter.add(egui::Shape::convex_polygon(
            points.clone(),
            fill,
            egui::Stroke::NONE,
        ));
    }
    painter.add(egui::Shape::line(points, stroke));
}

fn draw_dashed_circle(
    painter: &egui::Painter,
    center: egui::Pos2,
    radius: f32,
    stroke: egui::Stroke,
) {
    let dash = 2.0;
    let gap = 2.0;
    let circumference = std::f32::consts::TAU * radius;
    let steps = (circumference / (dash + gap)).ceil().max(4.0) as usize;
    for i in 0..steps {
        let a0 = i as f32 / steps as f32 * std::f32::consts::TAU;
        let a1 = a0 + dash / radius;
        painter.line_segment(
            [
                center + radius * egui::vec2(a0.cos(), a0.sin()),
                center + radius * egui::vec2(a1.cos(), a1.sin()),
            ],
            stroke,
        );
    }
}
