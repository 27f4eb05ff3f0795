use eframe::egui;

use super::{CANVAS_FILL, CareApp, SELECTION_COLOR, Tab, canvas_pos, draw_dashed_line};
use crate::genogram::{Gender, GenogramScene, Marriage, MarriageStatus, PERSON_HALF_SIZE, Person};
use crate::geometry::Point;

const PERSON_FILL: egui::Color32 = egui::Color32::WHITE;
const PERSON_FILL_DECEASED: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const PERSON_STROKE: egui::Color32 = egui::Color32::from_rgb(0x6b, 0x72, 0x80);
const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x37, 0x41, 0x51);
const KEY_PERSON_RING: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x26, 0x26);
const CAREGIVER_DOT: egui::Color32 = egui::Color32::from_rgb(0x06, 0xb6, 0xd4);
const MARRIAGE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x10, 0xb9, 0x81);
const DIVORCE_COLOR: egui::Color32 = egui::Color32::from_rgb(0xef, 0x44, 0x44);
const CHILD_LINK_COLOR: egui::Color32 = egui::Color32::from_rgb(0x8b, 0x5c, 0xf6);
const HOUSEHOLD_COLOR: egui::Color32 = SELECTION_COLOR;

/// Height of the marriage bus line above the higher spouse's center.
const MARRIAGE_OFFSET: f32 = 30.0;
/// Gap between the sibling bar and the topmost child figure.
const SIBLING_BAR_OFFSET: f32 = 20.0;
const HOUSEHOLD_PADDING: f32 = 30.0;

impl CareApp {
    pub(super) fn genogram_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Genogram");
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.genogram.history.is_empty(), egui::Button::new("Undo"))
                .clicked()
            {
                self.genogram.undo();
            }
            if ui
                .add_enabled(
                    !self.genogram.selected.is_empty(),
                    egui::Button::new("Delete"),
                )
                .clicked()
            {
                self.genogram.delete_selected();
            }
        });

        ui.add_space(8.0);
        ui.label("Add person");
        ui.horizontal(|ui| {
            if ui.button("Male").clicked() {
                let pos = self.genogram.spawn_pos();
                self.genogram.add_person(Gender::Male, pos);
            }
            if ui.button("Female").clicked() {
                let pos = self.genogram.spawn_pos();
                self.genogram.add_person(Gender::Female, pos);
            }
        });

        ui.add_space(8.0);
        ui.label("Relationships");
        let selected = self.genogram.selected.len();
        if ui
            .add_enabled(selected == 2, egui::Button::new("Marriage"))
            .clicked()
        {
            self.genogram.add_marriage();
        }
        if ui
            .add_enabled(selected >= 3, egui::Button::new("Parent-child"))
            .clicked()
        {
            self.genogram.add_child_links();
        }
        if ui
            .add_enabled(selected >= 2, egui::Button::new("Household"))
            .clicked()
        {
            self.genogram.add_household();
        }
        ui.small("Marriage needs exactly two people. For parent-child, select both parents first, then each child.");

        if self.genogram.selected.len() == 1 {
            let id = self.genogram.selected[0];
            self.person_details(ui, id);
        }

        ui.add_space(12.0);
        ui.separator();
        if ui.button("Save image").clicked() {
            let ctx = ui.ctx().clone();
            self.request_canvas_export(&ctx, Tab::Genogram);
        }
        if ui
            .add_enabled(
                !self.genogram.scene.is_empty(),
                egui::Button::new("Clear all"),
            )
            .clicked()
        {
            self.confirm_clear = Some(Tab::Genogram);
        }
    }

    fn person_details(&mut self, ui: &mut egui::Ui, id: u64) {
        ui.add_space(8.0);
        ui.separator();
        ui.label("Person");

        let mut push_undo_on_focus = false;
        if let Some(person) = self.genogram.scene.person_mut(id) {
            ui.horizontal(|ui| {
                ui.label("Name");
                let r = ui.text_edit_singleline(&mut person.name);
                push_undo_on_focus |= r.gained_focus();
            });
            ui.horizontal(|ui| {
                ui.label("Age");
                let r = ui.text_edit_singleline(&mut person.age);
                push_undo_on_focus |= r.gained_focus();
            });
            ui.label("Notes");
            let r = ui.text_edit_multiline(&mut person.notes);
            push_undo_on_focus |= r.gained_focus();
        }
        if push_undo_on_focus {
            self.genogram.push_undo();
        }

        let Some((deceased, caregiver, key_person)) = self
            .genogram
            .scene
            .person(id)
            .map(|p| (p.deceased, p.caregiver, p.key_person))
        else {
            return;
        };
        ui.horizontal(|ui| {
            if ui.selectable_label(deceased, "Deceased").clicked() {
                self.genogram.toggle_deceased(id);
            }
            if ui.selectable_label(caregiver, "Caregiver").clicked() {
                self.genogram.toggle_caregiver(id);
            }
        });
        if ui.selectable_label(key_person, "Key person").clicked() {
            self.genogram.toggle_key_person(id);
        }

        let marriages: Vec<(u64, u64, MarriageStatus)> = self
            .genogram
            .scene
            .marriages
            .iter()
            .filter(|m| m.involves(id))
            .map(|m| {
                let partner = if m.spouse_a == id { m.spouse_b } else { m.spouse_a };
                (m.id, partner, m.status)
            })
            .collect();
        if !marriages.is_empty() {
            ui.add_space(8.0);
            ui.label("Marriages");
            for (marriage_id, partner, status) in marriages {
                let partner_label = self
                    .genogram
                    .scene
                    .person(partner)
                    .map(|p| p.label())
                    .unwrap_or_else(|| format!("Person {partner}"));
                ui.horizontal(|ui| {
                    ui.label(partner_label);
                    if ui
                        .selectable_label(status == MarriageStatus::Divorced, "Divorced")
                        .clicked()
                    {
                        self.genogram.toggle_marriage_status(marriage_id);
                    }
                });
            }
        }
    }

    pub(super) fn genogram_canvas(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width().max(400.0);
        let height = (width * 0.6).max(600.0);
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::click_and_drag());
        self.canvas_rect = Some(rect);
        let origin = rect.min;

        let pointer = ui.ctx().input(|i| i.pointer.interact_pos());
        let multi = ui
            .ctx()
            .input(|i| i.modifiers.shift || i.modifiers.ctrl || i.modifiers.command);
        let pressed = response.drag_started() || response.clicked();
        let released = response.drag_stopped() || response.clicked();

        if pressed {
            if let Some(pos) = pointer {
                self.genogram
                    .pointer_pressed(Point::from_pos2((pos - origin).to_pos2()), multi);
            }
        }
        if response.dragged() {
            if let Some(pos) = pointer {
                self.genogram
                    .pointer_moved(Point::from_pos2((pos - origin).to_pos2()));
            }
        }
        if released {
            self.genogram.pointer_released();
        }

        if response.hovered() {
            if let Some(pos) = pointer {
                let local = Point::from_pos2((pos - origin).to_pos2());
                if self.genogram.hit_test(local).is_some() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, CANVAS_FILL);
        draw_genogram(&painter, origin, &self.genogram.scene, &self.genogram.selected);
    }
}

fn draw_genogram(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scene: &GenogramScene,
    selected: &[u64],
) {
    for household in &scene.households {
        let members: Vec<&Person> = household
            .members
            .iter()
            .filter_map(|id| scene.person(*id))
            .collect();
        if members.len() < 2 {
            continue;
        }
        let mut min = Point::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for member in &members {
            min.x = min.x.min(member.pos.x);
            min.y = min.y.min(member.pos.y);
            max.x = max.x.max(member.pos.x);
            max.y = max.y.max(member.pos.y);
        }
        let rect = egui::Rect::from_min_max(
            canvas_pos(
                origin,
                Point::new(min.x - HOUSEHOLD_PADDING, min.y - HOUSEHOLD_PADDING),
            ),
            canvas_pos(
                origin,
                Point::new(max.x + HOUSEHOLD_PADDING, max.y + HOUSEHOLD_PADDING),
            ),
        );
        let stroke = egui::Stroke::new(2.0, HOUSEHOLD_COLOR);
        draw_dashed_line(painter, rect.left_top(), rect.right_top(), stroke, 5.0, 5.0);
        draw_dashed_line(painter, rect.right_top(), rect.right_bottom(), stroke, 5.0, 5.0);
        draw_dashed_line(painter, rect.right_bottom(), rect.left_bottom(), stroke, 5.0, 5.0);
        draw_dashed_line(painter, rect.left_bottom(), rect.left_top(), stroke, 5.0, 5.0);
    }

    for marriage in &scene.marriages {
        draw_marriage(painter, origin, scene, marriage);
    }
    draw_child_links(painter, origin, scene);

    for person in &scene.people {
        draw_person_shape(painter, origin, person, selected.contains(&person.id));
    }
    for person in &scene.people {
        let pos = canvas_pos(origin, person.pos) + egui::vec2(0.0, 35.0);
        painter.text(
            pos,
            egui::Align2::CENTER_CENTER,
            person.label(),
            egui::FontId::proportional(12.0),
            LABEL_COLOR,
        );
    }
}

/// Horizontal bus above both spouses with a short stub down to each
/// figure. Divorced couples get a cross at the bus midpoint.
fn draw_marriage(
    painter: &egui::Painter,
    origin: egui::Pos2,
    scene: &GenogramScene,
    marriage: &Marriage,
) {
    let (Some(a), Some(b)) = (
        scene.person(marriage.spouse_a),
        scene.person(marriage.spouse_b),
    ) else {
        return;
    };
    let color = match marriage.status {
        MarriageStatus::Married => MARRIAGE_COLOR,
        MarriageStatus::Divorced => DIVORCE_COLOR,
    };
    let stroke = egui::Stroke::new(3.0, color);
    let bus_y = a.pos.y.min(b.pos.y) - MARRIAGE_OFFSET;
    let left = a.pos.x.min(b.pos.x);
    let right = a.pos.x.max(b.pos.x);
    painter.line_segment(
        [
            canvas_pos(origin, Point::new(left, bus_y)),
            canvas_pos(origin, Point::new(right, bus_y)),
        ],
        stroke,
    );
    for spouse in [a, b] {
        painter.line_segment(
            [
                canvas_pos(origin, Point::new(spouse.pos.x, bus_y)),
                canvas_pos(
                    origin,
                    Point::new(spouse.pos.x, spouse.pos.y - PERSON_HALF_SIZE),
                ),
            ],
            stroke,
        );
    }
    if marriage.status == MarriageStatus::Divorced {
        let mid = canvas_pos(origin, Point::new((left + right) / 2.0, bus_y));
        let cross = egui::Stroke::new(2.0, DIVORCE_COLOR);
        painter.line_segment([mid + egui::vec2(-10.0, -10.0), mid + egui::vec2(10.0, 10.0)], cross);
        painter.line_segment([mid + egui::vec2(-10.0, 10.0), mid + egui::vec2(10.0, -10.0)], cross);
    }
}

fn marriage_anchor(scene: &GenogramScene, parents: [u64; 2]) -> Option<Point> {
    let a = scene.person(parents[0])?;
    let b = scene.person(parents[1])?;
    Some(Point::new(
        (a.pos.x + b.pos.x) / 2.0,
        a.pos.y.min(b.pos.y) - MARRIAGE_OFFSET,
    ))
}

/// Children of the same parent pair hang off a shared sibling bar: one
/// drop from the parents' bus midpoint down to the bar, then one drop
/// from the bar to each child.
fn draw_child_links(painter: &egui::Painter, origin: egui::Pos2, scene: &GenogramScene) {
    let mut pairs: Vec<[u64; 2]> = Vec::new();
    for link in &scene.child_links {
        if !pairs.contains(&link.parents) {
            pairs.push(link.parents);
        }
    }
    let stroke = egui::Stroke::new(2.0, CHILD_LINK_COLOR);
    for parents in pairs {
        let Some(anchor) = marriage_anchor(scene, parents) else {
            continue;
        };
        let children: Vec<&Person> = scene
            .child_links
            .iter()
            .filter(|l| l.parents == parents)
            .filter_map(|l| scene.person(l.child))
            .collect();
        if children.is_empty() {
            continue;
        }
        let top = children
            .iter()
            .map(|c| c.pos.y)
            .fold(f32::INFINITY, f32::min);
        let bar_y = top - PERSON_HALF_SIZE - SIBLING_BAR_OFFSET;
        let mut left = children
            .iter()
            .map(|c| c.pos.x)
            .fold(f32::INFINITY, f32::min);
        let mut right = children
            .iter()
            .map(|c| c.pos.x)
            .fold(f32::NEG_INFINITY, f32::max);
        left = left.min(anchor.x);
        right = right.max(anchor.x);

        painter.line_segment(
            [
                canvas_pos(origin, anchor),
                canvas_pos(origin, Point::new(anchor.x, bar_y)),
            ],
            stroke,
        );
        painter.line_segment(
            [
                canvas_pos(origin, Point::new(left, bar_y)),
                canvas_pos(origin, Point::new(right, bar_y)),
            ],
            stroke,
        );
        for child in children {
            painter.line_segment(
                [
                    canvas_pos(origin, Point::new(child.pos.x, bar_y)),
                    canvas_pos(
                        origin,
                        Point::new(child.pos.x, child.pos.y - PERSON_HALF_SIZE),
                    ),
                ],
                stroke,
            );
        }
    }
}

fn draw_person_shape(
    painter: &egui::Painter,
    origin: egui::Pos2,
    person: &Person,
    selected: bool,
) {
    let center = canvas_pos(origin, person.pos);
    let fill = if person.deceased {
        PERSON_FILL_DECEASED
    } else {
        PERSON_FILL
    };
    let stroke = if selected {
        egui::Stroke::new(3.0, SELECTION_COLOR)
    } else {
        egui::Stroke::new(2.0, PERSON_STROKE)
    };
    match person.gender {
        Gender::Male => {
            let rect = egui::Rect::from_center_size(
                center,
                egui::Vec2::splat(PERSON_HALF_SIZE * 2.0),
            );
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
        }
        Gender::Female => {
            painter.circle_filled(center, PERSON_HALF_SIZE, fill);
            painter.circle_stroke(center, PERSON_HALF_SIZE, stroke);
        }
    }
    if person.key_person {
        let ring = egui::Stroke::new(4.0, KEY_PERSON_RING);
        match person.gender {
            Gender::Male => {
                let rect = egui::Rect::from_center_size(
                    center,
                    egui::Vec2::splat((PERSON_HALF_SIZE + 2.0) * 2.0),
                );
                painter.rect_stroke(rect, 0.0, ring, egui::StrokeKind::Middle);
            }
            Gender::Female => {
                painter.circle_stroke(center, PERSON_HALF_SIZE + 2.0, ring);
            }
        }
    }
    if person.caregiver {
        painter.circle_filled(center + egui::vec2(15.0, -15.0), 5.0, CAREGIVER_DOT);
    }
    if person.deceased {
        let cross = egui::Stroke::new(2.0, egui::Color32::WHITE);
        painter.line_segment(
            [center + egui::vec2(-15.0, -15.0), center + egui::vec2(15.0, 15.0)],
            cross,
        );
        painter.line_segment(
            [center + egui::vec2(-15.0, 15.0), center + egui::vec2(15.0, -15.0)],
            cross,
        );
    }
}
