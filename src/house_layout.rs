use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point};
use crate::history::History;

pub const GRID_SIZE: f32 = 20.0;
pub const MIN_ITEM_WIDTH: f32 = 30.0;
pub const MIN_ITEM_HEIGHT: f32 = 20.0;
/// Side of the square resize handle in the bottom-right item corner.
pub const RESIZE_HANDLE_SIZE: f32 = 10.0;
/// Height of a note's hit box, anchored at `Note::pos` (top-left).
pub const NOTE_HEIGHT: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Bed,
    Sofa,
    Chair,
    Table,
    Tv,
    Door,
    Window,
    Stairs,
    Bath,
    Kitchen,
    Ramp,
    Handrail,
    Hazard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemCategory {
    Furniture,
    Fixture,
    Safety,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 3] = [
        ItemCategory::Furniture,
        ItemCategory::Fixture,
        ItemCategory::Safety,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Furniture => "Furniture",
            ItemCategory::Fixture => "Fixtures",
            ItemCategory::Safety => "Care & safety",
        }
    }
}

impl ItemKind {
    pub const ALL: [ItemKind; 13] = [
        ItemKind::Bed,
        ItemKind::Sofa,
        ItemKind::Chair,
        ItemKind::Table,
        ItemKind::Tv,
        ItemKind::Door,
        ItemKind::Window,
        ItemKind::Stairs,
        ItemKind::Bath,
        ItemKind::Kitchen,
        ItemKind::Ramp,
        ItemKind::Handrail,
        ItemKind::Hazard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Bed => "Bed",
            ItemKind::Sofa => "Sofa",
            ItemKind::Chair => "Chair",
            ItemKind::Table => "Table",
            ItemKind::Tv => "TV",
            ItemKind::Door => "Door",
            ItemKind::Window => "Window",
            ItemKind::Stairs => "Stairs",
            ItemKind::Bath => "Bathtub",
            ItemKind::Kitchen => "Kitchen",
            ItemKind::Ramp => "Ramp",
            ItemKind::Handrail => "Handrail",
            ItemKind::Hazard => "Hazard spot",
        }
    }

    pub fn category(self) -> ItemCategory {
        match self {
            ItemKind::Bed
            | ItemKind::Sofa
            | ItemKind::Chair
            | ItemKind::Table
            | ItemKind::Tv => ItemCategory::Furniture,
            ItemKind::Door
            | ItemKind::Window
            | ItemKind::Stairs
            | ItemKind::Bath
            | ItemKind::Kitchen => ItemCategory::Fixture,
            ItemKind::Ramp | ItemKind::Handrail | ItemKind::Hazard => ItemCategory::Safety,
        }
    }

    pub fn default_size(self) -> (f32, f32) {
        match self {
            ItemKind::Bed => (80.0, 160.0),
            ItemKind::Sofa => (120.0, 60.0),
            ItemKind::Chair => (40.0, 40.0),
            ItemKind::Table => (80.0, 80.0),
            ItemKind::Tv => (60.0, 20.0),
            ItemKind::Door => (20.0, 60.0),
            ItemKind::Window => (60.0, 20.0),
            ItemKind::Stairs => (80.0, 120.0),
            ItemKind::Bath => (120.0, 80.0),
            ItemKind::Kitchen => (100.0, 60.0),
            ItemKind::Ramp => (100.0, 40.0),
            ItemKind::Handrail => (80.0, 10.0),
            ItemKind::Hazard => (30.0, 30.0),
        }
    }

    pub fn color(self) -> egui::Color32 {
        match self {
            ItemKind::Bed => egui::Color32::from_rgb(0x8b, 0x5c, 0xf6),
            ItemKind::Sofa => egui::Color32::from_rgb(0x06, 0xb6, 0xd4),
            ItemKind::Chair => egui::Color32::from_rgb(0x10, 0xb9, 0x81),
            ItemKind::Table => egui::Color32::from_rgb(0xf5, 0x9e, 0x0b),
            ItemKind::Tv => egui::Color32::from_rgb(0x37, 0x41, 0x51),
            ItemKind::Door => egui::Color32::from_rgb(0x92, 0x40, 0x0e),
            ItemKind::Window => egui::Color32::from_rgb(0x3b, 0x82, 0xf6),
            ItemKind::Stairs => egui::Color32::from_rgb(0x6b, 0x72, 0x80),
            ItemKind::Bath => egui::Color32::from_rgb(0x0e, 0xa5, 0xe9),
            ItemKind::Kitchen => egui::Color32::from_rgb(0xdc, 0x26, 0x26),
            ItemKind::Ramp => egui::Color32::from_rgb(0x16, 0xa3, 0x4a),
            ItemKind::Handrail => egui::Color32::from_rgb(0xca, 0x8a, 0x04),
            ItemKind::Hazard => egui::Color32::from_rgb(0xdc, 0x26, 0x26),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub kind: ItemKind,
    /// Top-left corner, kept on the grid.
    pub pos: Point,
    pub width: f32,
    pub height: f32,
    /// One of 0, 90, 180, 270. Rotating also swaps width and height, so
    /// the stored rect is always axis aligned.
    pub rotation: u16,
    pub notes: String,
    pub z: i32,
}

impl Item {
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.pos.to_pos2(), egui::vec2(self.width, self.height))
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.rect().contains(pos.to_pos2())
    }

    pub fn resize_handle_rect(&self) -> egui::Rect {
        let max = self.rect().max;
        egui::Rect::from_min_size(
            egui::pos2(max.x - RESIZE_HANDLE_SIZE, max.y - RESIZE_HANDLE_SIZE),
            egui::vec2(RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: u64,
    pub start: Point,
    pub end: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub pos: Point,
    pub text: String,
}

impl Note {
    pub fn rect(&self, width: f32) -> egui::Rect {
        egui::Rect::from_min_size(self.pos.to_pos2(), egui::vec2(width, NOTE_HEIGHT))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseScene {
    pub items: Vec<Item>,
    pub walls: Vec<Wall>,
    pub notes: Vec<Note>,
}

impl HouseScene {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.walls.is_empty() && self.notes.is_empty()
    }

    pub fn item(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: u64) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn note(&self, id: u64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: u64) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Item indices back to front. Ascending z, ties keep insertion order,
    /// so later insertions draw on top of equal-z items. Hit-testing walks
    /// this in reverse so it always agrees with what is painted.
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&i| self.items[i].z);
        order
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Select,
    Wall,
    Note,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Select, Tool::Wall, Tool::Note];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Wall => "Wall",
            Tool::Note => "Note",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum InProgress {
    Drag {
        id: u64,
        grab: Point,
        recorded: bool,
    },
    Resize {
        id: u64,
        recorded: bool,
    },
    /// First wall endpoint is fixed, second follows the pointer until the
    /// next press commits it.
    Wall {
        start: Point,
        current: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Template {
    House,
    ThreeLdk,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::House, Template::ThreeLdk];

    pub fn label(self) -> &'static str {
        match self {
            Template::House => "Detached house",
            Template::ThreeLdk => "3LDK apartment",
        }
    }
}

#[derive(Clone)]
pub struct Snapshot {
    scene: HouseScene,
    next_id: u64,
}

pub struct HouseLayoutEditor {
    pub scene: HouseScene,
    pub selected: Option<u64>,
    pub history: History<Snapshot>,
    pub next_id: u64,
    pub tool: Tool,
    pub in_progress: Option<InProgress>,
}

impl Default for HouseLayoutEditor {
    fn default() -> Self {
        Self {
            scene: HouseScene::default(),
            selected: None,
            history: History::default(),
            next_id: 1,
            tool: Tool::Select,
            in_progress: None,
        }
    }
}

impl HouseLayoutEditor {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            scene: self.scene.clone(),
            next_id: self.next_id,
        }
    }

    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    pub fn undo(&mut self) {
        let Some(prev) = self.history.undo() else {
            return;
        };
        self.scene = prev.scene;
        self.next_id = prev.next_id;
        self.selected = None;
        self.in_progress = None;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.tool = tool;
            self.in_progress = None;
        }
    }

    pub fn spawn_pos(&self) -> Point {
        let i = self.scene.items.len();
        Point::new(
            100.0 + 40.0 * ((i % 6) as f32),
            100.0 + 40.0 * ((i / 6 % 6) as f32),
        )
    }

    pub fn add_item(&mut self, kind: ItemKind, pos: Point) -> u64 {
        self.push_undo();
        let id = self.allocate_id();
        let (width, height) = kind.default_size();
        let z = self.scene.items.iter().map(|i| i.z).max().map_or(0, |z| z + 1);
        self.scene.items.push(Item {
            id,
            kind,
            pos: geometry::snap_point(pos, GRID_SIZE),
            width,
            height,
            rotation: 0,
            notes: String::new(),
            z,
        });
        self.selected = Some(id);
        id
    }

    pub fn add_note(&mut self, pos: Point, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.push_undo();
        let id = self.allocate_id();
        self.scene.notes.push(Note {
            id,
            pos: geometry::snap_point(pos, GRID_SIZE),
            text: text.to_string(),
        });
        self.selected = Some(id);
    }

    /// Swaps width and height and advances the rotation by a quarter turn.
    pub fn rotate_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        if self.scene.item(id).is_none() {
            return;
        }
        self.push_undo();
        if let Some(item) = self.scene.item_mut(id) {
            std::mem::swap(&mut item.width, &mut item.height);
            item.rotation = (item.rotation + 90) % 360;
        }
    }

    pub fn bring_selected_to_front(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(item) = self.scene.item(id) else {
            return;
        };
        let Some(top) = self
            .scene
            .items
            .iter()
            .filter(|i| i.id != id)
            .map(|i| i.z)
            .max()
        else {
            return;
        };
        if item.z > top {
            return;
        }
        self.push_undo();
        if let Some(item) = self.scene.item_mut(id) {
            item.z = top + 1;
        }
    }

    pub fn send_selected_to_back(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(item) = self.scene.item(id) else {
            return;
        };
        let Some(bottom) = self
            .scene
            .items
            .iter()
            .filter(|i| i.id != id)
            .map(|i| i.z)
            .min()
        else {
            return;
        };
        if item.z < bottom {
            return;
        }
        self.push_undo();
        if let Some(item) = self.scene.item_mut(id) {
            item.z = bottom - 1;
        }
    }

    /// Replaces items and walls with a preset layout. Notes are kept.
    pub fn load_template(&mut self, template: Template) {
        self.push_undo();
        self.scene.items.clear();
        self.scene.walls.clear();
        self.selected = None;
        self.in_progress = None;

        let (items, walls): (&[(ItemKind, f32, f32)], &[(f32, f32, f32, f32)]) = match template {
            Template::House => (
                &[
                    (ItemKind::Door, 200.0, 100.0),
                    (ItemKind::Window, 300.0, 80.0),
                    (ItemKind::Bed, 120.0, 200.0),
                    (ItemKind::Table, 300.0, 250.0),
                    (ItemKind::Sofa, 400.0, 200.0),
                ],
                &[
                    (100.0, 100.0, 500.0, 100.0),
                    (500.0, 100.0, 500.0, 400.0),
                    (500.0, 400.0, 100.0, 400.0),
                    (100.0, 400.0, 100.0, 100.0),
                ],
            ),
            Template::ThreeLdk => (
                &[
                    (ItemKind::Bed, 120.0, 120.0),
                    (ItemKind::Bed, 320.0, 120.0),
                    (ItemKind::Bed, 520.0, 120.0),
                    (ItemKind::Sofa, 200.0, 350.0),
                    (ItemKind::Table, 350.0, 350.0),
                    (ItemKind::Kitchen, 500.0, 350.0),
                ],
                &[
                    (100.0, 100.0, 650.0, 100.0),
                    (650.0, 100.0, 650.0, 450.0),
                    (650.0, 450.0, 100.0, 450.0),
                    (100.0, 450.0, 100.0, 100.0),
                    (250.0, 100.0, 250.0, 300.0),
                    (450.0, 100.0, 450.0, 300.0),
                ],
            ),
        };
        for (z, (kind, x, y)) in items.iter().enumerate() {
            let id = self.allocate_id();
            let (width, height) = kind.default_size();
            self.scene.items.push(Item {
                id,
                kind: *kind,
                pos: Point::new(*x, *y),
                width,
                height,
                rotation: 0,
                notes: String::new(),
                z: z as i32,
            });
        }
        for (sx, sy, ex, ey) in walls {
            let id = self.allocate_id();
            self.scene.walls.push(Wall {
                id,
                start: Point::new(*sx, *sy),
                end: Point::new(*ex, *ey),
            });
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        if self.scene.item(id).is_none() && self.scene.note(id).is_none() {
            self.selected = None;
            return;
        }
        self.push_undo();
        self.scene.items.retain(|i| i.id != id);
        self.scene.notes.retain(|n| n.id != id);
        self.selected = None;
        self.in_progress = None;
    }

    pub fn clear_all(&mut self) {
        if self.scene.is_empty() {
            return;
        }
        self.push_undo();
        self.scene = HouseScene::default();
        self.selected = None;
        self.in_progress = None;
    }

    /// Topmost item under the raw pointer position. Hit-testing is not
    /// snapped, only committed coordinates are.
    pub fn hit_test_item(&self, pos: Point) -> Option<u64> {
        let order = self.scene.draw_order();
        order
            .iter()
            .rev()
            .map(|&i| &self.scene.items[i])
            .find(|item| item.contains(pos))
            .map(|item| item.id)
    }

    /// Notes draw above items, so they hit first. `measure` supplies the
    /// rendered text width.
    pub fn hit_test_note(&self, pos: Point, measure: impl Fn(&str) -> f32) -> Option<u64> {
        self.scene
            .notes
            .iter()
            .rev()
            .find(|n| n.rect(measure(&n.text)).contains(pos.to_pos2()))
            .map(|n| n.id)
    }

    pub fn pointer_pressed(&mut self, pos: Point, measure: impl Fn(&str) -> f32) {
        match self.tool {
            Tool::Wall => {
                let snapped = geometry::snap_point(pos, GRID_SIZE);
                if let Some(InProgress::Wall { start, .. }) = self.in_progress {
                    self.in_progress = None;
                    if start != snapped {
                        self.push_undo();
                        let id = self.allocate_id();
                        self.scene.walls.push(Wall {
                            id,
                            start,
                            end: snapped,
                        });
                    }
                } else {
                    self.in_progress = Some(InProgress::Wall {
                        start: snapped,
                        current: snapped,
                    });
                }
            }
            // Note placement goes through the text prompt, which calls
            // add_note on confirm.
            Tool::Note => {}
            Tool::Select => {
                if let Some(id) = self.hit_test_note(pos, measure) {
                    if let Some(note) = self.scene.note(id) {
                        let grab = Point::new(pos.x - note.pos.x, pos.y - note.pos.y);
                        self.selected = Some(id);
                        self.in_progress = Some(InProgress::Drag {
                            id,
                            grab,
                            recorded: false,
                        });
                    }
                    return;
                }
                if let Some(id) = self.hit_test_item(pos) {
                    let was_selected = self.selected == Some(id);
                    self.selected = Some(id);
                    if let Some(item) = self.scene.item(id) {
                        if was_selected && item.resize_handle_rect().contains(pos.to_pos2()) {
                            self.in_progress = Some(InProgress::Resize {
                                id,
                                recorded: false,
                            });
                        } else {
                            let grab = Point::new(pos.x - item.pos.x, pos.y - item.pos.y);
                            self.in_progress = Some(InProgress::Drag {
                                id,
                                grab,
                                recorded: false,
                            });
                        }
                    }
                    return;
                }
                self.selected = None;
            }
        }
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        match self.in_progress {
            Some(InProgress::Drag { id, grab, recorded }) => {
                if self.scene.item(id).is_none() && self.scene.note(id).is_none() {
                    self.in_progress = None;
                    return;
                }
                if !recorded {
                    self.push_undo();
                    self.in_progress = Some(InProgress::Drag {
                        id,
                        grab,
                        recorded: true,
                    });
                }
                let target = geometry::snap_point(
                    Point::new(pos.x - grab.x, pos.y - grab.y),
                    GRID_SIZE,
                );
                if let Some(item) = self.scene.item_mut(id) {
                    item.pos = target;
                } else if let Some(note) = self.scene.note_mut(id) {
                    note.pos = target;
                }
            }
            Some(InProgress::Resize { id, recorded }) => {
                if self.scene.item(id).is_none() {
                    self.in_progress = None;
                    return;
                }
                if !recorded {
                    self.push_undo();
                    self.in_progress = Some(InProgress::Resize { id, recorded: true });
                }
                if let Some(item) = self.scene.item_mut(id) {
                    item.width = (pos.x - item.pos.x).max(MIN_ITEM_WIDTH);
                    item.height = (pos.y - item.pos.y).max(MIN_ITEM_HEIGHT);
                }
            }
            Some(InProgress::Wall { start, .. }) => {
                self.in_progress = Some(InProgress::Wall {
                    start,
                    current: geometry::snap_point(pos, GRID_SIZE),
                });
            }
            None => {}
        }
    }

    /// Ends drags and resizes. A pending wall survives release, it is a
    /// two-press gesture.
    pub fn pointer_released(&mut self) {
        match self.in_progress {
            Some(InProgress::Wall { .. }) | None => {}
            _ => self.in_progress = None,
        }
    }

    pub fn cancel(&mut self) {
        self.in_progress = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEASURE: fn(&str) -> f32 = |_| 60.0;

    #[test]
    fn add_item_snaps_position_and_selects() {
        let mut editor = HouseLayoutEditor::default();
        let id = editor.add_item(ItemKind::Bed, Point::new(107.0, 93.0));
        assert_eq!(editor.selected, Some(id));
        let item = editor.scene.item(id).unwrap();
        assert_eq!(item.pos, Point::new(100.0, 100.0));
        assert_eq!((item.width, item.height), (80.0, 160.0));
        assert_eq!(item.rotation, 0);
    }

    #[test]
    fn rotate_swaps_size_and_undo_restores_both() {
        let mut editor = HouseLayoutEditor::default();
        let id = editor.add_item(ItemKind::Bed, Point::new(100.0, 100.0));
        editor.rotate_selected();
        {
            let item = editor.scene.item(id).unwrap();
            assert_eq!((item.width, item.height), (160.0, 80.0));
            assert_eq!(item.rotation, 90);
        }
        editor.undo();
        let item = editor.scene.item(id).unwrap();
        assert_eq!((item.width, item.height), (80.0, 160.0));
        assert_eq!(item.rotation, 0);
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn rotation_wraps_after_four_turns() {
        let mut editor = HouseLayoutEditor::default();
        let id = editor.add_item(ItemKind::Sofa, Point::new(0.0, 0.0));
        for _ in 0..4 {
            editor.rotate_selected();
        }
        assert_eq!(editor.scene.item(id).unwrap().rotation, 0);
    }

    #[test]
    fn drag_snaps_committed_position() {
        let mut editor = HouseLayoutEditor::default();
        let id = editor.add_item(ItemKind::Table, Point::new(100.0, 100.0));
        editor.pointer_pressed(Point::new(110.0, 110.0), MEASURE);
        editor.pointer_moved(Point::new(137.0, 133.0));
        editor.pointer_released();
        assert_eq!(editor.scene.item(id).unwrap().pos, Point::new(120.0, 120.0));
    }

    #[test]
    fn drag_snapshots_once_on_first_move() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Table, Point::new(100.0, 100.0));
        let depth = editor.history.len();
        editor.pointer_pressed(Point::new(110.0, 110.0), MEASURE);
        editor.pointer_moved(Point::new(150.0, 150.0));
        editor.pointer_moved(Point::new(210.0, 190.0));
        editor.pointer_released();
        assert_eq!(editor.history.len(), depth + 1);
    }

    #[test]
    fn click_without_move_consumes_no_history() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Table, Point::new(100.0, 100.0));
        let depth = editor.history.len();
        editor.pointer_pressed(Point::new(110.0, 110.0), MEASURE);
        editor.pointer_released();
        assert_eq!(editor.history.len(), depth);
    }

    #[test]
    fn resize_needs_prior_selection_and_clamps_to_floor() {
        let mut editor = HouseLayoutEditor::default();
        let id = editor.add_item(ItemKind::Bed, Point::new(100.0, 100.0));
        // bottom-right corner of the 80x160 bed is (180, 260)
        editor.pointer_pressed(Point::new(175.0, 255.0), MEASURE);
        assert!(matches!(
            editor.in_progress,
            Some(InProgress::Resize { .. })
        ));
        editor.pointer_moved(Point::new(110.0, 105.0));
        {
            let item = editor.scene.item(id).unwrap();
            assert_eq!((item.width, item.height), (MIN_ITEM_WIDTH, MIN_ITEM_HEIGHT));
        }
        editor.pointer_moved(Point::new(305.0, 403.0));
        editor.pointer_released();
        let item = editor.scene.item(id).unwrap();
        assert_eq!((item.width, item.height), (205.0, 303.0));
    }

    #[test]
    fn corner_press_on_unselected_item_drags_instead_of_resizing() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Bed, Point::new(100.0, 100.0));
        editor.selected = None;
        editor.pointer_pressed(Point::new(175.0, 255.0), MEASURE);
        assert!(matches!(editor.in_progress, Some(InProgress::Drag { .. })));
    }

    #[test]
    fn wall_commits_on_second_press_with_snapped_endpoints() {
        let mut editor = HouseLayoutEditor::default();
        editor.set_tool(Tool::Wall);
        editor.pointer_pressed(Point::new(103.0, 97.0), MEASURE);
        editor.pointer_released();
        assert!(matches!(editor.in_progress, Some(InProgress::Wall { .. })));
        editor.pointer_pressed(Point::new(298.0, 305.0), MEASURE);
        editor.pointer_released();
        assert_eq!(editor.scene.walls.len(), 1);
        let wall = &editor.scene.walls[0];
        assert_eq!(wall.start, Point::new(100.0, 100.0));
        assert_eq!(wall.end, Point::new(300.0, 300.0));
        assert!(editor.in_progress.is_none());
    }

    #[test]
    fn zero_length_wall_is_discarded() {
        let mut editor = HouseLayoutEditor::default();
        editor.set_tool(Tool::Wall);
        editor.pointer_pressed(Point::new(103.0, 97.0), MEASURE);
        editor.pointer_pressed(Point::new(101.0, 99.0), MEASURE);
        assert!(editor.scene.walls.is_empty());
        assert!(editor.history.is_empty());
        assert!(editor.in_progress.is_none());
    }

    #[test]
    fn switching_tools_cancels_pending_wall() {
        let mut editor = HouseLayoutEditor::default();
        editor.set_tool(Tool::Wall);
        editor.pointer_pressed(Point::new(100.0, 100.0), MEASURE);
        editor.set_tool(Tool::Select);
        assert!(editor.in_progress.is_none());
    }

    #[test]
    fn hit_test_matches_z_order() {
        let mut editor = HouseLayoutEditor::default();
        let bottom = editor.add_item(ItemKind::Table, Point::new(100.0, 100.0));
        let top = editor.add_item(ItemKind::Table, Point::new(120.0, 120.0));
        assert_eq!(editor.hit_test_item(Point::new(140.0, 140.0)), Some(top));

        editor.selected = Some(top);
        editor.send_selected_to_back();
        assert_eq!(editor.hit_test_item(Point::new(140.0, 140.0)), Some(bottom));

        editor.selected = Some(top);
        editor.bring_selected_to_front();
        assert_eq!(editor.hit_test_item(Point::new(140.0, 140.0)), Some(top));
    }

    #[test]
    fn reorder_with_single_item_consumes_no_history() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Chair, Point::new(0.0, 0.0));
        let depth = editor.history.len();
        editor.bring_selected_to_front();
        editor.send_selected_to_back();
        assert_eq!(editor.history.len(), depth);
    }

    #[test]
    fn notes_hit_above_items_and_drag_snapped() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Bath, Point::new(100.0, 100.0));
        editor.add_note(Point::new(120.0, 120.0), "no step here");
        let note_id = editor.scene.notes[0].id;

        editor.pointer_pressed(Point::new(150.0, 130.0), MEASURE);
        assert_eq!(editor.selected, Some(note_id));
        editor.pointer_moved(Point::new(333.0, 222.0));
        editor.pointer_released();
        // grab offset (30, 10), snapped from (303, 212)
        assert_eq!(editor.scene.notes[0].pos, Point::new(300.0, 220.0));
    }

    #[test]
    fn blank_note_text_is_rejected() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_note(Point::new(0.0, 0.0), "   ");
        assert!(editor.scene.notes.is_empty());
        assert!(editor.history.is_empty());
    }

    #[test]
    fn delete_removes_selected_note() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_note(Point::new(0.0, 0.0), "watch the rug");
        editor.delete_selected();
        assert!(editor.scene.notes.is_empty());
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn template_allocates_fresh_ids_and_keeps_notes() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_note(Point::new(40.0, 40.0), "entry rail");
        editor.load_template(Template::House);
        assert_eq!(editor.scene.items.len(), 5);
        assert_eq!(editor.scene.walls.len(), 4);
        assert_eq!(editor.scene.notes.len(), 1);

        let first_ids: Vec<u64> = editor.scene.items.iter().map(|i| i.id).collect();
        editor.load_template(Template::House);
        let second_ids: Vec<u64> = editor.scene.items.iter().map(|i| i.id).collect();
        for id in &second_ids {
            assert!(!first_ids.contains(id));
        }
    }

    #[test]
    fn template_load_is_one_undo_step() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Tv, Point::new(200.0, 200.0));
        let before = editor.scene.clone();
        editor.load_template(Template::ThreeLdk);
        assert_eq!(editor.scene.items.len(), 6);
        editor.undo();
        assert_eq!(editor.scene, before);
    }

    #[test]
    fn press_on_empty_space_clears_selection() {
        let mut editor = HouseLayoutEditor::default();
        editor.add_item(ItemKind::Chair, Point::new(100.0, 100.0));
        editor.pointer_pressed(Point::new(400.0, 400.0), MEASURE);
        assert_eq!(editor.selected, None);
        assert!(editor.in_progress.is_none());
    }
}
