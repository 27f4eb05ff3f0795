use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point};
use crate::history::History;

/// Press within this distance of any path segment selects the marker.
pub const MARKER_HIT_DISTANCE: f32 = 15.0;

pub const PRESSURE_SORE_STAGES: [&str; 5] = [
    "Stage I",
    "Stage II",
    "Stage III",
    "Stage IV",
    "Suspected DTI",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    PressureSore,
    Paralysis,
    Amputation,
    ReducedFunction,
    Comment,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 5] = [
        MarkerKind::PressureSore,
        MarkerKind::Paralysis,
        MarkerKind::Amputation,
        MarkerKind::ReducedFunction,
        MarkerKind::Comment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::PressureSore => "Pressure sore",
            MarkerKind::Paralysis => "Paralysis",
            MarkerKind::Amputation => "Amputation",
            MarkerKind::ReducedFunction => "Reduced function",
            MarkerKind::Comment => "Comment",
        }
    }

    pub fn color(self) -> egui::Color32 {
        match self {
            MarkerKind::PressureSore => egui::Color32::from_rgb(0xdc, 0x26, 0x26),
            MarkerKind::Paralysis => egui::Color32::from_rgb(0x7c, 0x3a, 0xed),
            MarkerKind::Amputation => egui::Color32::from_rgb(0x05, 0x96, 0x69),
            MarkerKind::ReducedFunction => egui::Color32::from_rgb(0xd9, 0x77, 0x06),
            MarkerKind::Comment => egui::Color32::from_rgb(0x6b, 0x72, 0x80),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    pub fn label(self) -> &'static str {
        match self {
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

/// Common pressure-injury site, drawn as a dashed highlight on the back
/// figure. Coordinates are in the same scene space as marker paths.
pub struct Hotspot {
    pub pos: Point,
    pub radius: f32,
    pub label: &'static str,
}

pub const PRESSURE_HOTSPOTS: [Hotspot; 5] = [
    Hotspot {
        pos: Point { x: 450.0, y: 140.0 },
        radius: 20.0,
        label: "Shoulder blade",
    },
    Hotspot {
        pos: Point { x: 450.0, y: 280.0 },
        radius: 25.0,
        label: "Sacrum",
    },
    Hotspot {
        pos: Point { x: 450.0, y: 190.0 },
        radius: 15.0,
        label: "Elbow",
    },
    Hotspot {
        pos: Point { x: 450.0, y: 550.0 },
        radius: 20.0,
        label: "Heel",
    },
    Hotspot {
        pos: Point { x: 200.0, y: 450.0 },
        radius: 20.0,
        label: "Greater trochanter",
    },
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: u64,
    pub kind: MarkerKind,
    pub path: Vec<Point>,
    pub text: String,
    /// Only meaningful for pressure sores, empty otherwise.
    pub stage: String,
    pub severity: Severity,
    pub notes: String,
}

impl Marker {
    pub fn centroid(&self) -> Point {
        geometry::path_centroid(&self.path)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyChartScene {
    pub markers: Vec<Marker>,
}

impl BodyChartScene {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, id: u64) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn marker_mut(&mut self, id: u64) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }
}

#[derive(Clone)]
pub struct Snapshot {
    scene: BodyChartScene,
    next_id: u64,
}

pub struct BodyChartEditor {
    pub scene: BodyChartScene,
    pub selected: Option<u64>,
    pub history: History<Snapshot>,
    pub next_id: u64,
    pub active_kind: MarkerKind,
    /// Freehand path being drawn, present between press and release.
    pub current_path: Option<Vec<Point>>,
}

impl Default for BodyChartEditor {
    fn default() -> Self {
        Self {
            scene: BodyChartScene::default(),
            selected: None,
            history: History::default(),
            next_id: 1,
            active_kind: MarkerKind::PressureSore,
            current_path: None,
        }
    }
}

impl BodyChartEditor {
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
        self.current_path = None;
    }

    /// Topmost marker whose outline passes near `pos`, last drawn wins.
    pub fn hit_test(&self, pos: Point) -> Option<u64> {
        self.scene
            .markers
            .iter()
            .rev()
            .find(|m| geometry::distance_to_path(pos, &m.path) <= MARKER_HIT_DISTANCE)
            .map(|m| m.id)
    }

    pub fn pointer_pressed(&mut self, pos: Point) {
        if let Some(id) = self.hit_test(pos) {
            self.selected = Some(id);
            return;
        }
        self.selected = None;
        self.current_path = Some(vec![pos]);
    }

    pub fn pointer_moved(&mut self, pos: Point) {
        if let Some(path) = &mut self.current_path {
            if path.last() != Some(&pos) {
                path.push(pos);
            }
        }
    }

    /// Commits the in-progress path as a marker of the active kind. Paths
    /// with fewer than two points are discarded without touching history.
    pub fn pointer_released(&mut self) {
        let Some(path) = self.current_path.take() else {
            return;
        };
        if path.len() < 2 {
            return;
        }
        self.push_undo();
        let id = self.allocate_id();
        let stage = if self.active_kind == MarkerKind::PressureSore {
            PRESSURE_SORE_STAGES[0].to_string()
        } else {
            String::new()
        };
        self.scene.markers.push(Marker {
            id,
            kind: self.active_kind,
            path,
            text: String::new(),
            stage,
            severity: Severity::Mild,
            notes: String::new(),
        });
        self.selected = Some(id);
    }

    pub fn cancel(&mut self) {
        self.current_path = None;
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        if self.scene.marker(id).is_none() {
            self.selected = None;
            return;
        }
        self.push_undo();
        self.scene.markers.retain(|m| m.id != id);
        self.selected = None;
    }

    pub fn clear_all(&mut self) {
        if self.scene.is_empty() {
            return;
        }
        self.push_undo();
        self.scene = BodyChartScene::default();
        self.selected = None;
        self.current_path = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_marker(editor: &mut BodyChartEditor, points: &[(f32, f32)]) -> Option<u64> {
        let mut iter = points.iter();
        let first = iter.next().copied().unwrap_or((0.0, 0.0));
        editor.pointer_pressed(Point::new(first.0, first.1));
        for (x, y) in iter {
            editor.pointer_moved(Point::new(*x, *y));
        }
        editor.pointer_released();
        editor.selected
    }

    #[test]
    fn freehand_commit_selects_new_marker() {
        let mut editor = BodyChartEditor::default();
        let id = draw_marker(&mut editor, &[(10.0, 10.0), (40.0, 10.0), (40.0, 40.0)]);
        assert!(id.is_some());
        assert_eq!(editor.scene.markers.len(), 1);
        assert_eq!(editor.scene.markers[0].path.len(), 3);
        assert_eq!(editor.history.len(), 1);
    }

    #[test]
    fn single_point_click_is_discarded_without_history() {
        let mut editor = BodyChartEditor::default();
        editor.pointer_pressed(Point::new(10.0, 10.0));
        editor.pointer_released();
        assert!(editor.scene.markers.is_empty());
        assert!(editor.history.is_empty());
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn duplicate_move_samples_are_collapsed() {
        let mut editor = BodyChartEditor::default();
        editor.pointer_pressed(Point::new(10.0, 10.0));
        editor.pointer_moved(Point::new(10.0, 10.0));
        editor.pointer_moved(Point::new(20.0, 10.0));
        editor.pointer_moved(Point::new(20.0, 10.0));
        editor.pointer_released();
        assert_eq!(editor.scene.markers[0].path.len(), 2);
    }

    #[test]
    fn hit_counts_segment_interiors_not_just_vertices() {
        let mut editor = BodyChartEditor::default();
        let id = draw_marker(&mut editor, &[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(editor.hit_test(Point::new(50.0, 10.0)), id);
        assert_eq!(editor.hit_test(Point::new(50.0, 20.0)), None);
    }

    #[test]
    fn press_on_marker_selects_instead_of_drawing() {
        let mut editor = BodyChartEditor::default();
        let id = draw_marker(&mut editor, &[(0.0, 0.0), (100.0, 0.0)]);
        editor.selected = None;
        editor.pointer_pressed(Point::new(50.0, 5.0));
        assert_eq!(editor.selected, id);
        assert!(editor.current_path.is_none());
    }

    #[test]
    fn overlapping_markers_resolve_to_most_recent() {
        let mut editor = BodyChartEditor::default();
        draw_marker(&mut editor, &[(0.0, 0.0), (100.0, 0.0)]);
        let top = draw_marker(&mut editor, &[(0.0, 5.0), (100.0, 5.0)]);
        assert_eq!(editor.hit_test(Point::new(50.0, 2.0)), top);
    }

    #[test]
    fn pressure_sore_defaults_to_first_stage() {
        let mut editor = BodyChartEditor::default();
        draw_marker(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(editor.scene.markers[0].stage, "Stage I");

        editor.active_kind = MarkerKind::Paralysis;
        draw_marker(&mut editor, &[(0.0, 50.0), (10.0, 50.0)]);
        assert_eq!(editor.scene.markers[1].stage, "");
    }

    #[test]
    fn delete_selected_removes_only_that_marker() {
        let mut editor = BodyChartEditor::default();
        let first = draw_marker(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]);
        let second = draw_marker(&mut editor, &[(0.0, 50.0), (10.0, 50.0)]);
        editor.selected = first;
        editor.delete_selected();
        assert_eq!(editor.scene.markers.len(), 1);
        assert_eq!(Some(editor.scene.markers[0].id), second);
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn delete_with_no_selection_is_silent() {
        let mut editor = BodyChartEditor::default();
        draw_marker(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]);
        editor.selected = None;
        let depth = editor.history.len();
        editor.delete_selected();
        assert_eq!(editor.history.len(), depth);
        assert_eq!(editor.scene.markers.len(), 1);
    }

    #[test]
    fn undo_removes_committed_marker() {
        let mut editor = BodyChartEditor::default();
        draw_marker(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]);
        draw_marker(&mut editor, &[(0.0, 50.0), (10.0, 50.0)]);
        editor.undo();
        assert_eq!(editor.scene.markers.len(), 1);
        assert_eq!(editor.selected, None);
    }

    #[test]
    fn cancel_drops_path_without_committing() {
        let mut editor = BodyChartEditor::default();
        editor.pointer_pressed(Point::new(0.0, 0.0));
        editor.pointer_moved(Point::new(50.0, 0.0));
        editor.cancel();
        editor.pointer_released();
        assert!(editor.scene.markers.is_empty());
        assert!(editor.history.is_empty());
    }
}
