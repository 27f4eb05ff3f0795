use eframe::egui;

mod body_view;
mod export;
mod genogram_view;
mod help;
mod house_view;
mod settings;
mod update;

use crate::body_chart::BodyChartEditor;
use crate::genogram::GenogramEditor;
use crate::geometry::Point;
use crate::house_layout::HouseLayoutEditor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Genogram,
    BodyChart,
    HouseLayout,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Genogram, Tab::BodyChart, Tab::HouseLayout];

    fn label(self) -> &'static str {
        match self {
            Tab::Genogram => "Genogram",
            Tab::BodyChart => "Body chart",
            Tab::HouseLayout => "House layout",
        }
    }

    fn export_file_name(self) -> &'static str {
        match self {
            Tab::Genogram => "genogram.png",
            Tab::BodyChart => "body_chart.png",
            Tab::HouseLayout => "house_layout.png",
        }
    }
}

/// Text entry for a new house note, anchored where the canvas was pressed.
struct NotePrompt {
    pos: Point,
    text: String,
}

pub struct CareApp {
    tab: Tab,
    genogram: GenogramEditor,
    body_chart: BodyChartEditor,
    house: HouseLayoutEditor,
    show_grid: bool,
    palette_query: String,
    settings_path: String,
    status: Option<String>,
    show_help: bool,
    confirm_clear: Option<Tab>,
    note_prompt: Option<NotePrompt>,
    pending_export: Option<Tab>,
    /// Screen rect of the active canvas, refreshed every frame and used to
    /// crop the export screenshot.
    canvas_rect: Option<egui::Rect>,
}

impl CareApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home)
                .join(".config")
                .join("caresketch.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_settings(&settings_path)
            .or_else(|| settings::load_settings("settings.json"))
            .unwrap_or_default();
        log::info!("using settings from {settings_path}");

        Self {
            tab: Tab::Genogram,
            genogram: GenogramEditor::default(),
            body_chart: BodyChartEditor::default(),
            house: HouseLayoutEditor::default(),
            show_grid: settings.show_grid,
            palette_query: String::new(),
            settings_path,
            status: None,
            show_help: false,
            confirm_clear: None,
            note_prompt: None,
            pending_export: None,
            canvas_rect: None,
        }
    }

    fn persist_settings(&mut self) {
        let settings = settings::AppSettings {
            show_grid: self.show_grid,
        };
        if let Err(e) = settings::save_settings(&self.settings_path, &settings) {
            log::warn!("failed to save settings to {}: {e}", self.settings_path);
            self.status = Some(format!("Failed to save settings: {e}"));
        }
    }

    fn undo_active(&mut self) {
        match self.tab {
            Tab::Genogram => self.genogram.undo(),
            Tab::BodyChart => self.body_chart.undo(),
            Tab::HouseLayout => self.house.undo(),
        }
    }

    fn delete_active(&mut self) {
        match self.tab {
            Tab::Genogram => self.genogram.delete_selected(),
            Tab::BodyChart => self.body_chart.delete_selected(),
            Tab::HouseLayout => self.house.delete_selected(),
        }
    }

    fn cancel_active(&mut self) {
        match self.tab {
            Tab::Genogram => self.genogram.cancel(),
            Tab::BodyChart => self.body_chart.cancel(),
            Tab::HouseLayout => self.house.cancel(),
        }
    }

    fn clear_scene(&mut self, tab: Tab) {
        match tab {
            Tab::Genogram => self.genogram.clear_all(),
            Tab::BodyChart => self.body_chart.clear_all(),
            Tab::HouseLayout => self.house.clear_all(),
        }
    }
}

const CANVAS_FILL: egui::Color32 = egui::Color32::WHITE;
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);

/// Scene coordinates are canvas-local, screen position is offset by the
/// canvas origin.
fn canvas_pos(origin: egui::Pos2, p: Point) -> egui::Pos2 {
    origin + egui::vec2(p.x, p.y)
}

fn draw_dashed_line(
    painter: &egui::Painter,
    a: egui::Pos2,
    b: egui::Pos2,
    stroke: egui::Stroke,
    dash_len: f32,
    gap_len: f32,
) {
    let delta = b - a;
    let len = delta.length();
    if len <= f32::EPSILON {
        return;
    }
    let dir = delta / len;
    let mut dist = 0.0;
    while dist < len {
        let end = (dist + dash_len).min(len);
        painter.line_segment([a + dir * dist, a + dir * end], stroke);
        dist = end + gap_len;
    }
}
