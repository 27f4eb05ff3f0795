use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(520.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();
                help_row(ui, "⌘Z", "Undo");
                help_row(ui, "Delete / Backspace", "Delete selected");
                help_row(ui, "Escape", "Cancel current gesture / close dialog");
                help_row(ui, "F1", "Toggle this window");

                ui.add_space(10.0);
                ui.heading("Genogram");
                ui.separator();
                ui.label("Add people from the side panel, then drag them into place.");
                ui.label("Shift-click (or ⌘-click) to select several people at once.");
                help_row(ui, "Marriage", "Select exactly two people");
                help_row(ui, "Parent-child", "Select both parents first, then the children");
                help_row(ui, "Household", "Select two or more people");
                ui.label("Edit names, ages and markers in the side panel while one person is selected.");

                ui.add_space(10.0);
                ui.heading("Body chart");
                ui.separator();
                ui.label("Pick a marker type, then draw on the figures with the mouse held down.");
                ui.label("A single click selects the marker under the pointer instead.");
                ui.label("Dashed circles on the back figure mark common pressure-injury sites.");

                ui.add_space(10.0);
                ui.heading("House layout");
                ui.separator();
                help_row(ui, "Select", "Move items, resize via the corner handle");
                help_row(ui, "Wall", "Click once for each endpoint");
                help_row(ui, "Note", "Click where the note should go");
                ui.label("Everything placed on the floor plan snaps to the 20 px grid.");
                ui.label("Drag the bottom-right corner of a selected item to resize it.");

                ui.add_space(10.0);
                ui.heading("Export");
                ui.separator();
                ui.label("Each tab has a Save image button that writes the canvas as a PNG file.");

                ui.add_space(10.0);
                ui.heading("Settings");
                ui.separator();
                ui.label("The grid toggle is remembered in settings.toml (or ~/.config/caresketch.toml).");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [130.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
