//! egui widgets for tweaking effects live.
//!
//! ```ignore
//! egui::Window::new("Effect").show(ctx, |ui| {
//!     particle_fx::ui::stats(ui, effect.as_ref());
//!     effect.ui(ui);
//! });
//! ```

use crate::effects::Effect;
use crate::generators::BasicColorGen;
use glam::Vec4;

/// RGBA color picker bound to a [`Vec4`]. Returns `true` when edited.
pub fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Vec4) -> bool {
    ui.horizontal(|ui| {
        let mut rgba = color.to_array();
        let changed = ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed();
        ui.label(label);
        if changed {
            *color = Vec4::from_array(rgba);
        }
        changed
    })
    .inner
}

/// The four color bounds of a [`BasicColorGen`].
pub fn color_ranges(ui: &mut egui::Ui, colors: &mut BasicColorGen) -> bool {
    let mut changed = false;
    changed |= color_edit(ui, "start color min", &mut colors.min_start_col);
    changed |= color_edit(ui, "start color max", &mut colors.max_start_col);
    changed |= color_edit(ui, "end color min", &mut colors.min_end_col);
    changed |= color_edit(ui, "end color max", &mut colors.max_end_col);
    changed
}

/// Particle counts of an effect.
pub fn stats(ui: &mut egui::Ui, effect: &dyn Effect) {
    ui.label(format!("effect: {}", effect.name()));
    ui.label(format!(
        "particles: {} / {}",
        effect.num_alive_particles(),
        effect.num_all_particles()
    ));
    ui.label(format!("alive ratio: {:.2}", effect.alive_to_all_ratio()));
}
