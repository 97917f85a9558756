use crate::session::Session;
use egui::{Color32, Context, Pos2, Stroke};
use glam::Vec2;
use tilecast_input::Action;
use tilecast_tools::{FrameInspector, MinimapLayout};

const MINIMAP_MAX: f32 = 220.0;
const MINIMAP_MARGIN: f32 = 10.0;

const WALL: Color32 = Color32::from_rgb(90, 90, 100);
const FLOOR: Color32 = Color32::from_rgb(24, 24, 28);
const PLAYER: Color32 = Color32::from_rgb(255, 220, 0);

fn pos(v: Vec2) -> Pos2 {
    egui::pos2(v.x, v.y)
}

/// Developer overlay: inspector panel, plus the minimap when enabled.
pub fn draw(ctx: &Context, session: &Session) {
    draw_inspector(ctx, session);
    if session.show_minimap() {
        draw_minimap(ctx, session);
    }
}

fn draw_inspector(ctx: &Context, session: &Session) {
    let summary = FrameInspector::summary(session.world(), &session.frame().slices);
    let frame_ms = session.frame_time().as_secs_f32() * 1000.0;

    egui::Window::new("Inspector")
        .default_pos(egui::pos2(ctx.screen_rect().right() - 260.0, MINIMAP_MARGIN))
        .default_width(240.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Level: {}", session.level_name()));
            ui.label(format!("Tick: {}", summary.tick));
            ui.label(format!(
                "Position: ({:.1}, {:.1})",
                summary.position[0], summary.position[1]
            ));
            ui.label(format!("Heading: {:.1}°", summary.heading_degrees));
            ui.label(format!("Tile: {}", summary.tile));
            ui.separator();
            ui.label(format!(
                "Rays: {}  hits {}  misses {}",
                summary.rays,
                summary.hits,
                summary.misses()
            ));
            if let (Some(near), Some(far)) = (summary.nearest, summary.farthest) {
                ui.label(format!("Depth: {near:.1} .. {far:.1}"));
            }
            ui.label(format!("Blocked moves: {}", session.blocked_moves()));
            ui.label(format!("Frame: {frame_ms:.1} ms"));
            ui.monospace(format!("{:016x}", summary.frame_hash));
            ui.separator();
            let keys = |action| session.bindings().keys_for(action).join("/");
            ui.small(format!(
                "Minimap: {}  Respawn: {}  Quit: {}",
                keys(Action::ToggleMinimap),
                keys(Action::Respawn),
                keys(Action::Quit)
            ));
        });
}

fn draw_minimap(ctx: &Context, session: &Session) {
    let world = session.world();
    let grid = world.grid();
    let pose = world.pose();

    egui::Area::new(egui::Id::new("minimap"))
        .fixed_pos(egui::pos2(MINIMAP_MARGIN, MINIMAP_MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            let probe = MinimapLayout::fit(grid, Vec2::ZERO, Vec2::splat(MINIMAP_MAX));
            let size = probe.size(grid);
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(size.x, size.y), egui::Sense::hover());
            let layout = MinimapLayout::fit(
                grid,
                Vec2::new(rect.min.x, rect.min.y),
                Vec2::splat(MINIMAP_MAX),
            );
            let painter = ui.painter();

            for cell in layout.cells(grid) {
                let fill = if cell.wall { WALL } else { FLOOR };
                let tile = egui::Rect::from_min_max(pos(cell.min), pos(cell.max));
                painter.rect_filled(tile, 0.0, fill);
            }

            let fov = session.config().fov();
            let ray = Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 120, 50));
            for (from, to) in layout.ray_segments(&pose, &session.frame().slices, fov) {
                painter.line_segment([pos(from), pos(to)], ray);
            }

            let (centre, tip) = layout.player_marker(&pose, layout.tile_px * 0.6);
            painter.line_segment([pos(centre), pos(tip)], Stroke::new(2.0, PLAYER));
            painter.circle_filled(pos(centre), (layout.tile_px * 0.15).max(2.0), PLAYER);
        });
}
