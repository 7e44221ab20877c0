//! Central world map: projected language points over a graticule.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::color::family_color;
use crate::data::model::Language;
use crate::projection::ViewTransform;
use crate::state::AppState;

/// Speaker count assumed when a record has none.
const DEFAULT_SPEAKERS: u64 = 100_000;

/// Extra pixels around a point that still count as hovering it.
const HIT_SLOP: f32 = 3.0;

const GRATICULE_STEP_DEG: i32 = 30;

/// Marker radius from speaker count: `2 * log10(speakers)`, clamped to 3..=12.
pub fn point_radius(speakers: Option<u64>) -> f32 {
    let speakers = speakers.unwrap_or(DEFAULT_SPEAKERS).max(1) as f32;
    (speakers.log10() * 2.0).clamp(3.0, 12.0)
}

/// Screen position of a geographic point inside `rect`.
fn to_screen(transform: &ViewTransform, rect: &Rect, lat: f64, lon: f64) -> Pos2 {
    let (x, y) = transform.project(lat, lon, rect.width() as f64, rect.height() as f64);
    rect.min + Vec2::new(x as f32, y as f32)
}

/// Render the map in the central panel.
pub fn world_map(ui: &mut Ui, state: &mut AppState) {
    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(14, 16, 32));

    let transform = state.transform;
    draw_graticule(&painter, &rect, &transform);

    // ---- Points ----
    let pointer = response.hover_pos();
    let selected_id = state.view.selected_language.clone();
    let mut hovered: Option<(f32, &Language)> = None;
    let mut selected_marker: Option<(Pos2, f32, Color32, &Language)> = None;

    for lang in state.view.atlas.select(&state.model.visible) {
        let pos = to_screen(&transform, &rect, lang.latitude, lang.longitude);
        if !rect.expand(12.0).contains(pos) {
            continue;
        }
        let radius = point_radius(lang.speakers);
        let color = family_color(lang.family_label());

        if selected_id.as_deref() == Some(lang.id.as_str()) {
            selected_marker = Some((pos, radius * 1.5, color, lang));
        } else {
            painter.circle_filled(pos, radius / 2.0 + 1.0, color);
            painter.circle_stroke(
                pos,
                radius / 2.0 + 1.0,
                Stroke::new(0.5, Color32::from_white_alpha(120)),
            );
        }

        if let Some(p) = pointer {
            let d = p.distance(pos);
            if d <= radius / 2.0 + 1.0 + HIT_SLOP && hovered.map_or(true, |(best, _)| d < best) {
                hovered = Some((d, lang));
            }
        }
    }

    // Selected language on top of everything else.
    if let Some((pos, radius, color, lang)) = selected_marker {
        painter.circle_filled(pos, radius / 2.0 + 4.0, color.gamma_multiply(0.3));
        painter.circle_filled(pos, radius / 2.0 + 1.0, color);
        painter.circle_stroke(pos, radius / 2.0 + 1.0, Stroke::new(1.5, Color32::WHITE));
        painter.text(
            pos + Vec2::new(radius / 2.0 + 6.0, -2.0),
            Align2::LEFT_CENTER,
            &lang.name,
            FontId::proportional(12.0),
            Color32::WHITE,
        );
    }

    // ---- Overlay text ----
    if let Some(p) = pointer {
        let (lat, lon) = transform.unproject(
            (p.x - rect.min.x) as f64,
            (p.y - rect.min.y) as f64,
            rect.width() as f64,
            rect.height() as f64,
        );
        painter.text(
            rect.left_bottom() + Vec2::new(8.0, -8.0),
            Align2::LEFT_BOTTOM,
            format!("{lat:.2}°, {lon:.2}°"),
            FontId::monospace(11.0),
            Color32::from_gray(170),
        );
    }
    painter.text(
        rect.right_bottom() + Vec2::new(-8.0, -8.0),
        Align2::RIGHT_BOTTOM,
        format!(
            "zoom {:.2}×  rotation {:.0}°",
            transform.zoom, transform.rotation_deg
        ),
        FontId::monospace(11.0),
        Color32::from_gray(140),
    );

    let hovered = hovered.map(|(_, lang)| (lang.id.clone(), lang.name.clone(), tooltip(lang)));

    // ---- Interaction ----
    let response = match &hovered {
        Some((_, _, text)) => response.on_hover_text(text.as_str()),
        None => response,
    };
    if response.clicked() {
        if let Some((id, name, _)) = &hovered {
            log::debug!("Map click selected {name}");
            state.select_language(id);
        }
    }
    if response.dragged() {
        let delta = response.drag_delta();
        state.pan_by(delta.x as f64, delta.y as f64);
    }
    if response.hovered() {
        let scroll = ui.ctx().input(|i| i.raw_scroll_delta);
        if scroll.y != 0.0 {
            state.zoom_by(1.0 + scroll.y as f64 * 0.001);
        }
    }
    if response.double_clicked() {
        state.reset_view();
    }
}

fn tooltip(lang: &Language) -> String {
    let speakers = lang
        .speakers
        .map(|s| format!("{s} speakers"))
        .unwrap_or_else(|| "speakers unknown".to_string());
    format!("{} ({}) – {speakers}", lang.name, lang.family_label())
}

/// One graticule segment between two `(lat, lon)` points.
struct GraticuleLine {
    from: (f64, f64),
    to: (f64, f64),
    frame: bool,
}

/// Meridians every [`GRATICULE_STEP_DEG`] then parallels. The outer
/// meridians and the poles form the map frame.
fn graticule_lines() -> Vec<GraticuleLine> {
    let step = GRATICULE_STEP_DEG as usize;
    let meridians = (-180i32..=180).step_by(step).map(|lon| GraticuleLine {
        from: (90.0, lon as f64),
        to: (-90.0, lon as f64),
        frame: lon.abs() == 180,
    });
    let parallels = (-90i32..=90).step_by(step).map(|lat| GraticuleLine {
        from: (lat as f64, -180.0),
        to: (lat as f64, 180.0),
        frame: lat.abs() == 90,
    });
    meridians.chain(parallels).collect()
}

/// Rotation and zoom are similarity transforms, so straight lines stay straight.
fn draw_graticule(painter: &egui::Painter, rect: &Rect, transform: &ViewTransform) {
    let stroke = Stroke::new(0.5, Color32::from_rgb(45, 52, 90));
    let frame = Stroke::new(1.0, Color32::from_rgb(70, 80, 130));
    for line in graticule_lines() {
        painter.line_segment(
            [
                to_screen(transform, rect, line.from.0, line.from.1),
                to_screen(transform, rect, line.to.0, line.to.1),
            ],
            if line.frame { frame } else { stroke },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped() {
        assert_eq!(point_radius(Some(1)), 3.0);
        assert_eq!(point_radius(Some(10_000_000_000)), 12.0);
        assert!((point_radius(None) - 10.0).abs() < 1e-5);
        assert_eq!(point_radius(Some(0)), 3.0);
    }

    #[test]
    fn graticule_frames_the_map() {
        let lines = graticule_lines();
        // 13 meridians and 7 parallels at 30° spacing.
        assert_eq!(lines.len(), 20);
        let frames: Vec<_> = lines.iter().filter(|l| l.frame).collect();
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().any(|l| l.from == (-90.0, -180.0)));
        assert!(frames.iter().any(|l| l.from == (90.0, 180.0)));
    }

    #[test]
    fn identity_maps_corners_to_rect() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(360.0, 180.0));
        let p = to_screen(&ViewTransform::IDENTITY, &rect, 90.0, -180.0);
        assert!((p - rect.min).length() < 1e-3);
        let q = to_screen(&ViewTransform::IDENTITY, &rect, -90.0, 180.0);
        assert!((q - rect.max).length() < 1e-3);
    }
}
