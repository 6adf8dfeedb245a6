//! Timer face widget
//!
//! Draws a `SessionView`: gradient background, clock, countdown, interval
//! badges and the session controls. Owns no session state; button presses
//! are handed back to the caller as a `FaceAction`.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Stroke, Vec2};
use serde::{Deserialize, Serialize};

use super::view::{
    format_clock, BadgeState, Countdown, SessionView, COMPLETE_MESSAGE, CUE_BANNER, RUNNING_HINT,
};

/// Background palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dusk,
    Ocean,
    Forest,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Self::Dusk, Self::Ocean, Self::Forest]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dusk => "Dusk",
            Self::Ocean => "Ocean",
            Self::Forest => "Forest",
        }
    }

    /// Gradient stops from top-left to bottom-right
    pub fn gradient(&self) -> [Color32; 3] {
        match self {
            Self::Dusk => [
                Color32::from_rgb(168, 85, 247),
                Color32::from_rgb(236, 72, 153),
                Color32::from_rgb(79, 70, 229),
            ],
            Self::Ocean => [
                Color32::from_rgb(14, 165, 233),
                Color32::from_rgb(6, 182, 212),
                Color32::from_rgb(30, 64, 175),
            ],
            Self::Forest => [
                Color32::from_rgb(16, 185, 129),
                Color32::from_rgb(20, 184, 166),
                Color32::from_rgb(21, 128, 61),
            ],
        }
    }
}

/// Gradient shown while a cue is active, whatever the theme
const CUE_GRADIENT: [Color32; 3] = [
    Color32::from_rgb(250, 204, 21),
    Color32::from_rgb(239, 68, 68),
    Color32::from_rgb(236, 72, 153),
];

/// Seconds for the background to blend into and out of the cue colors
const CUE_FADE: f32 = 1.0;

const PARTICLE_COUNT: usize = 6;

/// Something the user pressed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAction {
    /// Start, resume or pause, depending on the phase
    Primary,
    Reset,
}

/// Display settings for the timer face
#[derive(Debug, Clone)]
pub struct FaceSettings {
    pub theme: Theme,
    pub show_particles: bool,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_particles: true,
        }
    }
}

#[derive(Default)]
pub struct SessionFace {
    pub settings: FaceSettings,
}

impl SessionFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the full face and report a pressed control, if any
    pub fn show(&self, ui: &mut egui::Ui, view: &SessionView) -> Option<FaceAction> {
        let ctx = ui.ctx().clone();
        let cue = ctx.animate_bool_with_time(egui::Id::new("cue_flash"), view.cue_active(), CUE_FADE);
        let time = ui.input(|i| i.time);

        self.paint_background(&ctx, cue, time);

        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.08);

            ui.label(RichText::new("🧘 Yoga Timer").size(44.0).strong().color(Color32::WHITE));
            ui.label(
                RichText::new("Find your inner peace with guided breathing intervals")
                    .size(16.0)
                    .color(faded(Color32::WHITE, 0.8)),
            );

            ui.add_space(28.0);

            let clock_size = 96.0 * (1.0 + 0.1 * cue);
            ui.label(
                RichText::new(&view.clock)
                    .font(FontId::monospace(clock_size))
                    .strong()
                    .color(Color32::WHITE),
            );

            match &view.countdown {
                Countdown::Next(left) => {
                    ui.label(
                        RichText::new(format!("Next beep in: {}", left))
                            .size(18.0)
                            .color(faded(Color32::WHITE, 0.75)),
                    );
                }
                Countdown::Complete => {
                    ui.label(
                        RichText::new(format!("🎉 {}", COMPLETE_MESSAGE))
                            .size(18.0)
                            .color(Color32::from_rgb(134, 239, 172)),
                    );
                }
                Countdown::Hidden => {}
            }

            ui.add_space(28.0);

            ui.label(
                RichText::new("Breathing Intervals")
                    .size(15.0)
                    .color(faded(Color32::WHITE, 0.75)),
            );
            ui.add_space(6.0);
            draw_badges(ui, view, time);

            ui.add_space(28.0);
            action = draw_controls(ui, view);

            ui.add_space(20.0);
            let banner = faded(Color32::WHITE, cue);
            ui.label(RichText::new("🔔").size(36.0 * (0.9 + 0.35 * cue)).color(banner));
            let banner_text = match view.cue_mark {
                Some(mark) => format!("{} ({})", CUE_BANNER, format_clock(mark)),
                None => CUE_BANNER.to_string(),
            };
            ui.label(RichText::new(banner_text).size(26.0).strong().color(banner));

            if view.running {
                ui.add_space(16.0);
                ui.label(RichText::new(RUNNING_HINT).size(13.0).color(faded(Color32::WHITE, 0.6)));
            }
        });

        action
    }

    fn paint_background(&self, ctx: &egui::Context, cue: f32, time: f64) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        let rect = ctx.screen_rect();

        let base = self.settings.theme.gradient();
        let stops = [
            lerp_color(base[0], CUE_GRADIENT[0], cue),
            lerp_color(base[1], CUE_GRADIENT[1], cue),
            lerp_color(base[2], CUE_GRADIENT[2], cue),
        ];
        painter.add(diagonal_gradient(rect, stops));

        // Soft glow blobs in two corners
        let pulse = 0.5 + 0.5 * (time as f32 * 1.5).sin();
        let glow = Color32::from_rgba_unmultiplied(255, 255, 255, (8.0 + 6.0 * pulse) as u8);
        painter.circle_filled(rect.left_top() + Vec2::splat(80.0), 190.0, glow);
        painter.circle_filled(rect.right_bottom() - Vec2::splat(70.0), 160.0, glow);

        if self.settings.show_particles {
            for i in 0..PARTICLE_COUNT {
                let (pos, alpha) = particle(i, rect, time);
                let color = Color32::from_rgba_unmultiplied(255, 255, 255, (alpha * 90.0) as u8);
                painter.circle_filled(pos, 3.0, color);
            }
        }
    }
}

fn draw_badges(ui: &mut egui::Ui, view: &SessionView, time: f64) {
    const WIDTH: f32 = 76.0;
    const HEIGHT: f32 = 32.0;
    const GAP: f32 = 12.0;

    let count = view.badges.len() as f32;
    let row = count * WIDTH + (count - 1.0).max(0.0) * GAP;
    let (response, painter) =
        ui.allocate_painter(Vec2::new(ui.available_width(), HEIGHT + 8.0), egui::Sense::hover());
    let rect = response.rect;
    let mut x = rect.center().x - row / 2.0;

    for badge in &view.badges {
        let center = Pos2::new(x + WIDTH / 2.0, rect.center().y);
        let (scale, fill, text) = match badge.state {
            BadgeState::Fired => (1.1, Color32::from_rgb(34, 197, 94), Color32::WHITE),
            BadgeState::Reached => {
                let pulse = 0.75 + 0.25 * (time as f32 * 4.0).sin();
                (1.0, faded(Color32::from_rgb(234, 179, 8), pulse), Color32::BLACK)
            }
            BadgeState::Pending => (1.0, faded(Color32::WHITE, 0.2), Color32::WHITE),
        };

        let pill = Rect::from_center_size(center, Vec2::new(WIDTH, HEIGHT) * scale);
        painter.rect_filled(pill, HEIGHT / 2.0, fill);
        if badge.state == BadgeState::Fired {
            painter.rect_stroke(pill, HEIGHT / 2.0, Stroke::new(1.0, faded(Color32::WHITE, 0.5)));
        }
        painter.text(center, Align2::CENTER_CENTER, &badge.label, FontId::monospace(14.0), text);

        ui.interact(pill, ui.id().with(("badge", badge.mark)), egui::Sense::hover())
            .on_hover_text(badge_hint(badge.state));

        x += WIDTH + GAP;
    }
}

fn badge_hint(state: BadgeState) -> &'static str {
    match state {
        BadgeState::Pending => "Upcoming breathing cue",
        BadgeState::Reached => "Cue due",
        BadgeState::Fired => "Cue played",
    }
}

fn draw_controls(ui: &mut egui::Ui, view: &SessionView) -> Option<FaceAction> {
    const SIZE: Vec2 = Vec2::new(210.0, 52.0);
    const GAP: f32 = 20.0;

    let (response, _) =
        ui.allocate_painter(Vec2::new(ui.available_width(), SIZE.y), egui::Sense::hover());
    let center = response.rect.center();

    let primary_rect = Rect::from_center_size(center - Vec2::new((SIZE.x + GAP) / 2.0, 0.0), SIZE);
    let reset_rect = Rect::from_center_size(center + Vec2::new((SIZE.x + GAP) / 2.0, 0.0), SIZE);

    let (fill, text) = if view.running {
        (Color32::from_rgb(239, 68, 68), Color32::WHITE)
    } else {
        (Color32::WHITE, Color32::BLACK)
    };

    let primary = egui::Button::new(RichText::new(view.primary.label()).size(20.0).strong().color(text))
        .fill(fill)
        .rounding(16.0);
    let reset = egui::Button::new(RichText::new("🔄 Reset").size(20.0).strong().color(Color32::WHITE))
        .fill(Color32::from_rgba_unmultiplied(55, 65, 81, 204))
        .rounding(16.0);

    let mut action = None;
    if clicked(ui.put(primary_rect, primary)) {
        action = Some(FaceAction::Primary);
    }
    if clicked(ui.put(reset_rect, reset)) {
        action = Some(FaceAction::Reset);
    }
    action
}

/// A clicked control hands focus back so Space stays a timer shortcut
fn clicked(response: egui::Response) -> bool {
    let clicked = response.clicked();
    if clicked || response.has_focus() {
        response.surrender_focus();
    }
    clicked
}

/// Quad with `stops[0]` at the top-left, `stops[1]` on the other diagonal and
/// `stops[2]` at the bottom-right
fn diagonal_gradient(rect: Rect, stops: [Color32; 3]) -> egui::Shape {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), stops[0]);
    mesh.colored_vertex(rect.right_top(), stops[1]);
    mesh.colored_vertex(rect.right_bottom(), stops[2]);
    mesh.colored_vertex(rect.left_bottom(), stops[1]);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    egui::Shape::mesh(mesh)
}

/// Fixed scattered position and pulsing alpha for particle `i`
fn particle(i: usize, rect: Rect, time: f64) -> (Pos2, f32) {
    let n = i as f32 + 1.0;
    let fx = (n * 0.618_034 + 0.13).fract();
    let fy = (n * 0.414_214 + 0.37).fract();
    let period = 4.0 + (i % 4) as f64;
    let phase = (time / period + n as f64 * 0.37).fract() as f32;
    let alpha = 0.5 - 0.5 * (phase * std::f32::consts::TAU).cos();
    (
        Pos2::new(rect.left() + fx * rect.width(), rect.top() + fy * rect.height()),
        alpha,
    )
}

fn faded(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_color_endpoints() {
        let a = Color32::from_rgb(0, 100, 200);
        let b = Color32::from_rgb(200, 100, 0);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Color32::from_rgb(100, 100, 100));
        assert_eq!(lerp_color(a, b, 3.0), b);
    }

    #[test]
    fn test_particles_stay_on_screen() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        for i in 0..PARTICLE_COUNT {
            for time in [0.0, 1.3, 17.9] {
                let (pos, alpha) = particle(i, rect, time);
                assert!(rect.contains(pos));
                assert!((0.0..=1.0).contains(&alpha));
            }
        }
    }

    #[test]
    fn test_every_theme_has_a_name() {
        assert_eq!(Theme::all().len(), 3);
        assert_eq!(Theme::default(), Theme::Dusk);
        assert!(Theme::all().iter().all(|t| !t.name().is_empty()));
    }
}
