//! yoga-timer - Yoga session timer
//!
//! Counts elapsed session time and plays a breathing chime at fixed
//! intervals (2, 4, 10, 17 and 27 minutes).
//!
//! Controls: Start/Resume/Pause and Reset buttons, or Space and R.

use eframe::egui;
use std::time::{Duration, Instant};

mod audio;
mod render;
mod session;
mod settings;
mod ticker;

use audio::ChimePlayer;
use render::{FaceAction, SessionFace, SessionView, Theme};
use session::{Phase, Session};
use settings::AppSettings;
use ticker::Ticker;

/// Upper bound on the repaint interval while idle, so the cue fade stays smooth
const MAX_IDLE_REPAINT: Duration = Duration::from_millis(250);

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting yoga-timer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 680.0])
            .with_min_inner_size([560.0, 560.0])
            .with_title("Yoga Timer"),
        ..Default::default()
    };

    eframe::run_native(
        "yoga-timer",
        options,
        Box::new(|cc| Ok(Box::new(YogaApp::new(cc)))),
    )
}

/// Keyboard shortcut pressed this frame: Space toggles, R resets.
///
/// Both are ignored while a text field holds the keyboard. Buttons drop focus
/// after a click, so Space never reaches a clicked button as well.
fn shortcut(space: bool, r: bool, typing: bool) -> Option<FaceAction> {
    if typing {
        None
    } else if r {
        Some(FaceAction::Reset)
    } else if space {
        Some(FaceAction::Primary)
    } else {
        None
    }
}

struct YogaApp {
    session: Session,
    ticker: Ticker,
    chime: ChimePlayer,
    face: SessionFace,
    show_settings: bool,
    saved: AppSettings,
}

impl YogaApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            session: Session::new(),
            ticker: Ticker::default(),
            chime: ChimePlayer::new(),
            face: SessionFace::new(),
            show_settings: false,
            saved: AppSettings::default(),
        };

        let settings = AppSettings::load();
        settings.apply(&mut app);
        app.saved = settings;
        app
    }

    fn transition(&mut self, f: impl FnOnce(Session) -> Session) {
        self.session = f(std::mem::take(&mut self.session));
    }

    fn start(&mut self, now: Instant) {
        if self.session.is_running() {
            return;
        }
        log::info!("Session started at {}s", self.session.elapsed());
        self.transition(Session::start);
        self.ticker.start(now);
        self.chime.prime();
    }

    fn stop(&mut self) {
        log::info!("Session paused at {}s", self.session.elapsed());
        self.transition(Session::stop);
        self.ticker.stop();
    }

    fn reset(&mut self) {
        log::info!("Session reset");
        self.transition(Session::reset);
        self.ticker.stop();
    }

    fn handle(&mut self, action: FaceAction, now: Instant) {
        match action {
            FaceAction::Primary => match self.session.phase() {
                Phase::Running => self.stop(),
                Phase::Idle | Phase::Paused => self.start(now),
            },
            FaceAction::Reset => self.reset(),
        }
    }

    /// Apply due ticks, fire cues and retire finished flashes and chimes
    fn advance(&mut self, now: Instant) {
        let session = std::mem::take(&mut self.session);
        let (session, fired) = ticker::drive(&mut self.ticker, session, now);
        self.session = session;
        if !fired.is_empty() {
            log::info!(
                "Cue at {}s (marks {:?})",
                self.session.elapsed(),
                fired.marks()
            );
            self.chime.play();
        }

        self.chime.prune(now);
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.face.settings.show_particles {
            ctx.request_repaint();
            return;
        }

        let mut wait = MAX_IDLE_REPAINT;
        if let Some(next) = self.ticker.until_next(now) {
            wait = wait.min(next);
        }
        if self.session.is_cue_animating() {
            wait = wait.min(Duration::from_millis(16));
        }
        ctx.request_repaint_after(wait);
    }

    fn save_settings_if_changed(&mut self) {
        let current = AppSettings::from_app(self);
        if current != self.saved {
            current.save();
            self.saved = current;
        }
    }
}

impl eframe::App for YogaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        let typing = ctx.wants_keyboard_input();
        let (space, r) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::R),
            )
        });
        if let Some(action) = shortcut(space, r, typing) {
            self.handle(action, now);
        }

        self.advance(now);

        // Top panel
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Yoga Timer");
                ui.separator();
                ui.label(&self.chime.status);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_settings, "⚙ Settings");
                });
            });
        });

        // Settings panel
        if self.show_settings {
            egui::SidePanel::right("settings_panel")
                .min_width(180.0)
                .show(ctx, |ui| {
                    ui.heading("Settings");
                    ui.separator();

                    ui.horizontal(|ui| {
                        ui.label("Theme:");
                        egui::ComboBox::from_id_salt("theme")
                            .selected_text(self.face.settings.theme.name())
                            .show_ui(ui, |ui| {
                                for theme in Theme::all() {
                                    ui.selectable_value(
                                        &mut self.face.settings.theme,
                                        *theme,
                                        theme.name(),
                                    );
                                }
                            })
                            .response
                            .surrender_focus();
                    });

                    let particles =
                        ui.checkbox(&mut self.face.settings.show_particles, "Particles");
                    if particles.clicked() {
                        particles.surrender_focus();
                    }

                    ui.separator();
                    ui.small("Space: start / pause");
                    ui.small("R: reset");
                });
        }

        // Timer face
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let view = SessionView::from_session(&self.session);
                if let Some(action) = self.face.show(ui, &view) {
                    self.handle(action, now);
                }
            });

        self.save_settings_if_changed();
        self.schedule_repaint(ctx, now);
    }
}
