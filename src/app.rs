use crate::config::{resolve, Args, Settings};
use crate::input::{collect_input_nonblocking, map_event, Command, DragState};
use crate::term::{draw_text, Terminal};
use agelife::{render, DisplayMode, Field, RuleSet, Viewport};
use anyhow::Context;
use crossterm::style::Color;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ZOOM_MIN: f32 = 2.0;
const ZOOM_MAX: f32 = 16.0;
const ZOOM_IN: f32 = 1.03;
const ZOOM_OUT: f32 = 0.97;

/// Zoom (pixels per cell) and pan (cells) for the field view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Camera {
    pub(crate) zoom: f32,
    pub(crate) pan_x: f32,
    pub(crate) pan_y: f32,
}

impl Camera {
    pub(crate) fn new(zoom: f32) -> Self {
        Self {
            zoom,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    pub(crate) fn preset(&mut self, zoom: f32) {
        self.zoom = zoom;
        if zoom == ZOOM_MIN {
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
    }

    /// Scales the zoom while keeping the field centre where it is on screen.
    pub(crate) fn zoom_by(&mut self, factor: f32, field_w: usize, field_h: usize) {
        let old = self.zoom;
        let new = (old * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let (cx, cy) = (field_w as f32 / 2.0, field_h as f32 / 2.0);
        self.pan_x += (new - old) * (cx - self.pan_x) / new;
        self.pan_y += (new - old) * (cy - self.pan_y) / new;
        self.zoom = new;
    }

    /// Below the minimum zoom the whole field fits, so pan is ignored.
    pub(crate) fn viewport(&self, width: usize, height: usize) -> Viewport {
        let view = Viewport::new(width, height, self.zoom);
        if self.zoom < ZOOM_MIN {
            view
        } else {
            view.with_pan(self.pan_x, self.pan_y)
        }
    }
}

pub(crate) struct App {
    settings: Settings,
    field: Field,
    term: Terminal,
    camera: Camera,
    mode: DisplayMode,
    drag: DragState,
    paused: bool,
    steps_per_frame: usize,
    fps: f32,
    should_quit: bool,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin().context("taking over the terminal")?;

        // by default the field is half the canvas, drawn at zoom 2
        let (cw, ch) = term.canvas_size();
        let width = if settings.width > 0 { settings.width } else { (cw / 2).max(1) };
        let height = if settings.height > 0 { settings.height } else { (ch / 2).max(1) };

        let mut field = match settings.seed {
            Some(seed) => Field::with_seed(width, height, seed)?,
            None => Field::new(width, height)?,
        };
        field.set_rule_mode(!settings.classic);
        field.seed_region(settings.seed_region)?;
        info!(
            width,
            height,
            population = field.population(),
            rules = field.rules().name(),
            "field ready"
        );

        Ok(Self {
            camera: Camera::new(settings.zoom),
            mode: if settings.show_age {
                DisplayMode::Age
            } else {
                DisplayMode::Activity
            },
            drag: DragState::default(),
            paused: false,
            steps_per_frame: settings.steps_per_frame,
            fps: 0.0,
            should_quit: false,
            settings,
            field,
            term,
        })
    }

    fn apply(&mut self, cmd: Command) -> anyhow::Result<()> {
        let (fw, fh) = (self.field.width(), self.field.height());
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::TogglePause => self.paused = !self.paused,
            Command::StepOnce => {
                if self.paused {
                    self.field.step();
                }
            }
            Command::ToggleDisplay => self.mode = self.mode.toggled(),
            Command::ZoomPreset(z) => self.camera.preset(z),
            Command::ZoomIn => self.camera.zoom_by(ZOOM_IN, fw, fh),
            Command::ZoomOut => self.camera.zoom_by(ZOOM_OUT, fw, fh),
            Command::StepsPerFrame(n) => self.steps_per_frame = n,
            Command::Rules(rules) => self.field.set_rules(rules),
            Command::Pan(dx, dy) => {
                self.camera.pan_x += dx;
                self.camera.pan_y += dy;
            }
            Command::Reseed => {
                self.field.clear();
                self.field.seed_region(self.settings.seed_region)?;
                debug!(generation = self.field.generation(), "reseeded");
            }
        }
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps_cap as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            let frame_start = Instant::now();
            if self.term.resize_if_needed()? {
                debug!(cols = self.term.cols, rows = self.term.rows, "terminal resized");
            }

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(cmd) = map_event(&ev, &mut self.drag) {
                    self.apply(cmd)?;
                }
            }

            if !self.paused {
                self.field.steps(self.steps_per_frame);
            }

            self.render_frame()?;

            let spent = frame_start.elapsed();
            if spent < frame_dt {
                std::thread::sleep(frame_dt - spent);
            }

            let now = Instant::now();
            let dt = now.saturating_duration_since(last_frame).as_secs_f32().max(1e-6);
            last_frame = now;
            self.fps = self.fps * 0.9 + 0.1 / dt;
        }

        info!(
            generation = self.field.generation(),
            population = self.field.population(),
            "viewer closed"
        );
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let (cw, ch) = self.term.canvas_size();
        let view = self.camera.viewport(cw, ch);
        render(&self.field, &mut self.term.pixels, &view, self.mode)?;

        self.term.cur.clear();
        self.term.blit_pixels();

        let hud = format!(
            "gen:{}  pop:{}  rules:{}  view:{}  zoom:{:.2}  steps/frame:{}  fps:{:>5.1}{}  \
             keys: q quit  SPACE pause  s step  d view  r/n rules  a/f speed  1-5 zoom  arrows pan  c reseed",
            self.field.generation(),
            self.field.population(),
            self.field.rules().name(),
            self.mode.name(),
            self.camera.zoom,
            self.steps_per_frame,
            self.fps,
            if self.paused { "  PAUSED" } else { "" },
        );
        let fg = if self.field.rules() == RuleSet::Aging {
            Color::Cyan
        } else {
            Color::Yellow
        };
        draw_text(&mut self.term.cur, 0, 0, &hud, fg);

        self.term.present()
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let settings = resolve(&args)?;
    debug!(?settings, "resolved settings");
    let mut app = App::init(settings)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zooming_keeps_the_centre_fixed() {
        let mut cam = Camera::new(2.0);
        cam.zoom_by(ZOOM_IN, 100, 60);
        // the centre cell maps to the same screen pixel before and after
        let before = 50.0 * 2.0;
        let after = (50.0 - cam.pan_x) * cam.zoom;
        assert!((before - after).abs() < 1e-3, "{before} vs {after}");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::new(15.9);
        cam.zoom_by(ZOOM_IN, 10, 10);
        assert_eq!(cam.zoom, ZOOM_MAX);
        let mut cam = Camera::new(2.0);
        cam.zoom_by(ZOOM_OUT, 10, 10);
        assert_eq!(cam.zoom, ZOOM_MIN);
        assert_eq!((cam.pan_x, cam.pan_y), (0.0, 0.0));
    }

    #[test]
    fn pan_is_ignored_below_minimum_zoom() {
        let mut cam = Camera::new(1.0);
        cam.pan_x = 5.0;
        assert_eq!(cam.viewport(10, 10).pan_x, 0.0);
        cam.preset(4.0);
        assert_eq!(cam.viewport(10, 10).pan_x, 5.0);
        cam.preset(2.0);
        assert_eq!(cam.viewport(10, 10).pan_x, 0.0);
    }
}
