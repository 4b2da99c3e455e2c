use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Field width in cells; 0 fits the terminal.
    pub(crate) width: usize,
    /// Field height in cells; 0 fits the terminal.
    pub(crate) height: usize,
    pub(crate) zoom: f32,
    pub(crate) steps_per_frame: usize,
    pub(crate) fps_cap: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) seed_region: usize,
    pub(crate) classic: bool,
    pub(crate) show_age: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            zoom: 2.0,
            steps_per_frame: 1,
            fps_cap: 30,
            seed: None,
            seed_region: agelife::DEFAULT_SEED_REGION,
            classic: false,
            show_age: false,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "agelife", about = "Game of Life with aging rules, drawn in braille")]
pub(crate) struct Args {
    /// JSON settings file (defaults to settings.json in the user config dir)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// field width in cells (0 = fit terminal)
    #[arg(long)]
    pub(crate) width: Option<usize>,

    /// field height in cells (0 = fit terminal)
    #[arg(long)]
    pub(crate) height: Option<usize>,

    /// pixels per cell
    #[arg(long)]
    pub(crate) zoom: Option<f32>,

    /// simulation steps per drawn frame
    #[arg(long)]
    pub(crate) steps: Option<usize>,

    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// side of the randomly filled square at startup
    #[arg(long)]
    pub(crate) region: Option<usize>,

    /// start with plain B3/S23 rules
    #[arg(long)]
    pub(crate) classic: bool,

    /// start in age display mode
    #[arg(long)]
    pub(crate) age: bool,

    /// write tracing output here (the terminal is taken by the viewer)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

impl Args {
    pub(crate) fn apply(&self, s: &mut Settings) {
        if let Some(v) = self.width {
            s.width = v;
        }
        if let Some(v) = self.height {
            s.height = v;
        }
        if let Some(v) = self.zoom {
            s.zoom = v;
        }
        if let Some(v) = self.steps {
            s.steps_per_frame = v;
        }
        if let Some(v) = self.fps {
            s.fps_cap = v;
        }
        if self.seed.is_some() {
            s.seed = self.seed;
        }
        if let Some(v) = self.region {
            s.seed_region = v;
        }
        if self.classic {
            s.classic = true;
        }
        if self.age {
            s.show_age = true;
        }
    }
}

pub(crate) fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "agelife", "AgeLife").map(|p| p.config_dir().join("settings.json"))
}

/// Missing files give defaults; unreadable or malformed ones are errors.
pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings = serde_json::from_str::<Settings>(&text)
        .with_context(|| format!("parsing settings in {}", path.display()))?;
    Ok(settings)
}

pub(crate) fn resolve(args: &Args) -> Result<Settings> {
    let path = args.config.clone().or_else(default_settings_path);
    let mut settings = match path {
        Some(p) => load_settings(&p)?,
        None => Settings::default(),
    };
    args.apply(&mut settings);

    settings.zoom = settings.zoom.clamp(1.0, 16.0);
    settings.steps_per_frame = settings.steps_per_frame.clamp(1, 50);
    settings.fps_cap = settings.fps_cap.clamp(10, 240);
    settings.seed_region = settings.seed_region.max(1);
    Ok(settings)
}
