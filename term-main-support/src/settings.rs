use life_grid::Topology;
use log::warn;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Allowed simulation speeds, in generations per second.
pub const SPEED_RANGE: RangeInclusive<u8> = 1..=10;
pub const DEFAULT_SPEED: u8 = 5;
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff_ff_ff);
    pub const BLUE: Rgb = Rgb(0x00_00_ff);

    pub fn components(&self) -> [u8; 3] {
        let [_, r, g, b] = self.0.to_be_bytes();
        [r, g, b]
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}, expected six hex digits like ff8800")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim_start_matches('#').trim_start_matches("0x");
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGlyphs(pub [char; 2]);

impl CellGlyphs {
    pub const BLANK: CellGlyphs = CellGlyphs([' ', ' ']);

    /// Anything other than exactly two characters falls back to two blanks.
    pub fn parse_or_blank(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => CellGlyphs([first, second]),
            _ => {
                warn!("cell glyphs {text:?} are not two characters, using blanks");
                Self::BLANK
            }
        }
    }
}

impl Default for CellGlyphs {
    fn default() -> Self {
        Self::BLANK
    }
}

/// What, if anything, is printed inside live cells instead of the glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    None,
    NeighborCount,
    Age,
}

/// Run-time options. Built once at startup, then changed only by the input
/// commands the run loop handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub paused: bool,
    pub speed: u8,
    pub show_neighbor_counts: bool,
    pub show_age: bool,
    pub show_status: bool,
    pub wrap: bool,
    pub foreground: Rgb,
    pub background: Rgb,
    pub cell_glyphs: CellGlyphs,
    pub frame_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paused: false,
            speed: DEFAULT_SPEED,
            show_neighbor_counts: false,
            show_age: false,
            show_status: true,
            wrap: false,
            foreground: Rgb::BLUE,
            background: Rgb::WHITE,
            cell_glyphs: CellGlyphs::BLANK,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl Settings {
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = Self::clamp_speed(speed);
        self
    }

    pub fn topology(&self) -> Topology {
        Topology::from_wrap(self.wrap)
    }

    /// Neighbor counts win if both annotations are on.
    pub fn annotation(&self) -> Annotation {
        if self.show_neighbor_counts {
            Annotation::NeighborCount
        } else if self.show_age {
            Annotation::Age
        } else {
            Annotation::None
        }
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_secs(1) / self.speed.max(1) as u32
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn speed_up(&mut self) {
        self.speed = Self::clamp_speed(self.speed.saturating_add(1));
    }

    pub fn slow_down(&mut self) {
        self.speed = Self::clamp_speed(self.speed.saturating_sub(1));
    }

    fn clamp_speed(speed: u8) -> u8 {
        speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
    }
}
