use crate::config::Config;
use crate::consts;
use crate::highscores::HighScores;
use crate::options::Options;
use enum_map::Enum;
use glam::Vec2;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// State shared by every screen of the application
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Globals {
    pub(crate) config: Config,
    pub(crate) options: Options,
    pub(crate) scores: HighScores,
}

/// A rectangular world region centered on the origin.
///
/// Positions are clamped into it one axis at a time, each with its own
/// padding, so a wide sprite can keep more horizontal margin than vertical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) half_width: f32,
    pub(crate) half_height: f32,
}

impl Viewport {
    /// The playfield
    pub(crate) const WORLD: Viewport =
        Viewport::new(consts::WORLD_HALF_WIDTH, consts::WORLD_HALF_HEIGHT);

    pub(crate) const fn new(half_width: f32, half_height: f32) -> Viewport {
        Viewport {
            half_width,
            half_height,
        }
    }

    pub(crate) fn clamp_x(&self, x: f32, padding: f32) -> f32 {
        let limit = self.half_width - padding;
        x.clamp(-limit, limit)
    }

    pub(crate) fn clamp_y(&self, y: f32, padding: f32) -> f32 {
        let limit = self.half_height - padding;
        y.clamp(-limit, limit)
    }

    pub(crate) fn clamp(&self, pos: Vec2, x_padding: f32, y_padding: f32) -> Vec2 {
        Vec2::new(self.clamp_x(pos.x, x_padding), self.clamp_y(pos.y, y_padding))
    }

    pub(crate) fn contains(&self, pos: Vec2, x_padding: f32, y_padding: f32) -> bool {
        pos == self.clamp(pos, x_padding, y_padding)
    }
}

/// Everything is drawn inside a rectangle of
/// [`DISPLAY_SIZE`][consts::DISPLAY_SIZE] in the center of the terminal
/// window.
pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of (at most) the given size centered in `area`
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height]).flex(Flex::Center).areas(rect);
    rect
}

/// Navigation helpers for `enum_map::Enum` menu types
pub(crate) trait EnumExt: Enum + Copy {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum + Copy> EnumExt for T {}
