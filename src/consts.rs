//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Length of one simulation step
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(50);

/// [`TICK_PERIOD`] as the `dt` fed to the simulation
pub(crate) const TICK_SECONDS: f32 = 0.05;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Half the world's width in world units; the world is centered on the origin
pub(crate) const WORLD_HALF_WIDTH: f32 = 8.0;

/// Half the world's height in world units
pub(crate) const WORLD_HALF_HEIGHT: f32 = 4.5;

/// Width of the render grid in cells; the 16-unit world maps to 4 cells per
/// unit
pub(crate) const GRID_WIDTH: u16 = 64;

/// Height of the render grid in cells; the 9-unit world maps to 2 cells per
/// unit
pub(crate) const GRID_HEIGHT: u16 = 18;

/// How fast the dog moves, in world units per second
pub(crate) const MOVE_SPEED: f32 = 2.0;

/// Target distance between consecutive chain segments
pub(crate) const SEGMENT_SPACING: f32 = 0.5;

/// Smoothing coefficient for segments chasing their trailing offset
pub(crate) const FOLLOW_RATE: f32 = 6.0;

/// Horizontal margin kept between the dog and the world edge
pub(crate) const X_PADDING: f32 = 0.5;

/// Vertical margin kept between the dog and the world edge
pub(crate) const Y_PADDING: f32 = 0.1;

/// Seconds added to the clock for each food pickup
pub(crate) const TIMER_BONUS: f32 = 0.5;

/// Seconds taken from the clock for each obstacle hit
pub(crate) const TIMER_PENALTY: f32 = 0.5;

/// Time between food spawn attempts
pub(crate) const FOOD_SPAWN_DELAY: f32 = 5.0;

/// How long freshly spawned food flashes
pub(crate) const FOOD_FLASH_DURATION: f32 = 1.5;

/// Flash on/off period for fresh food
pub(crate) const FOOD_FLASH_PERIOD: f32 = 0.2;

/// Radius of the disc food is spawned in, around the world origin
pub(crate) const FOOD_SPAWN_RADIUS: f32 = 5.0;

/// The most food items allowed in the spawn disc at once
pub(crate) const MAX_FOOD: usize = 5;

/// Minimum distance between food items; stops overlapping
pub(crate) const MIN_FOOD_GAP: f32 = 0.5;

/// Placement attempts per spawn cycle before giving up
pub(crate) const PLACEMENT_ATTEMPTS: usize = 10;

/// The dog picks up food within this distance of its head
pub(crate) const FOOD_PICKUP_RADIUS: f32 = 0.4;

/// How fast obstacles drift leftwards, in world units per second
pub(crate) const OBSTACLE_SPEED: f32 = 4.0;

/// Time between obstacle launches
pub(crate) const OBSTACLE_SPAWN_INTERVAL: f32 = 10.0;

/// Obstacles are pruned after this long on screen
pub(crate) const OBSTACLE_LIFESPAN: f32 = 20.0;

/// An obstacle hits the dog within this distance of its head
pub(crate) const OBSTACLE_RADIUS: f32 = 0.5;

/// Glyph for the dog's head when it is facing right
pub(crate) const DOG_HEAD_RIGHT_SYMBOL: char = '>';

/// Glyph for the dog's head when it is facing left
pub(crate) const DOG_HEAD_LEFT_SYMBOL: char = '<';

/// Glyph for the dog's head when it is facing up
pub(crate) const DOG_HEAD_UP_SYMBOL: char = '^';

/// Glyph for the dog's head when it is facing down
pub(crate) const DOG_HEAD_DOWN_SYMBOL: char = 'v';

/// Glyph for the leg segments
pub(crate) const LEG_SYMBOL: char = 'n';

/// Glyph for swallowed-food belly segments
pub(crate) const BELLY_SYMBOL: char = '⚬';

/// Glyph for the tail segment
pub(crate) const TAIL_SYMBOL: char = '~';

/// Glyph for food pickups
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for obstacles
pub(crate) const OBSTACLE_SYMBOL: char = '█';

/// Style for the dog's head and body
pub(crate) const DOG_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Style for food pickups
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Cyan);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
