mod chain;
mod paused;
mod spawner;
mod timer;
use self::chain::{Chain, Facing, Role};
use self::paused::{PauseOpt, Paused};
use self::spawner::{Food, FoodSpawner, Obstacle, ObstacleSpawner};
use self::timer::GameTimer;
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::util::{center_rect, get_display_area, Globals, Viewport};
use crossterm::event::{poll, read, Event};
use glam::Vec2;
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::fmt::Write as _;
use std::time::Instant;

/// How long a pickup/hit notice stays in the message line
const NOTICE_DURATION: f32 = 1.5;

/// Something that happened during a simulation step.  Drained at the end of
/// each step; drives the message-line notices and is the hookup point for
/// sounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameEvent {
    /// The dog changed direction
    Turned,

    /// A segment of the given role was added to the chain
    Appended(Role),

    /// A segment of the given role was removed from the chain
    Removed(Role),
}

#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    globals: Globals,
    score: u32,
    chain: Chain,
    input_dir: Vec2,
    last_dir: Vec2,
    food: Vec<Food>,
    obstacles: Vec<Obstacle>,
    food_spawner: FoodSpawner,
    obstacle_spawner: ObstacleSpawner,
    timer: GameTimer,
    events: Vec<GameEvent>,
    notice: Option<Notice>,
    state: GameState,
    next_tick: Option<Instant>,
    new_best: bool,
    save_failed: bool,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(globals: Globals) -> Self {
        Game::new_with_rng(globals, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(globals: Globals, rng: R) -> Game<R> {
        let timer = GameTimer::new(globals.options.duration.as_secs_f32());
        Game {
            rng,
            globals,
            score: 0,
            chain: Chain::new(Vec2::ZERO, consts::SEGMENT_SPACING, consts::FOLLOW_RATE),
            input_dir: Vec2::ZERO,
            last_dir: Vec2::ZERO,
            food: Vec::new(),
            obstacles: Vec::new(),
            food_spawner: FoodSpawner::new(Vec2::ZERO),
            obstacle_spawner: ObstacleSpawner::new(),
            timer,
            events: Vec::new(),
            notice: None,
            state: GameState::Running,
            next_tick: None,
            new_best: false,
            save_failed: false,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.running() {
            if self.next_tick.is_none() {
                self.next_tick = Some(Instant::now() + consts::TICK_PERIOD);
            }
            let when = self.next_tick.expect("next_tick should be Some");
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Run one fixed simulation step
    fn advance(&mut self) {
        if !self.running() {
            return;
        }
        let dt = consts::TICK_SECONDS;
        self.move_head(dt);
        self.chain.advance(dt);
        self.dispatch_collisions();
        self.food_spawner.tick(
            &mut self.rng,
            dt,
            &mut self.food,
            self.globals.options.max_food.get(),
            Viewport::WORLD,
        );
        if self.globals.options.obstacles {
            self.obstacle_spawner
                .tick(&mut self.rng, dt, &mut self.obstacles, Viewport::WORLD);
        }
        self.timer.tick(dt);
        if self.timer.expired() {
            self.finish_round();
        }
        self.publish_events(dt);
    }

    /// Glide the head along the current direction and clamp it back into the
    /// world.  The head keeps its last direction when no input is held and
    /// stays put until the first input arrives.
    fn move_head(&mut self, dt: f32) {
        let dir = if self.input_dir != Vec2::ZERO {
            self.input_dir
        } else {
            self.last_dir
        };
        if dir == Vec2::ZERO {
            return;
        }
        let pos = self.chain.head_position() + dir * consts::MOVE_SPEED * dt;
        self.chain
            .set_head_position(Viewport::WORLD.clamp(pos, consts::X_PADDING, consts::Y_PADDING));
        if dir != self.last_dir {
            if let Some(facing) = Facing::from_vec(dir) {
                self.chain.set_facing(facing);
            }
            self.last_dir = dir;
            self.events.push(GameEvent::Turned);
        }
    }

    /// Turn overlaps into chain mutations and clock adjustments.
    ///
    /// Each colliding entity is removed from the world before its effects are
    /// applied, so one physical overlap fires exactly one mutation even if
    /// the overlap test would report it again — the chain itself does no
    /// deduplication.
    fn dispatch_collisions(&mut self) {
        let head = self.chain.head_position();
        while let Some(idx) = self
            .food
            .iter()
            .position(|item| item.pos.distance(head) < consts::FOOD_PICKUP_RADIUS)
        {
            self.food.swap_remove(idx);
            let role = self.chain.append();
            self.score += 1;
            self.timer.add_time(consts::TIMER_BONUS);
            self.events.push(GameEvent::Appended(role));
        }
        while let Some(idx) = self
            .obstacles
            .iter()
            .position(|obstacle| obstacle.pos.distance(head) < consts::OBSTACLE_RADIUS)
        {
            self.obstacles.swap_remove(idx);
            if let Some(role) = self.chain.remove_last() {
                self.events.push(GameEvent::Removed(role));
            }
            // the penalty applies even when the chain is already at minimum
            // length and nothing could be removed
            self.timer.add_time(-consts::TIMER_PENALTY);
        }
    }

    /// Drain the step's events into the message-line notice
    fn publish_events(&mut self, dt: f32) {
        if let Some(notice) = &mut self.notice {
            notice.ttl -= dt;
            if notice.ttl <= 0.0 {
                self.notice = None;
            }
        }
        for event in std::mem::take(&mut self.events) {
            match event {
                GameEvent::Appended(_) => {
                    self.notice = Some(Notice::new(format!("Snack! +{}s", consts::TIMER_BONUS)));
                }
                GameEvent::Removed(_) => {
                    self.notice = Some(Notice::new(format!("Bonk! -{}s", consts::TIMER_PENALTY)));
                }
                GameEvent::Turned => (),
            }
        }
    }

    fn finish_round(&mut self) {
        self.state = GameState::TimeUp;
        self.new_best = self.globals.scores.record(self.globals.options, self.score);
        if self.new_best && self.globals.config.save_scores() {
            self.save_failed = match self.globals.config.scores_file() {
                Some(path) => self.globals.scores.save(&path).is_err(),
                None => true,
            };
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match self.state {
            GameState::Running => {
                if event == Event::FocusLost {
                    self.pause();
                } else {
                    match Command::from_key_event(event.as_key_press_event()?)? {
                        Command::Quit => return Some(Screen::Quit),
                        Command::Up => self.input_dir = Vec2::Y,
                        Command::Down => self.input_dir = Vec2::new(0.0, -1.0),
                        Command::Left => self.input_dir = Vec2::new(-1.0, 0.0),
                        Command::Right => self.input_dir = Vec2::new(1.0, 0.0),
                        Command::Esc => self.pause(),
                        _ => (),
                    }
                }
            }
            GameState::Paused(ref mut paused) => match paused.handle_event(event)? {
                PauseOpt::Resume => self.state = GameState::Running,
                PauseOpt::Restart => return Some(Screen::Game(Game::new(self.globals.clone()))),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            GameState::TimeUp => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::R => return Some(Screen::Game(Game::new(self.globals.clone()))),
                Command::Quit | Command::Q => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }

    fn running(&self) -> bool {
        self.state == GameState::Running
    }

    fn pause(&mut self) {
        self.state = GameState::Paused(Paused::new());
    }
}

fn segment_symbol(role: Role, chain: &Chain) -> char {
    match role {
        Role::Head => chain.head_symbol(),
        Role::FrontLeg | Role::BackLeg => consts::LEG_SYMBOL,
        Role::Belly => consts::BELLY_SYMBOL,
        Role::Tail => consts::TAIL_SYMBOL,
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        let mut score_bar = format!(
            " Score: {}   Time: {}s",
            self.score,
            self.timer.display_secs()
        );
        if let Some(best) = self.globals.scores.get(self.globals.options) {
            let _ = write!(score_bar, "   Best: {best}");
        }
        Line::styled(score_bar, consts::SCORE_BAR_STYLE).render(score_area, buf);

        let block_size = Size {
            width: consts::GRID_WIDTH.saturating_add(2),
            height: consts::GRID_HEIGHT.saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let world_area = block_area.inner(Margin::new(1, 1));
        let mut world = Canvas {
            area: world_area,
            buf,
        };
        for obstacle in &self.obstacles {
            world.draw_world(obstacle.pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
        }
        for item in &self.food {
            if item.visible() {
                world.draw_world(item.pos, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
            }
        }
        // Draw the body back-to-front and the head last so the front of the
        // dog overdraws anything it overlaps
        for seg in self.chain.segments().iter().skip(1).rev() {
            world.draw_world(seg.pos, segment_symbol(seg.role, &self.chain), consts::DOG_STYLE);
        }
        world.draw_world(
            self.chain.head_position(),
            self.chain.head_symbol(),
            consts::DOG_STYLE,
        );

        match self.state {
            GameState::Running => {
                if let Some(notice) = &self.notice {
                    Span::from(format!(" {}", notice.text)).render(msg1_area, buf);
                }
            }
            GameState::Paused(paused) => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                paused.render(pause_area, buf);
            }
            GameState::TimeUp => {
                let mut line = Line::raw(" — TIME'S UP —");
                if self.new_best {
                    line.push_span("  New high score!");
                }
                if self.save_failed {
                    line.push_span("  (high scores were not saved)");
                }
                line.render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Choose One: Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

/// A transient message shown under the playfield
#[derive(Clone, Debug, PartialEq)]
struct Notice {
    text: String,
    ttl: f32,
}

impl Notice {
    fn new(text: String) -> Notice {
        Notice {
            text,
            ttl: NOTICE_DURATION,
        }
    }
}

/// Renders world-space positions onto the cell grid inside the playfield
/// border
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Project a world position onto the render grid.  Returns `None` for
    /// positions outside the world, which are simply not drawn.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cell_for(pos: Vec2) -> Option<Position> {
        let col = (pos.x + consts::WORLD_HALF_WIDTH) / (consts::WORLD_HALF_WIDTH * 2.0)
            * f32::from(consts::GRID_WIDTH);
        let row = (consts::WORLD_HALF_HEIGHT - pos.y) / (consts::WORLD_HALF_HEIGHT * 2.0)
            * f32::from(consts::GRID_HEIGHT);
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as u16, row as u16);
        (col < consts::GRID_WIDTH && row < consts::GRID_HEIGHT)
            .then_some(Position::new(col, row))
    }

    fn draw_world(&mut self, pos: Vec2, symbol: char, style: Style) {
        let Some(cell) = Self::cell_for(pos) else {
            return;
        };
        let Some(x) = self.area.x.checked_add(cell.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(cell.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    Paused(Paused),
    /// The clock ran out
    TimeUp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn test_game() -> Game<ChaCha12Rng> {
        Game::new_with_rng(Globals::default(), ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    /// A head position far enough from the food spawn disc that randomly
    /// spawned food can never collide with it
    const QUIET_CORNER: Vec2 = Vec2::new(5.0, -3.0);

    #[test]
    fn eating_grows_scores_and_extends_the_clock() {
        let mut game = test_game();
        game.chain.set_head_position(QUIET_CORNER);
        game.food.push(Food::new(QUIET_CORNER));
        game.advance();
        assert_eq!(game.score, 1);
        assert_eq!(game.chain.len(), 2);
        let expected = 60.0 - consts::TICK_SECONDS + consts::TIMER_BONUS;
        assert!((game.timer.remaining() - expected).abs() < 1e-4);
        assert!(game
            .notice
            .as_ref()
            .is_some_and(|notice| notice.text.starts_with("Snack!")));
    }

    #[test]
    fn three_snacks_make_a_four_segment_dog() {
        let mut game = test_game();
        game.chain.set_head_position(QUIET_CORNER);
        for _ in 0..3 {
            game.food.push(Food::new(QUIET_CORNER));
        }
        game.advance();
        assert_eq!(game.score, 3);
        assert_eq!(game.chain.len(), 4);
    }

    #[test]
    fn obstacle_hit_shrinks_and_penalizes() {
        let mut game = test_game();
        game.chain.set_head_position(QUIET_CORNER);
        game.chain.append();
        game.chain.append();
        game.obstacles.push(Obstacle::new(QUIET_CORNER));
        game.advance();
        assert_eq!(game.chain.len(), 2);
        let expected = 60.0 - consts::TICK_SECONDS - consts::TIMER_PENALTY;
        assert!((game.timer.remaining() - expected).abs() < 1e-4);
    }

    #[test]
    fn penalty_applies_even_at_minimum_length() {
        let mut game = test_game();
        game.chain.set_head_position(QUIET_CORNER);
        game.obstacles.push(Obstacle::new(QUIET_CORNER));
        game.advance();
        assert_eq!(game.chain.len(), 1);
        let expected = 60.0 - consts::TICK_SECONDS - consts::TIMER_PENALTY;
        assert!((game.timer.remaining() - expected).abs() < 1e-4);
        assert!(game.notice.is_none(), "nothing was removed");
    }

    #[test]
    fn input_steers_the_head() {
        let mut game = test_game();
        assert!(game
            .handle_event(Event::Key(KeyCode::Up.into()))
            .is_none());
        game.advance();
        assert_eq!(game.chain.facing(), Facing::Up);
        let moved = consts::MOVE_SPEED * consts::TICK_SECONDS;
        assert!((game.chain.head_position().y - moved).abs() < 1e-6);
    }

    #[test]
    fn head_is_stationary_before_first_input() {
        let mut game = test_game();
        game.advance();
        assert_eq!(game.chain.head_position(), Vec2::ZERO);
    }

    #[test]
    fn head_stops_at_the_world_edge() {
        let mut game = test_game();
        game.handle_event(Event::Key(KeyCode::Right.into()));
        for _ in 0..200 {
            game.advance();
        }
        let x = game.chain.head_position().x;
        assert!((x - (consts::WORLD_HALF_WIDTH - consts::X_PADDING)).abs() < 1e-4);
    }

    #[test]
    fn clock_expiry_ends_the_round_and_records_the_score() {
        let mut game = test_game();
        game.chain.set_head_position(QUIET_CORNER);
        game.food.push(Food::new(QUIET_CORNER));
        game.advance();
        game.timer = GameTimer::new(consts::TICK_SECONDS / 2.0);
        game.globals.config.disable_score_saving();
        game.advance();
        assert_eq!(game.state, GameState::TimeUp);
        assert!(game.new_best);
        assert!(!game.save_failed);
        assert_eq!(
            game.globals.scores.get(game.globals.options),
            std::num::NonZeroU32::new(1)
        );
    }

    #[test]
    fn pausing_freezes_the_simulation() {
        let mut game = test_game();
        game.handle_event(Event::Key(KeyCode::Right.into()));
        assert!(game.handle_event(Event::Key(KeyCode::Esc.into())).is_none());
        game.advance();
        assert_eq!(game.chain.head_position(), Vec2::ZERO);
        // Esc again resumes
        assert!(game.handle_event(Event::Key(KeyCode::Esc.into())).is_none());
        assert!(game.running());
    }

    #[test]
    fn focus_loss_pauses() {
        let mut game = test_game();
        assert!(game.handle_event(Event::FocusLost).is_none());
        assert!(matches!(game.state, GameState::Paused(_)));
    }

    #[test]
    fn quit_from_time_up() {
        let mut game = test_game();
        game.state = GameState::TimeUp;
        assert!(matches!(
            game.handle_event(Event::Key(KeyCode::Char('q').into())),
            Some(Screen::Quit)
        ));
    }

    mod render {
        use super::*;
        use pretty_assertions::assert_eq;

        fn empty_world_lines() -> Vec<String> {
            let mut lines = vec![
                format!("{:<80}", " Score: 0   Time: 60s"),
                " ".repeat(80),
            ];
            lines.push(format!("{:<80}", format!("       ┌{}┐", "─".repeat(64))));
            for _ in 0..18 {
                lines.push(format!("{:<80}", format!("       │{}│", " ".repeat(64))));
            }
            lines.push(format!("{:<80}", format!("       └{}┘", "─".repeat(64))));
            lines.push(" ".repeat(80));
            lines.push(" ".repeat(80));
            lines
        }

        #[test]
        fn new_game() {
            let game = test_game();
            let area = Rect::new(0, 0, 80, 24);
            let mut buffer = Buffer::empty(area);
            game.render(area, &mut buffer);
            let mut expected = Buffer::with_lines(empty_world_lines());
            expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
            // head at the world origin, facing right
            if let Some(cell) = expected.cell_mut((40, 12)) {
                cell.set_char(consts::DOG_HEAD_RIGHT_SYMBOL);
            }
            expected.set_style(Rect::new(40, 12, 1, 1), consts::DOG_STYLE);
            assert_eq!(buffer, expected);
        }

        #[test]
        fn time_up() {
            let mut game = test_game();
            game.score = 3;
            game.state = GameState::TimeUp;
            game.new_best = true;
            let area = Rect::new(0, 0, 80, 24);
            let mut buffer = Buffer::empty(area);
            game.render(area, &mut buffer);
            let mut lines = empty_world_lines();
            lines[0] = format!("{:<80}", " Score: 3   Time: 60s");
            lines[22] = format!("{:<80}", " — TIME'S UP —  New high score!");
            lines[23] = format!("{:<80}", " Choose One: Restart (r) — Quit (q)");
            let mut expected = Buffer::with_lines(lines);
            expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
            if let Some(cell) = expected.cell_mut((40, 12)) {
                cell.set_char(consts::DOG_HEAD_RIGHT_SYMBOL);
            }
            expected.set_style(Rect::new(40, 12, 1, 1), consts::DOG_STYLE);
            expected.set_style(Rect::new(22, 23, 1, 1), consts::KEY_STYLE);
            expected.set_style(Rect::new(33, 23, 1, 1), consts::KEY_STYLE);
            assert_eq!(buffer, expected);
        }

        #[test]
        fn paused() {
            let mut game = test_game();
            let area = Rect::new(0, 0, 80, 24);
            let mut buffer = Buffer::empty(area);
            assert!(game.handle_event(Event::Key(KeyCode::Esc.into())).is_none());
            game.render(area, &mut buffer);
            let mut lines = empty_world_lines();
            let popup = [
                "┌──── PAUSED ─────┐",
                "│ » Resume (Esc)  │",
                "│   Restart (r)   │",
                "│   Quit (q)      │",
                "└─────────────────┘",
            ];
            for (i, row) in popup.iter().enumerate() {
                // the popup sits inside the playfield border
                lines[10 + i] = format!(
                    "       │{}{}{}│       ",
                    " ".repeat(23),
                    row,
                    " ".repeat(22)
                );
            }
            let mut expected = Buffer::with_lines(lines);
            expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
            expected.set_style(Rect::new(43, 11, 3, 1), consts::KEY_STYLE);
            expected.set_style(Rect::new(33, 11, 15, 1), consts::MENU_SELECTION_STYLE);
            expected.set_style(Rect::new(44, 12, 1, 1), consts::KEY_STYLE);
            expected.set_style(Rect::new(41, 13, 1, 1), consts::KEY_STYLE);
            assert_eq!(buffer, expected);
        }
    }
}
