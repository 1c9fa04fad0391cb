/// Countdown clock for a round.
///
/// Collisions push the deadline around: food adds a bonus, obstacles take a
/// penalty.  The clock never goes negative; once it hits zero the round is
/// over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct GameTimer {
    remaining: f32,
}

impl GameTimer {
    pub(crate) fn new(duration: f32) -> GameTimer {
        GameTimer {
            remaining: duration.max(0.0),
        }
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Remaining time in whole seconds, rounded up for display
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn display_secs(&self) -> u32 {
        self.remaining.ceil() as u32
    }

    pub(crate) fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance the clock by `dt` seconds.  Returns `true` if time just ran
    /// out.
    pub(crate) fn tick(&mut self, dt: f32) -> bool {
        if self.expired() {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.expired()
    }

    /// Add `delta` seconds to the clock; negative values take time away.
    pub(crate) fn add_time(&mut self, delta: f32) {
        self.remaining = (self.remaining + delta).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_down_and_expires() {
        let mut timer = GameTimer::new(1.0);
        assert!(!timer.tick(0.4));
        assert!(!timer.tick(0.4));
        assert!(timer.tick(0.4));
        assert!(timer.expired());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn expiry_fires_once() {
        let mut timer = GameTimer::new(0.1);
        assert!(timer.tick(0.2));
        assert!(!timer.tick(0.2));
    }

    #[test]
    fn display_rounds_up() {
        let mut timer = GameTimer::new(10.0);
        assert_eq!(timer.display_secs(), 10);
        timer.tick(0.05);
        assert_eq!(timer.display_secs(), 10);
        timer.tick(9.96);
        assert_eq!(timer.display_secs(), 0);
    }

    #[test]
    fn bonus_and_penalty() {
        let mut timer = GameTimer::new(10.0);
        timer.add_time(0.5);
        assert_eq!(timer.remaining(), 10.5);
        timer.add_time(-0.5);
        assert_eq!(timer.remaining(), 10.0);
    }

    #[test]
    fn penalty_floors_at_zero() {
        let mut timer = GameTimer::new(0.25);
        timer.add_time(-1.0);
        assert!(timer.expired());
        assert_eq!(timer.remaining(), 0.0);
    }
}
