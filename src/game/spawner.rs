use crate::consts;
use crate::util::Viewport;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// A food pickup.  Fresh food flashes for a moment so the player notices it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Food {
    pub(crate) pos: Vec2,
    age: f32,
}

impl Food {
    pub(crate) fn new(pos: Vec2) -> Food {
        Food { pos, age: 0.0 }
    }

    fn tick(&mut self, dt: f32) {
        self.age += dt;
    }

    /// Whether the pickup should be drawn this frame.  While the spawn flash
    /// lasts, visibility toggles every flash period; afterwards the food is
    /// always visible.
    pub(crate) fn visible(&self) -> bool {
        if self.age >= consts::FOOD_FLASH_DURATION {
            return true;
        }
        self.age % (2.0 * consts::FOOD_FLASH_PERIOD) < consts::FOOD_FLASH_PERIOD
    }
}

/// Periodically drops food pickups in a disc around a spawn center.
///
/// Placement is rejection sampling with a bounded number of attempts: a
/// uniform polar sample is rejected if it falls outside the padded viewport
/// or too close to existing food.  If every attempt fails, no food is
/// spawned this cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FoodSpawner {
    center: Vec2,
    until_next: f32,
}

impl FoodSpawner {
    pub(crate) fn new(center: Vec2) -> FoodSpawner {
        FoodSpawner {
            center,
            until_next: 0.0,
        }
    }

    pub(crate) fn tick<R: Rng>(
        &mut self,
        rng: &mut R,
        dt: f32,
        food: &mut Vec<Food>,
        max_food: usize,
        viewport: Viewport,
    ) {
        for item in &mut *food {
            item.tick(dt);
        }
        self.until_next -= dt;
        if self.until_next > 0.0 {
            return;
        }
        self.until_next = consts::FOOD_SPAWN_DELAY;
        let nearby = food
            .iter()
            .filter(|item| item.pos.distance(self.center) <= consts::FOOD_SPAWN_RADIUS)
            .count();
        if nearby >= max_food {
            return;
        }
        for _ in 0..consts::PLACEMENT_ATTEMPTS {
            let angle = rng.random_range(0.0..TAU);
            let dist = rng.random_range(0.0..consts::FOOD_SPAWN_RADIUS);
            let pos = self.center + Vec2::new(angle.cos(), angle.sin()) * dist;
            if !viewport.contains(pos, consts::X_PADDING, consts::Y_PADDING) {
                continue;
            }
            if food
                .iter()
                .any(|item| item.pos.distance(pos) < consts::MIN_FOOD_GAP)
            {
                continue;
            }
            food.push(Food::new(pos));
            break;
        }
    }
}

/// A hazard drifting right-to-left across the world
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Obstacle {
    pub(crate) pos: Vec2,
    age: f32,
}

impl Obstacle {
    pub(crate) fn new(pos: Vec2) -> Obstacle {
        Obstacle { pos, age: 0.0 }
    }

    fn tick(&mut self, dt: f32) {
        self.pos.x -= consts::OBSTACLE_SPEED * dt;
        self.age += dt;
    }

    fn expired(&self, viewport: Viewport) -> bool {
        self.age >= consts::OBSTACLE_LIFESPAN || self.pos.x < -(viewport.half_width + 1.0)
    }
}

/// Launches obstacles from just past the right world edge at a fixed
/// interval and prunes them once they expire or leave the world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ObstacleSpawner {
    until_next: f32,
}

impl ObstacleSpawner {
    pub(crate) fn new() -> ObstacleSpawner {
        ObstacleSpawner { until_next: 0.0 }
    }

    pub(crate) fn tick<R: Rng>(
        &mut self,
        rng: &mut R,
        dt: f32,
        obstacles: &mut Vec<Obstacle>,
        viewport: Viewport,
    ) {
        for obstacle in &mut *obstacles {
            obstacle.tick(dt);
        }
        obstacles.retain(|obstacle| !obstacle.expired(viewport));
        self.until_next -= dt;
        if self.until_next > 0.0 {
            return;
        }
        self.until_next = consts::OBSTACLE_SPAWN_INTERVAL;
        let span = viewport.half_height - consts::OBSTACLE_RADIUS;
        let y = rng.random_range(-span..span);
        obstacles.push(Obstacle::new(Vec2::new(viewport.half_width + 1.0, y)));
    }
}
