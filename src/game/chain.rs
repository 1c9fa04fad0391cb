use crate::consts;
use glam::Vec2;

/// The four directions the dog can face.
///
/// The "up" vector is the direction a segment's back points in, used to
/// compute the trailing offset behind it.  Horizontal facings keep segments
/// stacked below; vertical facings rotate the trail sideways.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Facing {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl Facing {
    /// Convert a directional input vector into a facing.  Returns `None` for
    /// the zero vector.  Horizontal components win ties.
    pub(crate) fn from_vec(dir: Vec2) -> Option<Facing> {
        if dir.x > 0.0 {
            Some(Facing::Right)
        } else if dir.x < 0.0 {
            Some(Facing::Left)
        } else if dir.y < 0.0 {
            Some(Facing::Down)
        } else if dir.y > 0.0 {
            Some(Facing::Up)
        } else {
            None
        }
    }

    /// The local "up" vector for this facing
    pub(crate) fn up(self) -> Vec2 {
        match self {
            Facing::Right | Facing::Left => Vec2::Y,
            Facing::Down => Vec2::new(-1.0, 0.0),
            Facing::Up => Vec2::new(1.0, 0.0),
        }
    }

    /// Whether sprites should be mirrored horizontally for this facing
    fn flipped(self) -> bool {
        self == Facing::Right
    }
}

/// What a chain element is: the head, a leg pair, a swallowed piece of food,
/// or the tail.  Roles are assigned at construction and never re-queried by
/// scanning tags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Role {
    Head,
    FrontLeg,
    Belly,
    BackLeg,
    Tail,
}

/// One element of the chain
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    /// World position
    pub(crate) pos: Vec2,

    /// Orientation; the trailing segment's target hangs off `pos - up * spacing`
    pub(crate) up: Vec2,

    /// Cosmetic horizontal mirror
    pub(crate) flipped: bool,

    pub(crate) role: Role,
}

/// The dog: a head segment followed by a smooth trail of body segments.
///
/// The head is always at index 0 and is never removed.  Every trailing
/// segment chases the position a fixed spacing behind its predecessor,
/// approaching it with exponential smoothing rather than teleporting, so the
/// body lags and bends instead of following grid cells.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Chain {
    segments: Vec<Segment>,

    /// Which way the head is facing
    facing: Facing,

    /// Target distance between consecutive segments
    spacing: f32,

    /// Smoothing coefficient for the follow lerp
    follow_rate: f32,
}

impl Chain {
    /// Create a length-1 chain with its head at `head`
    pub(crate) fn new(head: Vec2, spacing: f32, follow_rate: f32) -> Chain {
        let facing = Facing::default();
        Chain {
            segments: vec![Segment {
                pos: head,
                up: facing.up(),
                flipped: facing.flipped(),
                role: Role::Head,
            }],
            facing,
            spacing,
            follow_rate,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn head_position(&self) -> Vec2 {
        self.segments[0].pos
    }

    pub(crate) fn set_head_position(&mut self, pos: Vec2) {
        self.segments[0].pos = pos;
    }

    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    /// Return the glyph to use for drawing the head
    pub(crate) fn head_symbol(&self) -> char {
        match self.facing {
            Facing::Right => consts::DOG_HEAD_RIGHT_SYMBOL,
            Facing::Left => consts::DOG_HEAD_LEFT_SYMBOL,
            Facing::Up => consts::DOG_HEAD_UP_SYMBOL,
            Facing::Down => consts::DOG_HEAD_DOWN_SYMBOL,
        }
    }

    /// Turn the head to face `facing` and mirror the flip/rotation onto the
    /// body pieces that track it: the first segment and the back legs mirror
    /// horizontal flips, and on a long enough chain the last segment rotates
    /// with the head.  Absent roles are skipped.
    pub(crate) fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        self.segments[0].up = facing.up();
        self.segments[0].flipped = facing.flipped();
        let horizontal = matches!(facing, Facing::Left | Facing::Right);
        if horizontal {
            if let Some(first) = self.segments.get_mut(1) {
                first.flipped = facing.flipped();
            }
            if let Some(back) = self
                .segments
                .iter_mut()
                .find(|seg| seg.role == Role::BackLeg)
            {
                back.flipped = facing.flipped();
            }
        }
        if self.segments.len() > 3 {
            let last = self
                .segments
                .last_mut()
                .expect("chain always has at least a head");
            last.up = facing.up();
            last.flipped = horizontal && facing.flipped();
        }
    }

    /// The point a new segment trailing `self.segments[index]` should start at
    fn position_behind(&self, index: usize) -> Vec2 {
        let anchor = self.segments[index];
        anchor.pos - anchor.up * self.spacing
    }

    fn has_role(&self, role: Role) -> bool {
        self.segments.iter().any(|seg| seg.role == role)
    }

    /// Insert a role segment, keeping an existing tail segment last
    fn insert_before_tail(&mut self, seg: Segment) {
        if self.segments.last().is_some_and(|s| s.role == Role::Tail) {
            let idx = self.segments.len() - 1;
            self.segments.insert(idx, seg);
        } else {
            self.segments.push(seg);
        }
    }

    /// Grow the chain by one segment.  Missing role segments are restored
    /// first, in body order (front legs, back legs, tail); once all three are
    /// present, belly segments are inserted just behind the front legs so the
    /// tail stays last.  The new segment starts at its anchor's trailing
    /// offset rather than at the origin.
    ///
    /// Returns the role of the segment that was added.
    pub(crate) fn append(&mut self) -> Role {
        if !self.has_role(Role::FrontLeg) {
            let seg = Segment {
                pos: self.position_behind(0),
                up: Vec2::Y,
                flipped: self.segments[0].flipped,
                role: Role::FrontLeg,
            };
            self.insert_before_tail(seg);
            return Role::FrontLeg;
        }
        if !self.has_role(Role::BackLeg) {
            let seg = Segment {
                pos: self.position_behind(1),
                up: Vec2::Y,
                flipped: self.segments[1].flipped,
                role: Role::BackLeg,
            };
            self.insert_before_tail(seg);
            return Role::BackLeg;
        }
        if !self.has_role(Role::Tail) {
            let seg = Segment {
                pos: self.position_behind(self.segments.len() - 1),
                up: Vec2::Y,
                flipped: false,
                role: Role::Tail,
            };
            self.segments.push(seg);
            return Role::Tail;
        }
        let seg = Segment {
            pos: self.position_behind(1),
            up: Vec2::Y,
            flipped: false,
            role: Role::Belly,
        };
        self.segments.insert(2, seg);
        Role::Belly
    }

    /// Shrink the chain by one segment, undoing an append: the most recently
    /// inserted belly segment goes first; with no belly left, the final role
    /// segment is dropped, walking the growth stages back in reverse.  The
    /// tail is only ever last, so no roles need reassigning.  A length-1
    /// chain is left alone — the head is never removable.
    ///
    /// Returns the role of the segment that was removed, if any.
    pub(crate) fn remove_last(&mut self) -> Option<Role> {
        if self.segments.len() == 1 {
            return None;
        }
        if let Some(idx) = self
            .segments
            .iter()
            .rposition(|seg| seg.role == Role::Belly)
        {
            let seg = self.segments.remove(idx);
            return Some(seg.role);
        }
        let seg = self
            .segments
            .pop()
            .expect("chain has more than one segment");
        Some(seg.role)
    }

    /// Drag every trailing segment toward the point a fixed spacing behind
    /// its predecessor.  With `follow_rate * dt < 1` each segment covers only
    /// part of the remaining distance, which is what makes the body trail
    /// smoothly.  A length-1 chain and a zero `dt` are both no-ops.
    pub(crate) fn advance(&mut self, dt: f32) {
        let t = (self.follow_rate * dt).min(1.0);
        for i in 1..self.segments.len() {
            let prev = self.segments[i - 1];
            let target = prev.pos - prev.up * self.spacing;
            let seg = &mut self.segments[i];
            seg.pos = seg.pos.lerp(target, t);
        }
    }
}
