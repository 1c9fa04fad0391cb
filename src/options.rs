use crate::consts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gameplay options.
///
/// Also the key under which high scores are recorded, so that a score set on
/// a long round with obstacles off never shadows one from a harder setup.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Options {
    /// Starting time on the clock
    pub(crate) duration: RoundSeconds,

    /// The most food items present in the spawn area at once
    pub(crate) max_food: FoodQty,

    /// Whether obstacles are launched at all
    pub(crate) obstacles: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            duration: RoundSeconds::default(),
            max_food: FoodQty::default(),
            obstacles: true,
        }
    }
}

/// Round duration in seconds, restricted to a playable range
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub(crate) struct RoundSeconds(u32);

impl RoundSeconds {
    pub(crate) const MINIMUM: u32 = 5;
    pub(crate) const MAXIMUM: u32 = 3600;

    pub(crate) fn new(secs: u32) -> Option<RoundSeconds> {
        (Self::MINIMUM..=Self::MAXIMUM)
            .contains(&secs)
            .then_some(RoundSeconds(secs))
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_secs_f32(self) -> f32 {
        self.0 as f32
    }
}

impl Default for RoundSeconds {
    fn default() -> RoundSeconds {
        RoundSeconds(60)
    }
}

impl fmt::Display for RoundSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl TryFrom<u32> for RoundSeconds {
    type Error = String;

    fn try_from(secs: u32) -> Result<RoundSeconds, String> {
        RoundSeconds::new(secs).ok_or_else(|| {
            format!(
                "duration must be between {} and {} seconds",
                Self::MINIMUM,
                Self::MAXIMUM
            )
        })
    }
}

impl From<RoundSeconds> for u32 {
    fn from(secs: RoundSeconds) -> u32 {
        secs.0
    }
}

/// Food cap, restricted to `1..=MAX_FOOD`
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "usize", into = "usize")]
pub(crate) struct FoodQty(usize);

impl FoodQty {
    pub(crate) fn new(qty: usize) -> Option<FoodQty> {
        (1..=consts::MAX_FOOD).contains(&qty).then_some(FoodQty(qty))
    }

    pub(crate) fn get(self) -> usize {
        self.0
    }
}

impl Default for FoodQty {
    fn default() -> FoodQty {
        FoodQty(consts::MAX_FOOD)
    }
}

impl fmt::Display for FoodQty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl TryFrom<usize> for FoodQty {
    type Error = String;

    fn try_from(qty: usize) -> Result<FoodQty, String> {
        FoodQty::new(qty)
            .ok_or_else(|| format!("max-food must be between 1 and {}", consts::MAX_FOOD))
    }
}

impl From<FoodQty> for usize {
    fn from(qty: FoodQty) -> usize {
        qty.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(u32::from(opts.duration), 60);
        assert_eq!(opts.max_food.get(), consts::MAX_FOOD);
        assert!(opts.obstacles);
    }

    #[test]
    fn food_qty_bounds() {
        assert!(FoodQty::new(0).is_none());
        assert!(FoodQty::new(1).is_some());
        assert!(FoodQty::new(consts::MAX_FOOD).is_some());
        assert!(FoodQty::new(consts::MAX_FOOD + 1).is_none());
    }

    #[test]
    fn deserialize_partial_table() {
        let opts: Options = toml::from_str("duration = 90\n").unwrap();
        assert_eq!(opts.duration, RoundSeconds::new(90).unwrap());
        assert_eq!(opts.max_food, FoodQty::default());
        assert!(opts.obstacles);
    }

    #[test]
    fn deserialize_rejects_silly_duration() {
        assert!(toml::from_str::<Options>("duration = 0\n").is_err());
    }

    #[test]
    fn json_round_trip() {
        let opts = Options {
            duration: RoundSeconds::new(120).unwrap(),
            max_food: FoodQty::new(2).unwrap(),
            obstacles: false,
        };
        let src = serde_json::to_string(&opts).unwrap();
        assert_eq!(serde_json::from_str::<Options>(&src).unwrap(), opts);
    }
}
