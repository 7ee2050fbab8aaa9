//! Randomized launch parameters for new targets
//!
//! Horizontal velocity depends on which quarter of the field the target
//! spawns in, so every launch arcs back toward the center:
//!
//! ```text
//! | fast → | slow → | ← slow | ← fast |
//! 0       w/4     w/2     3w/4       w
//! ```
//!
//! Pure computation over an injected RNG; callers own the random source.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::KinematicsConfig;
use crate::error::{ConfigError, RangeError};

/// Uniform integer distribution over an inclusive `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformRange {
    min: i32,
    max: i32,
}

impl UniformRange {
    pub fn new(min: i32, max: i32) -> Result<Self, RangeError> {
        if min > max {
            return Err(RangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> i32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> i32 {
        self.max
    }

    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Horizontal quarter of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    FarLeft,
    CenterLeft,
    CenterRight,
    FarRight,
}

impl Lane {
    pub fn for_x(x: f32, field_width: f32) -> Self {
        let quarter = field_width / 4.0;
        if x < quarter {
            Lane::FarLeft
        } else if x < quarter * 2.0 {
            Lane::CenterLeft
        } else if x < quarter * 3.0 {
            Lane::CenterRight
        } else {
            Lane::FarRight
        }
    }

    /// +1 for rightward lanes, -1 for leftward
    pub fn direction(&self) -> f32 {
        match self {
            Lane::FarLeft | Lane::CenterLeft => 1.0,
            Lane::CenterRight | Lane::FarRight => -1.0,
        }
    }

    /// Outer lanes launch fast, inner lanes slow
    pub fn is_fast(&self) -> bool {
        matches!(self, Lane::FarLeft | Lane::FarRight)
    }
}

/// Initial body state handed to the physics delegate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

/// Validated launch sampler
#[derive(Debug, Clone)]
pub struct RandomKinematics {
    field_width: f32,
    spawn_x: UniformRange,
    spawn_y: f32,
    fast_lane: UniformRange,
    slow_lane: UniformRange,
    vertical: UniformRange,
    angular: UniformRange,
    velocity_scale: f32,
    angular_scale: f32,
}

impl RandomKinematics {
    /// Build from config; inverted ranges are rejected here, never at sample time
    pub fn new(config: &KinematicsConfig, field_width: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            field_width,
            spawn_x: config.spawn_x.to_range("kinematics.spawn_x")?,
            spawn_y: config.spawn_y,
            fast_lane: config.fast_lane.to_range("kinematics.fast_lane")?,
            slow_lane: config.slow_lane.to_range("kinematics.slow_lane")?,
            vertical: config.vertical.to_range("kinematics.vertical")?,
            angular: config.angular.to_range("kinematics.angular")?,
            velocity_scale: config.velocity_scale,
            angular_scale: config.angular_scale,
        })
    }

    /// Scaled horizontal speed bounds for a lane (magnitude, before direction)
    pub fn horizontal_speed_range(&self, lane: Lane) -> (f32, f32) {
        let range = if lane.is_fast() { self.fast_lane } else { self.slow_lane };
        (
            range.min() as f32 * self.velocity_scale,
            range.max() as f32 * self.velocity_scale,
        )
    }

    /// Scaled vertical speed bounds
    pub fn vertical_speed_range(&self) -> (f32, f32) {
        (
            self.vertical.min() as f32 * self.velocity_scale,
            self.vertical.max() as f32 * self.velocity_scale,
        )
    }

    /// Scaled angular velocity bounds
    pub fn angular_range(&self) -> (f32, f32) {
        (
            self.angular.min() as f32 * self.angular_scale,
            self.angular.max() as f32 * self.angular_scale,
        )
    }

    /// Random spawn point along the launch line
    pub fn spawn_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(self.spawn_x.sample(rng) as f32, self.spawn_y)
    }

    /// Launch velocity and spin for a target starting at column `x`
    pub fn launch_params_for<R: Rng + ?Sized>(&self, x: f32, rng: &mut R) -> LaunchParams {
        let lane = Lane::for_x(x, self.field_width);
        let speed_units = if lane.is_fast() {
            self.fast_lane.sample(rng)
        } else {
            self.slow_lane.sample(rng)
        };
        let vx = lane.direction() * speed_units as f32 * self.velocity_scale;
        let vy = self.vertical.sample(rng) as f32 * self.velocity_scale;
        let angular_velocity = self.angular.sample(rng) as f32 * self.angular_scale;

        LaunchParams {
            velocity: Vec2::new(vx, vy),
            angular_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIELD_WIDTH;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kinematics() -> RandomKinematics {
        RandomKinematics::new(&KinematicsConfig::default(), FIELD_WIDTH).unwrap()
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            UniformRange::new(5, 3),
            Err(RangeError::Inverted { min: 5, max: 3 })
        );
        assert!(UniformRange::new(4, 4).is_ok());
    }

    #[test]
    fn test_inverted_config_rejected_at_construction() {
        let mut config = KinematicsConfig::default();
        config.slow_lane = crate::config::RangeSpec::new(5, 3);
        assert!(matches!(
            RandomKinematics::new(&config, FIELD_WIDTH),
            Err(ConfigError::Range { field: "kinematics.slow_lane", .. })
        ));
    }

    #[test]
    fn test_single_value_range_always_returns_it() {
        let range = UniformRange::new(9, 9).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(range.sample(&mut rng), 9);
        }
    }

    #[test]
    fn test_lane_classification() {
        assert_eq!(Lane::for_x(50.0, 1024.0), Lane::FarLeft);
        assert_eq!(Lane::for_x(255.9, 1024.0), Lane::FarLeft);
        assert_eq!(Lane::for_x(256.0, 1024.0), Lane::CenterLeft);
        assert_eq!(Lane::for_x(600.0, 1024.0), Lane::CenterRight);
        assert_eq!(Lane::for_x(768.0, 1024.0), Lane::FarRight);
        assert_eq!(Lane::for_x(960.0, 1024.0), Lane::FarRight);
    }

    #[test]
    fn test_leftmost_quarter_launches_fast_rightward() {
        let k = kinematics();
        let mut rng = Pcg32::seed_from_u64(12345);
        let params = k.launch_params_for(50.0, &mut rng);
        assert!(params.velocity.x > 0.0);
        assert!(params.velocity.x >= 8.0 * 40.0 && params.velocity.x <= 15.0 * 40.0);
    }

    #[test]
    fn test_lane_directions_and_speeds() {
        let k = kinematics();
        let mut rng = Pcg32::seed_from_u64(7);
        for (x, min, max) in [
            (100.0, 320.0, 600.0),
            (400.0, 120.0, 200.0),
            (600.0, -200.0, -120.0),
            (900.0, -600.0, -320.0),
        ] {
            for _ in 0..50 {
                let vx = k.launch_params_for(x, &mut rng).velocity.x;
                assert!(vx >= min && vx <= max, "x={x} vx={vx}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_params() {
        let k = kinematics();
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for x in [64.0, 300.0, 700.0, 960.0] {
            assert_eq!(k.launch_params_for(x, &mut a), k.launch_params_for(x, &mut b));
        }
    }

    proptest! {
        #[test]
        fn prop_launch_params_within_bounds(seed: u64, x in 0.0f32..1024.0) {
            let k = kinematics();
            let mut rng = Pcg32::seed_from_u64(seed);
            let params = k.launch_params_for(x, &mut rng);

            let (vy_min, vy_max) = k.vertical_speed_range();
            prop_assert!(params.velocity.y >= vy_min && params.velocity.y <= vy_max);

            let (w_min, w_max) = k.angular_range();
            prop_assert!(params.angular_velocity >= w_min && params.angular_velocity <= w_max);

            let lane = Lane::for_x(x, FIELD_WIDTH);
            let (s_min, s_max) = k.horizontal_speed_range(lane);
            let speed = params.velocity.x.abs();
            prop_assert!(speed >= s_min && speed <= s_max);
            prop_assert_eq!(params.velocity.x.signum(), lane.direction());
        }

        #[test]
        fn prop_spawn_position_on_launch_line(seed: u64) {
            let k = kinematics();
            let mut rng = Pcg32::seed_from_u64(seed);
            let pos = k.spawn_position(&mut rng);
            prop_assert!(pos.x >= 64.0 && pos.x <= 960.0);
            prop_assert_eq!(pos.y, -128.0);
        }
    }
}
