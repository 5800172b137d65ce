//! Impact dispatcher: the click shockwave.
//!
//! A press advances the theme and then pushes every registered body away
//! from the pointer with a linear falloff:
//!
//! ```text
//! d        = |body - center|
//! strength = (1 - d / 18) * 150        for d < 18, nothing otherwise
//! impulse  = normalize(body - center) * strength
//! torque   = (rand - 0.5, rand - 0.5, rand - 0.5) * strength * 8
//! ```
//!
//! A body that fails mid-dispatch (destroyed in the same frame, say) is
//! skipped and the wave carries on with the rest.

use glam::Vec3;
use rand::Rng;

use crate::error::SceneError;
use crate::physics::{BodyHandle, RigidBodies};
use crate::registry::BodyRegistry;
use crate::theme::ThemeBroadcast;

/// Shape of the shockwave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactParams {
    /// Bodies at or beyond this distance are untouched.
    pub radius: f32,
    /// Impulse magnitude at the center.
    pub max_strength: f32,
    /// Torque magnitude per unit of strength.
    pub torque_factor: f32,
}

impl Default for ImpactParams {
    fn default() -> Self {
        Self {
            radius: 18.0,
            max_strength: 150.0,
            torque_factor: 8.0,
        }
    }
}

impl ImpactParams {
    /// Linear falloff: `max_strength` at 0, zero at `radius` and beyond.
    #[inline]
    pub fn strength_at(&self, distance: f32) -> f32 {
        ((1.0 - distance / self.radius) * self.max_strength).max(0.0)
    }

    /// Whether a body at `distance` is hit at all.
    #[inline]
    pub fn in_range(&self, distance: f32) -> bool {
        distance < self.radius
    }
}

/// What happened to one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyImpact {
    /// Impulse and torque applied with this strength.
    Hit { strength: f32 },
    /// Too far from the center.
    OutOfRange,
}

/// Counters of one dispatch, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImpactSummary {
    /// Theme index after the advance.
    pub theme_index: usize,
    /// Bodies that received an impulse.
    pub affected: usize,
    /// Bodies beyond the radius.
    pub out_of_range: usize,
    /// Bodies skipped because of a fault.
    pub skipped: usize,
}

impl ImpactSummary {
    pub(crate) fn record(&mut self, outcome: Result<BodyImpact, SceneError>) {
        match outcome {
            Ok(BodyImpact::Hit { .. }) => self.affected += 1,
            Ok(BodyImpact::OutOfRange) => self.out_of_range += 1,
            Err(err) => {
                log::trace!("Shockwave skipped a body: {}", err);
                self.skipped += 1;
            }
        }
    }
}

/// Applies shockwaves. Stateless apart from its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImpactDispatcher {
    params: ImpactParams,
}

impl ImpactDispatcher {
    pub fn new(params: ImpactParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ImpactParams {
        &self.params
    }

    /// Handle one press: flip the sound flag on first use, advance the theme
    /// by one, then hit every registered body from `center`.
    ///
    /// The theme advances exactly once per call, even with no bodies.
    pub fn dispatch<B, R>(
        &self,
        registry: &mut BodyRegistry,
        bodies: &mut B,
        center: Vec3,
        theme: &ThemeBroadcast,
        rng: &mut R,
    ) -> ImpactSummary
    where
        B: RigidBodies + ?Sized,
        R: Rng,
    {
        theme.enable_sound();
        let mut summary = ImpactSummary {
            theme_index: theme.advance(),
            ..ImpactSummary::default()
        };

        registry.for_each(|_, _, handle| {
            summary.record(self.apply_to_body(bodies, handle, center, rng));
        });

        log::debug!(
            "Impact at ({:.2}, {:.2}): theme {}, {} hit, {} out of range, {} skipped",
            center.x,
            center.y,
            summary.theme_index,
            summary.affected,
            summary.out_of_range,
            summary.skipped
        );
        summary
    }

    /// Hit a single body.
    pub fn apply_to_body<B, R>(
        &self,
        bodies: &mut B,
        handle: BodyHandle,
        center: Vec3,
        rng: &mut R,
    ) -> Result<BodyImpact, SceneError>
    where
        B: RigidBodies + ?Sized,
        R: Rng,
    {
        let offset = bodies.translation(handle)? - center;
        let distance = offset.length();
        if !self.params.in_range(distance) {
            return Ok(BodyImpact::OutOfRange);
        }

        let strength = self.params.strength_at(distance);
        bodies.apply_impulse(handle, offset.normalize_or_zero() * strength)?;

        let jitter = Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        );
        bodies.apply_torque_impulse(handle, jitter * strength * self.params.torque_factor)?;

        Ok(BodyImpact::Hit { strength })
    }
}
