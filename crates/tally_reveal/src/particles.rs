//! Floating glyph particles
//!
//! A spawner drops short-lived glyphs at random positions in a container on
//! a fixed cadence. Each particle drifts upward, sideways and round while
//! fading from opaque to transparent, then is discarded. The spawner only
//! produces particles; it keeps no reference to them once emitted.

use std::ops::Range;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use slotmap::new_key_type;
use smallvec::SmallVec;
use tally_animation::Easing;

use crate::error::{Result, RevealError};

new_key_type! {
    /// Handle to a live particle
    pub struct ParticleId;
}

/// Glyphs drawn by default: currency, digits, arithmetic, and a few emoji
pub const DEFAULT_GLYPHS: &[&str] = &[
    "$", "€", "£", "¥", "%", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "+", "-", "=",
    "×", "÷", ".00", ".99", ",", "📊", "📈", "💰", "💵", "💳",
];

/// Spawner settings
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub glyphs: Vec<String>,
    /// Time between regular spawns
    pub spawn_interval: Duration,
    /// Particles spawned right after start
    pub burst_count: u32,
    /// Gap between burst spawns
    pub burst_stagger: Duration,
    /// Font size range in pixels
    pub font_size: Range<f32>,
    /// Upward travel range in pixels
    pub rise: Range<f32>,
    /// Horizontal travel range in pixels, negative is left
    pub drift: Range<f32>,
    /// Final rotation range in degrees
    pub rotation: Range<f32>,
    /// Lifetime range in seconds
    pub lifetime: Range<f32>,
    pub easing: Easing,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_GLYPHS.iter().map(|g| g.to_string()).collect(),
            spawn_interval: Duration::from_millis(400),
            burst_count: 15,
            burst_stagger: Duration::from_millis(100),
            font_size: 20.0..50.0,
            rise: 100.0..300.0,
            drift: -50.0..50.0,
            rotation: -180.0..180.0,
            lifetime: 4.0..7.0,
            easing: Easing::EaseOutQuad,
        }
    }
}

impl ParticleConfig {
    pub fn with_glyphs<I, S>(mut self, glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.glyphs = glyphs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.spawn_interval = interval;
        self
    }

    pub fn with_burst(mut self, count: u32, stagger: Duration) -> Self {
        self.burst_count = count;
        self.burst_stagger = stagger;
        self
    }

    pub fn with_lifetime(mut self, seconds: Range<f32>) -> Self {
        self.lifetime = seconds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.glyphs.is_empty() {
            return Err(RevealError::EmptyGlyphSet);
        }
        if self.spawn_interval.is_zero() {
            return Err(RevealError::ZeroSpawnInterval);
        }
        check_range("font size", &self.font_size)?;
        check_range("rise", &self.rise)?;
        check_range("drift", &self.drift)?;
        check_range("rotation", &self.rotation)?;
        check_range("lifetime", &self.lifetime)?;
        if self.lifetime.start <= 0.0 || self.font_size.start <= 0.0 {
            let (name, range) = if self.lifetime.start <= 0.0 {
                ("lifetime", &self.lifetime)
            } else {
                ("font size", &self.font_size)
            };
            return Err(RevealError::InvalidRange {
                name,
                start: range.start,
                end: range.end,
            });
        }
        // Every sampled lifetime must fit in a Duration
        if Duration::try_from_secs_f32(self.lifetime.end).is_err() {
            return Err(RevealError::InvalidRange {
                name: "lifetime",
                start: self.lifetime.start,
                end: self.lifetime.end,
            });
        }
        Ok(())
    }
}

fn check_range(name: &'static str, range: &Range<f32>) -> Result<()> {
    let width = range.end - range.start;
    if range.start.is_finite() && range.end.is_finite() && width.is_finite() && width >= 0.0 {
        Ok(())
    } else {
        Err(RevealError::InvalidRange {
            name,
            start: range.start,
            end: range.end,
        })
    }
}

/// Uniform sample; an empty range yields its start
fn sample(rng: &mut StdRng, range: &Range<f32>) -> f32 {
    if range.start < range.end {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}

/// Rendered state of a particle at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    /// Horizontal offset from the spawn point in pixels
    pub offset_x: f32,
    /// Vertical offset from the spawn point in pixels, negative is up
    pub offset_y: f32,
    /// Rotation in degrees
    pub rotation: f32,
    pub opacity: f32,
}

/// One floating glyph
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleInstance {
    pub glyph: String,
    /// Spawn position as percentages of the container, in `[0, 100)`
    pub x_percent: f32,
    pub y_percent: f32,
    pub font_size: f32,
    /// Total travel over the lifetime: `(drift, -rise)`
    pub velocity: (f32, f32),
    /// Total rotation over the lifetime in degrees
    pub rotation_delta: f32,
    pub lifetime: Duration,
    pub age: Duration,
    pub easing: Easing,
}

impl ParticleInstance {
    /// Get normalized age (0 = just spawned, 1 = done)
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime.is_zero() || self.age >= self.lifetime {
            1.0
        } else {
            (self.age.as_secs_f64() / self.lifetime.as_secs_f64()) as f32
        }
    }

    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }

    pub fn advance(&mut self, dt: Duration) {
        self.age = self.age.saturating_add(dt).min(self.lifetime);
    }

    /// Current frame; opacity is exactly 0 once the lifetime is reached
    pub fn frame(&self) -> ParticleFrame {
        let eased = self.easing.apply(self.normalized_age());
        ParticleFrame {
            offset_x: self.velocity.0 * eased,
            offset_y: self.velocity.1 * eased,
            rotation: self.rotation_delta * eased,
            opacity: 1.0 - eased,
        }
    }
}

/// Emission schedule for one backdrop
#[derive(Debug)]
pub struct ParticleSpawner {
    config: ParticleConfig,
    rng: StdRng,
    elapsed: Duration,
    since_spawn: Duration,
    burst_emitted: u32,
    total_emitted: u64,
    started: bool,
    stopped: bool,
}

impl ParticleSpawner {
    pub fn new(config: ParticleConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            elapsed: Duration::ZERO,
            since_spawn: Duration::ZERO,
            burst_emitted: 0,
            total_emitted: 0,
            started: false,
            stopped: false,
        })
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn total_emitted(&self) -> u64 {
        self.total_emitted
    }

    /// Halt all future spawns, pending burst spawns included
    pub fn stop(&mut self) -> bool {
        !std::mem::replace(&mut self.stopped, true)
    }

    /// Advance the schedule and return the particles due in this step
    ///
    /// Burst spawn `i` is due `i * burst_stagger` after start; regular
    /// spawns fall every `spawn_interval`, the first one interval after start.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[ParticleInstance; 4]> {
        let mut spawned = SmallVec::new();
        if self.stopped {
            return spawned;
        }

        // The first step marks the start; its delta predates the spawner
        if self.started {
            self.elapsed += dt;
            self.since_spawn += dt;
        }
        self.started = true;

        while self.burst_emitted < self.config.burst_count
            && self.config.burst_stagger.saturating_mul(self.burst_emitted) <= self.elapsed
        {
            self.burst_emitted += 1;
            spawned.push(self.spawn());
        }

        while self.since_spawn >= self.config.spawn_interval {
            self.since_spawn -= self.config.spawn_interval;
            spawned.push(self.spawn());
        }

        if !spawned.is_empty() {
            tracing::trace!(count = spawned.len(), "particles spawned");
        }
        spawned
    }

    fn spawn(&mut self) -> ParticleInstance {
        self.total_emitted += 1;
        let index = self.rng.gen_range(0..self.config.glyphs.len());
        let glyph = self.config.glyphs[index].clone();
        let rise = sample(&mut self.rng, &self.config.rise);
        let drift = sample(&mut self.rng, &self.config.drift);
        let lifetime = sample(&mut self.rng, &self.config.lifetime);

        ParticleInstance {
            glyph,
            x_percent: self.rng.gen_range(0.0..100.0),
            y_percent: self.rng.gen_range(0.0..100.0),
            font_size: sample(&mut self.rng, &self.config.font_size),
            velocity: (drift, -rise),
            rotation_delta: sample(&mut self.rng, &self.config.rotation),
            lifetime: Duration::try_from_secs_f32(lifetime).unwrap_or(Duration::MAX),
            age: Duration::ZERO,
            easing: self.config.easing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawner(config: ParticleConfig) -> ParticleSpawner {
        ParticleSpawner::new(config, StdRng::seed_from_u64(7)).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ParticleConfig::default().validate().is_ok());
        assert_eq!(ParticleConfig::default().glyphs.len(), 28);
    }

    #[test]
    fn test_validation_errors() {
        let empty = ParticleConfig::default().with_glyphs(Vec::<String>::new());
        assert_eq!(empty.validate(), Err(RevealError::EmptyGlyphSet));

        let zero = ParticleConfig::default().with_interval(Duration::ZERO);
        assert_eq!(zero.validate(), Err(RevealError::ZeroSpawnInterval));

        let reversed = ParticleConfig {
            rise: 300.0..100.0,
            ..Default::default()
        };
        assert!(matches!(
            reversed.validate(),
            Err(RevealError::InvalidRange { name: "rise", .. })
        ));

        let instant = ParticleConfig::default().with_lifetime(0.0..1.0);
        assert!(matches!(
            instant.validate(),
            Err(RevealError::InvalidRange {
                name: "lifetime",
                ..
            })
        ));
    }

    #[test]
    fn test_unrepresentable_ranges_rejected() {
        let forever = ParticleConfig::default().with_lifetime(1e20..2e20);
        assert!(matches!(
            forever.validate(),
            Err(RevealError::InvalidRange {
                name: "lifetime",
                ..
            })
        ));

        let wide = ParticleConfig {
            drift: -3e38..3e38,
            ..Default::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(RevealError::InvalidRange { name: "drift", .. })
        ));
        assert!(ParticleSpawner::new(forever, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_long_lifetime_spawns() {
        let config = ParticleConfig::default().with_lifetime(1e9..1e9);
        let mut spawner = spawner(config);
        let particle = spawner.advance(ms(16)).remove(0);
        assert_eq!(particle.lifetime, Duration::from_secs(1_000_000_000));
    }

    #[test]
    fn test_burst_then_interval() {
        let mut spawner = spawner(ParticleConfig::default());

        // burst spawn 0 is due immediately
        assert_eq!(spawner.advance(ms(16)).len(), 1);
        let mut total = 1;
        for _ in 0..14 {
            total += spawner.advance(ms(100)).len();
        }
        // 1.4s in: 15 burst spawns and 3 interval spawns
        assert_eq!(total, 18);
        assert_eq!(spawner.total_emitted(), 18);
    }

    #[test]
    fn test_stop_cancels_pending_burst() {
        let mut spawner = spawner(ParticleConfig::default());
        assert_eq!(spawner.advance(ms(16)).len(), 1);
        assert!(spawner.stop());
        assert!(!spawner.stop());
        assert!(spawner.advance(ms(5000)).is_empty());
        assert_eq!(spawner.total_emitted(), 1);
    }

    #[test]
    fn test_particle_values_within_ranges() {
        let config = ParticleConfig::default().with_burst(40, Duration::ZERO);
        let mut spawner = spawner(config.clone());
        let particles = spawner.advance(ms(16));
        assert_eq!(particles.len(), 40);
        for p in &particles {
            assert!(config.glyphs.contains(&p.glyph));
            assert!((0.0..100.0).contains(&p.x_percent));
            assert!((0.0..100.0).contains(&p.y_percent));
            assert!(config.font_size.contains(&p.font_size));
            assert!(p.velocity.1 <= -100.0 && p.velocity.1 > -300.0);
            assert!(p.lifetime >= Duration::from_secs(4) && p.lifetime <= Duration::from_secs(7));
        }
    }

    #[test]
    fn test_particle_fades_to_zero_at_lifetime() {
        let mut spawner = spawner(ParticleConfig::default());
        let mut particle = spawner.advance(ms(16)).remove(0);
        assert_eq!(particle.frame().opacity, 1.0);

        particle.advance(particle.lifetime / 2);
        let mid = particle.frame();
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.offset_y < 0.0);

        particle.advance(Duration::from_secs(10));
        assert!(particle.is_dead());
        assert_eq!(particle.frame().opacity, 0.0);
        assert_eq!(particle.age, particle.lifetime);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let a = spawner(ParticleConfig::default()).advance(ms(16));
        let b = spawner(ParticleConfig::default()).advance(ms(16));
        assert_eq!(a, b);
    }
}
