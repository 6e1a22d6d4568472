//! Headless scroll-through of the page
//!
//! Mounts the whole page on a stacked layout, then scrolls it top to bottom
//! at a constant speed on a fixed-step frame clock, ticking the engine into
//! a recording sink.

use std::time::Duration;

use anyhow::{Context, Result};
use tally_animation::ManualClock;
use tally_reveal::{RecordingPresentation, RevealEngine, RevealEvent, Viewport};
use tally_site::{Page, SiteConfig, SkillFilter};
use tracing::{debug, info, warn};

/// Hard stop when no limit is given and the page never settles
const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub fps: u32,
    /// Pixels per second
    pub scroll_speed: f32,
    pub viewport: Viewport,
    /// Simulated seconds before stopping; runs until settled when unset
    pub seconds: Option<f32>,
    pub filter: SkillFilter,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            scroll_speed: 1200.0,
            viewport: Viewport::default(),
            seconds: None,
            filter: SkillFilter::All,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationReport {
    pub frames: u64,
    pub simulated: Duration,
    pub targets: usize,
    pub triggered: usize,
    pub settled: usize,
    pub particles_spawned: u64,
    pub particles_expired: u64,
    pub peak_particles: usize,
    pub reached_bottom: bool,
}

impl SimulationReport {
    pub fn all_settled(&self) -> bool {
        self.settled == self.targets
    }

    pub fn print(&self) {
        println!(
            "Simulated {:.2}s over {} frames",
            self.simulated.as_secs_f32(),
            self.frames
        );
        println!(
            "  targets:   {} registered, {} triggered, {} settled",
            self.targets, self.triggered, self.settled
        );
        println!(
            "  particles: {} spawned, {} expired, peak {} live",
            self.particles_spawned, self.particles_expired, self.peak_particles
        );
        if !self.reached_bottom {
            println!("  stopped before reaching the bottom of the page");
        }
    }
}

pub fn run(config: &SiteConfig, options: &SimulationOptions) -> Result<SimulationReport> {
    let engine = match config.engine.seed {
        Some(seed) => RevealEngine::with_seed(seed),
        None => RevealEngine::new(),
    };
    let page = Page::new(config, options.filter.clone()).context("Failed to build the page")?;
    let mut layout = page.layout(options.viewport);
    let mut sink = RecordingPresentation::new();

    let mounted = page
        .mount_all(&engine.handle(), &layout)
        .context("Failed to mount the page")?;

    let mut clock = ManualClock::from_fps(options.fps);
    let scroll_step = options.scroll_speed.max(0.0) * clock.step().as_secs_f32();
    let limit = options
        .seconds
        .and_then(|s| Duration::try_from_secs_f32(s.max(0.0)).ok())
        .unwrap_or(DEFAULT_TIME_LIMIT);

    info!(
        fps = options.fps,
        scroll_speed = options.scroll_speed,
        document_height = layout.document_height(),
        targets = mounted.registered(),
        "simulation started"
    );

    let mut report = SimulationReport {
        targets: mounted.registered(),
        ..SimulationReport::default()
    };

    while clock.now() < limit {
        let events = engine.tick_with(&mut clock, &layout, &mut sink);
        for event in &events {
            match event {
                RevealEvent::Triggered { element, at } => {
                    report.triggered += 1;
                    debug!(%element, at_ms = at.as_millis() as u64, "triggered");
                }
                RevealEvent::Settled { element, at } => {
                    debug!(%element, at_ms = at.as_millis() as u64, "settled");
                }
                RevealEvent::ParticleExpired { .. } => report.particles_expired += 1,
                RevealEvent::Started { .. } | RevealEvent::ParticleSpawned { .. } => {}
            }
        }

        report.reached_bottom = layout.at_bottom();
        if report.reached_bottom && engine.settled_count() == engine.target_count() {
            break;
        }
        layout.scroll_by(scroll_step);
    }

    report.frames = clock.frames();
    report.simulated = clock.now();
    report.settled = engine.settled_count();
    report.particles_spawned = sink.inserted_total();
    report.peak_particles = sink.peak_particles();

    if report.all_settled() {
        info!(
            settled = report.settled,
            secs = report.simulated.as_secs_f32(),
            "every target settled"
        );
    } else {
        warn!(
            settled = report.settled,
            targets = report.targets,
            "simulation stopped before every target settled"
        );
    }

    drop(mounted);
    engine.shutdown();
    Ok(report)
}
