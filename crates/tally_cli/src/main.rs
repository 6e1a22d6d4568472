//! Tally CLI
//!
//! Check, plan, and simulate the portfolio's scroll reveals.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_animation::MAX_FPS;
use tally_reveal::Viewport;
use tally_site::{SiteConfig, SkillFilter};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod simulate;

use simulate::SimulationOptions;

#[derive(Parser)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll reveal tooling for the Tally portfolio", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a site file
    Check {
        /// Site file
        #[arg(default_value = "content/site.toml")]
        site: PathBuf,
    },

    /// Print every section's reveal groups and targets
    Plan {
        /// Site file
        #[arg(default_value = "content/site.toml")]
        site: PathBuf,

        /// Skills category to show (default: all)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Scroll the page top to bottom on a fixed frame clock
    Simulate {
        /// Site file
        #[arg(default_value = "content/site.toml")]
        site: PathBuf,

        /// Frames per second (default: engine.fps from the site file)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_FPS)))]
        fps: Option<u32>,

        /// Scroll speed in pixels per second
        #[arg(long, default_value = "1200")]
        scroll_speed: f32,

        /// Viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
        viewport: Viewport,

        /// Stop after this many simulated seconds
        #[arg(long)]
        seconds: Option<f32>,

        /// Skills category to show (default: all)
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Check { site } => cmd_check(&site),

        Commands::Plan { site, category } => cmd_plan(&site, category.as_deref()),

        Commands::Simulate {
            site,
            fps,
            scroll_speed,
            viewport,
            seconds,
            category,
        } => {
            let config = load(&site)?;
            let options = SimulationOptions {
                fps: fps.unwrap_or(config.engine.fps),
                scroll_speed,
                viewport,
                seconds,
                filter: skill_filter(category.as_deref()),
            };
            let report = simulate::run(&config, &options)?;
            report.print();
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<SiteConfig> {
    SiteConfig::load(path).with_context(|| format!("Failed to load site file {}", path.display()))
}

fn skill_filter(category: Option<&str>) -> SkillFilter {
    category
        .and_then(|c| c.parse().ok())
        .unwrap_or_default()
}

fn parse_viewport(s: &str) -> std::result::Result<Viewport, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: f32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
        return Err(format!("viewport must be positive, got {width}x{height}"));
    }
    Ok(Viewport::new(width, height))
}

fn cmd_check(site: &Path) -> Result<()> {
    let config = load(site)?;
    let content = &config.content;

    info!("Site file {} is valid", site.display());
    println!("{} ({})", config.site.title, content.profile.name);
    println!("  stats:        {}", content.stats.len());
    println!("  highlights:   {}", content.highlights.len());
    println!(
        "  skills:       {} in {} categories ({} featured)",
        content.skills.len(),
        content.skill_categories().len(),
        content.featured_skills().len()
    );
    println!("  experience:   {}", content.experience.len());
    println!("  education:    {}", content.education.len());
    println!(
        "  certificates: {} ({} featured)",
        content.certificates.len(),
        content.featured_certificates().len()
    );
    println!("  countries:    {}", content.countries.len());
    println!(
        "  particles:    {}",
        if config.engine.particles.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    Ok(())
}

fn cmd_plan(site: &Path, category: Option<&str>) -> Result<()> {
    let config = load(site)?;
    let filter = skill_filter(category);
    let page = tally_site::Page::new(&config, filter.clone())?;

    println!("Skills filter: {filter}");
    for plan in page.plans() {
        println!();
        println!("[{}] {} targets", plan.section, plan.target_count());
        for group in &plan.groups {
            println!("  {} (stagger {:?})", group.name, group.stagger.delay);
            for target in &group.targets {
                let animation = &target.animation;
                let properties: Vec<String> = animation
                    .deltas()
                    .iter()
                    .map(|d| format!("{} {}->{}", d.property, d.from, d.to))
                    .collect();
                print!(
                    "    {:<32} top {:.0}%  {:?} {}  {}",
                    target.element.as_str(),
                    target.threshold.fraction() * 100.0,
                    animation.duration(),
                    animation.easing(),
                    properties.join(", ")
                );
                if let Some(counter) = &target.counter {
                    print!("  count to {}{}", counter.target, counter.suffix);
                }
                println!();
            }
        }
    }
    println!();
    println!("{} targets total", page.target_count());

    Ok(())
}
