//! Tally Site
//!
//! The accountant portfolio built on the scroll reveal engine: the content
//! model, the site file, one reveal plan per page section, and a stacked
//! layout for running the page headless.

pub mod config;
pub mod content;
pub mod error;
pub mod layout;
pub mod page;
pub mod sections;

pub use config::{EngineSettings, ParticleSettings, SiteConfig, SiteMetadata};
pub use content::{
    Certificate, Country, Education, Experience, Footer, Highlight, Link, Profile, SiteContent,
    Skill, SkillFilter, Stat,
};
pub use error::{ConfigError, Result};
pub use layout::{hero_backdrop, StackedLayout, HERO, HERO_BACKDROP};
pub use page::{MountedPage, Page};
pub use sections::{GroupLayout, GroupPlan, MountedSection, Section, SectionPlan};
