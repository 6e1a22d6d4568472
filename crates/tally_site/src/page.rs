//! The whole page
//!
//! A [`Page`] holds the section plans built from the site content and the
//! hero backdrop settings. Mounting it registers every section with the
//! engine and starts the backdrop; the returned [`MountedPage`] owns all of
//! those registrations.

use tally_reveal::{
    EngineHandle, LayoutProvider, ParticleConfig, SpawnerHandle, StaticLayout, ViewScope,
    Viewport,
};

use crate::config::SiteConfig;
use crate::content::{SiteContent, SkillFilter};
use crate::error::Result;
use crate::layout::{hero_backdrop, StackedLayout, HERO};
use crate::sections::{MountedSection, Section, SectionPlan};

/// Section plans plus the hero backdrop
#[derive(Clone, Debug)]
pub struct Page {
    content: SiteContent,
    filter: SkillFilter,
    plans: Vec<SectionPlan>,
    particles: Option<ParticleConfig>,
}

impl Page {
    pub fn new(config: &SiteConfig, filter: SkillFilter) -> Result<Self> {
        let particles = config.particle_config()?;
        Ok(Self::from_content(config.content.clone(), particles, filter))
    }

    pub fn from_content(
        content: SiteContent,
        particles: Option<ParticleConfig>,
        filter: SkillFilter,
    ) -> Self {
        let plans = SectionPlan::build_all(&content, &filter);
        Self {
            content,
            filter,
            plans,
            particles,
        }
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn filter(&self) -> &SkillFilter {
        &self.filter
    }

    pub fn plans(&self) -> &[SectionPlan] {
        &self.plans
    }

    pub fn plan(&self, section: Section) -> Option<&SectionPlan> {
        self.plans.iter().find(|plan| plan.section == section)
    }

    pub fn particles(&self) -> Option<&ParticleConfig> {
        self.particles.as_ref()
    }

    pub fn target_count(&self) -> usize {
        self.plans.iter().map(SectionPlan::target_count).sum()
    }

    pub fn layout(&self, viewport: Viewport) -> StaticLayout {
        StackedLayout::new(viewport).build(&self.plans)
    }

    /// Change the Skills filter; returns false if it was already selected
    ///
    /// Only the plan changes. A mounted page picks it up through
    /// [`MountedPage::remount`].
    pub fn set_skill_filter(&mut self, filter: SkillFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        let plan = SectionPlan::build(Section::Skills, &self.content, &filter);
        if let Some(slot) = self.plans.iter_mut().find(|p| p.section == Section::Skills) {
            *slot = plan;
        }
        self.filter = filter;
        true
    }

    /// Mount every section and start the hero backdrop
    pub fn mount_all(
        &self,
        engine: &EngineHandle,
        layout: &impl LayoutProvider,
    ) -> tally_reveal::Result<MountedPage> {
        let hero = engine.mount(HERO)?;
        let backdrop = match &self.particles {
            Some(config) => Some(hero.start_particles(hero_backdrop(), config.clone())?),
            None => None,
        };

        let sections = self
            .plans
            .iter()
            .map(|plan| plan.mount(engine, layout))
            .collect::<tally_reveal::Result<Vec<_>>>()?;

        let mounted = MountedPage {
            hero,
            backdrop,
            sections,
        };
        tracing::info!(
            sections = mounted.sections.len(),
            targets = mounted.registered(),
            particles = mounted.backdrop.is_some(),
            "page mounted"
        );
        Ok(mounted)
    }
}

/// Every live registration on the page
pub struct MountedPage {
    pub hero: ViewScope,
    pub backdrop: Option<SpawnerHandle>,
    pub sections: Vec<MountedSection>,
}

impl MountedPage {
    pub fn section(&self, section: Section) -> Option<&MountedSection> {
        self.sections.iter().find(|mounted| mounted.section == section)
    }

    /// Targets registered across all sections
    pub fn registered(&self) -> usize {
        self.sections.iter().map(MountedSection::registered).sum()
    }

    /// Tear a section down and mount it again from the page's current plan
    pub fn remount(
        &mut self,
        page: &Page,
        section: Section,
        engine: &EngineHandle,
        layout: &impl LayoutProvider,
    ) -> tally_reveal::Result<bool> {
        let Some(index) = self.sections.iter().position(|m| m.section == section) else {
            return Ok(false);
        };
        let Some(plan) = page.plan(section) else {
            return Ok(false);
        };

        drop(self.sections.remove(index));
        let mounted = plan.mount(engine, layout)?;
        self.sections.insert(index, mounted);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Skill;
    use std::time::Duration;
    use tally_reveal::{RecordingPresentation, RevealEngine, RevealEvent};

    fn page(particles: Option<ParticleConfig>) -> Page {
        let mut content = SiteContent::default();
        content.profile.name = "Jordan Vale".into();
        content.skills = vec![
            Skill {
                name: "Returns".into(),
                category: "Tax".into(),
                level: 90,
                featured: false,
            },
            Skill {
                name: "Pivot Tables".into(),
                category: "Office".into(),
                level: 85,
                featured: false,
            },
        ];
        Page::from_content(content, particles, SkillFilter::All)
    }

    #[test]
    fn test_mount_all_registers_every_target() {
        let engine = RevealEngine::with_seed(5);
        let page = page(Some(ParticleConfig::default()));
        let layout = page.layout(Viewport::new(1280.0, 800.0));

        let mounted = page.mount_all(&engine.handle(), &layout).unwrap();
        assert_eq!(mounted.registered(), page.target_count());
        assert_eq!(engine.view_count(), Section::ALL.len() + 1);
        assert!(mounted.backdrop.as_ref().unwrap().is_running());

        drop(mounted);
        assert_eq!(engine.view_count(), 0);
        assert_eq!(engine.target_count(), 0);
    }

    #[test]
    fn test_filter_change_remounts_skills() {
        let engine = RevealEngine::with_seed(5);
        let mut page = page(None);
        let mut layout = page.layout(Viewport::new(1280.0, 800.0));
        let mut sink = RecordingPresentation::new();
        let mut mounted = page.mount_all(&engine.handle(), &layout).unwrap();

        // Scroll to the bottom so everything settles
        layout.scroll_to(f32::MAX);
        for _ in 0..300 {
            engine.tick(Duration::from_millis(16), &layout, &mut sink);
        }
        assert_eq!(engine.settled_count(), engine.target_count());

        assert!(page.set_skill_filter(SkillFilter::Category("Tax".into())));
        assert!(!page.set_skill_filter(SkillFilter::Category("Tax".into())));
        let mut layout = page.layout(Viewport::new(1280.0, 800.0));
        layout.scroll_to(f32::MAX);
        assert!(mounted
            .remount(&page, Section::Skills, &engine.handle(), &layout)
            .unwrap());

        let skills = mounted.section(Section::Skills).unwrap();
        // headline, one row, one bar
        assert_eq!(skills.registered(), 3);

        let events = engine.tick(Duration::from_millis(16), &layout, &mut sink);
        let retriggered = events
            .iter()
            .filter(|e| matches!(e, RevealEvent::Triggered { .. }))
            .count();
        assert_eq!(retriggered, 3);
    }
}
