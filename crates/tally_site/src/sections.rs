//! Section bindings
//!
//! Maps each content table onto reveal targets. A [`SectionPlan`] is the
//! full, declarative description of one section's entrance animations:
//! ordered groups of targets, each with its threshold and stagger. Mounting
//! a plan registers it with the engine under one view scope.

use std::fmt;
use std::time::Duration;

use tally_animation::Easing;
use tally_reveal::{
    ActivationThreshold, AnimationSpec, CounterSpec, ElementId, EngineHandle, LayoutProvider,
    RevealGroup, RevealTarget, StaggerConfig, ViewScope, VisualProperty,
};

use crate::content::{SiteContent, SkillFilter};

/// Page sections in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Experience,
    Education,
    Certificates,
    Countries,
    Footer,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::About,
        Section::Skills,
        Section::Experience,
        Section::Education,
        Section::Certificates,
        Section::Countries,
        Section::Footer,
    ];

    /// Root element id, also the view name
    pub fn id(&self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Certificates => "certificates",
            Section::Countries => "countries",
            Section::Footer => "footer",
        }
    }

    pub fn element(&self) -> ElementId {
        ElementId::new(self.id())
    }

    pub fn has_headline(&self) -> bool {
        *self != Section::Footer
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How the stacked layout arranges a group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupLayout {
    pub columns: usize,
    pub row_height: f32,
}

impl GroupLayout {
    const fn new(columns: usize, row_height: f32) -> Self {
        Self {
            columns,
            row_height,
        }
    }
}

/// Siblings registered together
#[derive(Clone, Debug, PartialEq)]
pub struct GroupPlan {
    pub name: String,
    pub stagger: StaggerConfig,
    pub layout: GroupLayout,
    pub targets: Vec<RevealTarget>,
}

impl GroupPlan {
    fn new(name: impl Into<String>, stagger_ms: u64, layout: GroupLayout) -> Self {
        Self {
            name: name.into(),
            stagger: StaggerConfig::from_millis(stagger_ms),
            layout,
            targets: Vec::new(),
        }
    }

    fn push(
        &mut self,
        element: ElementId,
        threshold: f32,
        animation: AnimationSpec,
    ) -> &mut RevealTarget {
        self.targets.push(RevealTarget::new(element, at(threshold), animation));
        let last = self.targets.len() - 1;
        &mut self.targets[last]
    }
}

/// Every reveal a section needs
#[derive(Clone, Debug, PartialEq)]
pub struct SectionPlan {
    pub section: Section,
    pub groups: Vec<GroupPlan>,
}

/// A section's live registrations
pub struct MountedSection {
    pub section: Section,
    pub scope: ViewScope,
    pub groups: Vec<RevealGroup>,
}

impl MountedSection {
    pub fn registered(&self) -> usize {
        self.groups.iter().map(RevealGroup::registered).sum()
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Thresholds here are literals inside `(0, 1]`
fn at(fraction: f32) -> ActivationThreshold {
    ActivationThreshold::new(fraction).unwrap_or_default()
}

const CARD: GroupLayout = GroupLayout::new(3, 240.0);
const HEADLINE: GroupLayout = GroupLayout::new(1, 80.0);

impl SectionPlan {
    /// Build the plan for `section` from the content tables
    pub fn build(section: Section, content: &SiteContent, filter: &SkillFilter) -> Self {
        let root = section.element();
        let mut groups = Vec::new();

        if section.has_headline() {
            let mut headline = GroupPlan::new("headline", 0, HEADLINE);
            headline.push(
                root.child("headline"),
                0.80,
                AnimationSpec::fade_up(30.0, ms(800), Easing::EaseOutQuart),
            );
            groups.push(headline);
        }

        match section {
            Section::About => {
                let mut cards = GroupPlan::new("highlights", 150, CARD);
                for i in 0..content.highlights.len() {
                    cards.push(
                        root.child("highlight").child(i),
                        0.85,
                        AnimationSpec::tilt_up(50.0, 10.0, ms(800), Easing::EaseOutQuart),
                    );
                }
                groups.push(cards);

                let mut stats = GroupPlan::new("stats", 100, GroupLayout::new(4, 160.0));
                for (i, stat) in content.stats.iter().enumerate() {
                    stats
                        .push(
                            root.child("stat").child(i),
                            0.85,
                            AnimationSpec::pop_in(0.8, ms(600), Easing::BackOut { overshoot: 1.7 }),
                        )
                        .counter = Some(CounterSpec::new(stat.value).suffix(stat.suffix.clone()));
                }
                groups.push(stats);
            }
            Section::Skills => {
                let skills = content.skills_for(filter);
                let mut rows = GroupPlan::new("skills", 50, GroupLayout::new(2, 72.0));
                let mut bars = GroupPlan::new("bars", 50, GroupLayout::new(2, 12.0));
                for (i, skill) in skills.iter().enumerate() {
                    rows.push(
                        root.child("skill").child(i),
                        0.90,
                        AnimationSpec::slide_from_left(30.0, ms(600), Easing::EaseOutCubic),
                    );
                    bars.push(
                        root.child("bar").child(i),
                        0.90,
                        AnimationSpec::grow_width(
                            f32::from(skill.level),
                            ms(1200),
                            Easing::EaseOutCubic,
                        ),
                    );
                }
                groups.push(rows);
                groups.push(bars);
            }
            Section::Experience => {
                for (i, job) in content.experience.iter().enumerate() {
                    let card_id = root.child("card").child(i);
                    let mut card =
                        GroupPlan::new(format!("card {i}"), 0, GroupLayout::new(1, 320.0));
                    card.push(
                        card_id.clone(),
                        0.75,
                        AnimationSpec::tilt_up(50.0, 10.0, ms(800), Easing::EaseOutQuart),
                    );
                    groups.push(card);

                    let mut duties = GroupPlan::new(
                        format!("card {i} duties"),
                        100,
                        GroupLayout::new(1, 40.0),
                    );
                    for j in 0..job.duties.len() {
                        duties.push(
                            card_id.child("duty").child(j),
                            0.90,
                            AnimationSpec::slide_from_left(20.0, ms(500), Easing::EaseOutCubic),
                        );
                    }
                    groups.push(duties);
                }
            }
            Section::Education => {
                let mut cards = GroupPlan::new("degrees", 150, GroupLayout::new(2, 220.0));
                for i in 0..content.education.len() {
                    cards.push(
                        root.child("card").child(i),
                        0.80,
                        AnimationSpec::fade_up(50.0, ms(800), Easing::EaseOutQuart)
                            .with(VisualProperty::Scale, 0.95, 1.0),
                    );
                }
                groups.push(cards);
            }
            Section::Certificates => {
                let mut cards = GroupPlan::new("certificates", 80, CARD);
                for i in 0..content.certificates.len() {
                    cards.push(
                        root.child("card").child(i),
                        0.85,
                        AnimationSpec::tilt_up(50.0, 10.0, ms(600), Easing::EaseOutQuart),
                    );
                }
                groups.push(cards);
            }
            Section::Countries => {
                let mut tiles = GroupPlan::new("countries", 80, GroupLayout::new(4, 120.0));
                for i in 0..content.countries.len() {
                    tiles.push(
                        root.child("country").child(i),
                        0.90,
                        AnimationSpec::pop_in(0.8, ms(500), Easing::BackOut { overshoot: 1.7 })
                            .with(VisualProperty::TranslateY, 20.0, 0.0),
                    );
                }
                groups.push(tiles);
            }
            Section::Footer => {
                let mut block = GroupPlan::new("content", 0, GroupLayout::new(1, 200.0));
                block.push(
                    root.child("content"),
                    0.90,
                    AnimationSpec::fade_up(30.0, ms(800), Easing::EaseOutQuart),
                );
                groups.push(block);
            }
        }

        groups.retain(|group| !group.targets.is_empty());
        Self { section, groups }
    }

    /// Plans for every section, in page order
    pub fn build_all(content: &SiteContent, filter: &SkillFilter) -> Vec<Self> {
        Section::ALL
            .iter()
            .map(|section| Self::build(*section, content, filter))
            .collect()
    }

    pub fn target_count(&self) -> usize {
        self.groups.iter().map(|group| group.targets.len()).sum()
    }

    pub fn targets(&self) -> impl Iterator<Item = &RevealTarget> {
        self.groups.iter().flat_map(|group| group.targets.iter())
    }

    /// Register every group under a fresh view scope
    pub fn mount(
        &self,
        engine: &EngineHandle,
        layout: &impl LayoutProvider,
    ) -> tally_reveal::Result<MountedSection> {
        let scope = engine.mount(self.section.id())?;
        let groups = self
            .groups
            .iter()
            .map(|group| scope.register(layout, group.targets.iter().cloned(), group.stagger))
            .collect::<tally_reveal::Result<Vec<_>>>()?;

        let mounted = MountedSection {
            section: self.section,
            scope,
            groups,
        };
        tracing::info!(
            section = %self.section,
            targets = mounted.registered(),
            "section mounted"
        );
        Ok(mounted)
    }
}
