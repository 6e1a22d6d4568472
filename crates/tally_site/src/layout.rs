//! Stacked page layout
//!
//! A stand-in for a real layout engine: the hero fills the first screen,
//! then every section follows in order, each group laid out as a grid of
//! fixed-height rows. Good enough to drive the engine headless with
//! realistic scroll distances.

use tally_reveal::{ElementId, Rect, StaticLayout, Viewport};

use crate::sections::SectionPlan;

/// Hero section id
pub const HERO: &str = "hero";

/// Particle container inside the hero
pub const HERO_BACKDROP: &str = "hero/backdrop";

/// Spacing used when stacking sections
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedLayout {
    pub viewport: Viewport,
    /// Space above and below each section's content
    pub section_padding: f32,
    /// Space between groups in a section
    pub group_gap: f32,
    /// Space between grid cells
    pub gutter: f32,
}

impl StackedLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            section_padding: 96.0,
            group_gap: 48.0,
            gutter: 24.0,
        }
    }

    pub fn build(&self, plans: &[SectionPlan]) -> StaticLayout {
        let width = self.viewport.width;
        let mut layout = StaticLayout::new(self.viewport);
        let hero = Rect::new(0.0, 0.0, width, self.viewport.height);
        layout.insert(HERO, hero);
        layout.insert(HERO_BACKDROP, hero);

        let mut y = hero.bottom();
        for plan in plans {
            let top = y;
            y += self.section_padding;

            for group in &plan.groups {
                let columns = group.layout.columns.max(1);
                let column_width =
                    (width - self.gutter * (columns - 1) as f32).max(0.0) / columns as f32;
                let row_height = group.layout.row_height;

                for (i, target) in group.targets.iter().enumerate() {
                    let (row, column) = (i / columns, i % columns);
                    layout.insert(
                        target.element.clone(),
                        Rect::new(
                            column as f32 * (column_width + self.gutter),
                            y + row as f32 * (row_height + self.gutter),
                            column_width,
                            row_height,
                        ),
                    );
                }

                let rows = group.targets.len().div_ceil(columns);
                y += rows as f32 * (row_height + self.gutter) + self.group_gap;
            }

            y += self.section_padding;
            layout.insert(plan.section.element(), Rect::new(0.0, top, width, y - top));
        }

        tracing::debug!(
            elements = layout.len(),
            height = layout.document_height(),
            "stacked layout built"
        );
        layout
    }
}

/// Element id of the hero backdrop
pub fn hero_backdrop() -> ElementId {
    ElementId::new(HERO_BACKDROP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Country, SiteContent, SkillFilter};
    use crate::sections::Section;
    use tally_reveal::LayoutProvider;

    fn plans() -> Vec<SectionPlan> {
        let mut content = SiteContent::default();
        content.profile.name = "Jordan Vale".into();
        content.countries = (0..6)
            .map(|i| Country {
                name: format!("Country {i}"),
                flag: "🏳".into(),
            })
            .collect();
        SectionPlan::build_all(&content, &SkillFilter::All)
    }

    #[test]
    fn test_sections_stack_in_order() {
        let layout = StackedLayout::new(Viewport::new(1200.0, 800.0)).build(&plans());

        let mut last_top = -1.0;
        for section in Section::ALL {
            let rect = layout.bounds(&section.element()).unwrap();
            assert!(rect.top() > last_top, "{section} out of order");
            last_top = rect.top();
        }
        assert_eq!(layout.bounds(&hero_backdrop()).unwrap().top(), 0.0);
    }

    #[test]
    fn test_grid_wraps_rows() {
        let layout = StackedLayout::new(Viewport::new(1200.0, 800.0)).build(&plans());
        let first = layout.bounds(&"countries/country/0".into()).unwrap();
        let fourth = layout.bounds(&"countries/country/3".into()).unwrap();
        let fifth = layout.bounds(&"countries/country/4".into()).unwrap();

        assert_eq!(first.top(), fourth.top());
        assert!(fourth.x > first.x);
        assert_eq!(fifth.x, first.x);
        assert!(fifth.top() > first.top());
    }

    #[test]
    fn test_every_target_has_bounds() {
        let plans = plans();
        let layout = StackedLayout::new(Viewport::default()).build(&plans);
        for target in plans.iter().flat_map(|plan| plan.targets()) {
            assert!(layout.contains(&target.element), "{}", target.element);
        }
    }
}
