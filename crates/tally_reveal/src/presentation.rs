//! Presentation sink
//!
//! The engine's only output. Each tick it writes property values, counter
//! text, and particle nodes through a [`Presentation`]; hosts map those onto
//! real nodes. [`RecordingPresentation`] keeps an in-memory render tree for
//! tests and the simulator.

use indexmap::IndexMap;

use crate::animation::VisualProperty;
use crate::layout::ElementId;
use crate::particles::{ParticleFrame, ParticleId, ParticleInstance};

/// Receiver of presentation mutations
pub trait Presentation {
    fn set_property(&mut self, element: &ElementId, property: VisualProperty, value: f32);

    fn set_text(&mut self, element: &ElementId, text: &str);

    /// Add a particle node under `container`
    fn insert_particle(
        &mut self,
        container: &ElementId,
        id: ParticleId,
        particle: &ParticleInstance,
    );

    fn update_particle(&mut self, id: ParticleId, frame: &ParticleFrame);

    /// Remove a particle node from the render tree
    fn remove_particle(&mut self, id: ParticleId);
}

/// Recorded state of one element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeState {
    pub properties: IndexMap<VisualProperty, f32>,
    pub text: Option<String>,
}

/// Recorded particle node
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleNode {
    pub container: ElementId,
    pub glyph: String,
    pub font_size: f32,
    pub x_percent: f32,
    pub y_percent: f32,
    pub frame: ParticleFrame,
}

/// In-memory render tree
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    nodes: IndexMap<ElementId, NodeState>,
    particles: IndexMap<ParticleId, ParticleNode>,
    /// Final opacity of every removed particle, in removal order
    removed: Vec<(ParticleId, f32)>,
    inserted_total: u64,
    peak_particles: usize,
    mutations: u64,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, element: &str) -> Option<&NodeState> {
        self.nodes.get(element)
    }

    pub fn property(&self, element: &str, property: VisualProperty) -> Option<f32> {
        self.nodes
            .get(element)
            .and_then(|node| node.properties.get(&property).copied())
    }

    pub fn text(&self, element: &str) -> Option<&str> {
        self.nodes
            .get(element)
            .and_then(|node| node.text.as_deref())
    }

    pub fn particle(&self, id: ParticleId) -> Option<&ParticleNode> {
        self.particles.get(&id)
    }

    pub fn has_particle(&self, id: ParticleId) -> bool {
        self.particles.contains_key(&id)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = (ParticleId, &ParticleNode)> {
        self.particles.iter().map(|(id, node)| (*id, node))
    }

    pub fn removed_particles(&self) -> &[(ParticleId, f32)] {
        &self.removed
    }

    pub fn inserted_total(&self) -> u64 {
        self.inserted_total
    }

    /// Most particles alive at once
    pub fn peak_particles(&self) -> usize {
        self.peak_particles
    }

    /// Number of mutation calls received
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&ElementId, &NodeState)> {
        self.nodes.iter()
    }
}

impl Presentation for RecordingPresentation {
    fn set_property(&mut self, element: &ElementId, property: VisualProperty, value: f32) {
        self.mutations += 1;
        self.nodes
            .entry(element.clone())
            .or_default()
            .properties
            .insert(property, value);
    }

    fn set_text(&mut self, element: &ElementId, text: &str) {
        self.mutations += 1;
        self.nodes.entry(element.clone()).or_default().text = Some(text.to_string());
    }

    fn insert_particle(
        &mut self,
        container: &ElementId,
        id: ParticleId,
        particle: &ParticleInstance,
    ) {
        self.mutations += 1;
        self.inserted_total += 1;
        self.particles.insert(
            id,
            ParticleNode {
                container: container.clone(),
                glyph: particle.glyph.clone(),
                font_size: particle.font_size,
                x_percent: particle.x_percent,
                y_percent: particle.y_percent,
                frame: particle.frame(),
            },
        );
        self.peak_particles = self.peak_particles.max(self.particles.len());
    }

    fn update_particle(&mut self, id: ParticleId, frame: &ParticleFrame) {
        self.mutations += 1;
        if let Some(node) = self.particles.get_mut(&id) {
            node.frame = *frame;
        }
    }

    fn remove_particle(&mut self, id: ParticleId) {
        self.mutations += 1;
        if let Some(node) = self.particles.shift_remove(&id) {
            self.removed.push((id, node.frame.opacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_properties_and_text() {
        let mut sink = RecordingPresentation::new();
        let el = ElementId::from("about/stat/1");
        sink.set_property(&el, VisualProperty::Opacity, 0.0);
        sink.set_property(&el, VisualProperty::Opacity, 1.0);
        sink.set_text(&el, "98%");

        assert_eq!(sink.property("about/stat/1", VisualProperty::Opacity), Some(1.0));
        assert_eq!(sink.text("about/stat/1"), Some("98%"));
        assert_eq!(sink.property("about/stat/1", VisualProperty::Scale), None);
        assert_eq!(sink.mutations(), 3);
    }
}
