use std::collections::HashMap;

use crate::{merge::DescriptorSet, types::Capability};

/// Maps every capability to the descriptors providing it.
///
/// Each descriptor is registered under its own identity and under every
/// capability it provides. Providers are referenced by their position in the
/// [DescriptorSet] the index was built from.
#[derive(Debug, Clone)]
pub struct CapabilityIndex {
    slots: HashMap<Capability, usize>,
    /// Providers per slot, in encounter order
    providers: Vec<Vec<usize>>,
    /// Slots per descriptor
    registrations: Vec<Vec<usize>>,
}

impl CapabilityIndex {
    pub fn build(descriptors: &DescriptorSet) -> Self {
        let mut index = CapabilityIndex {
            slots: HashMap::new(),
            providers: Vec::new(),
            registrations: Vec::with_capacity(descriptors.len()),
        };

        for (position, descriptor) in descriptors.iter().enumerate() {
            index.registrations.push(Vec::new());
            index.register(position, Capability::new(descriptor.identity()));
            for capability in descriptor.provides() {
                index.register(position, capability.clone());
            }
        }

        tracing::debug!(
            "Indexed {} descriptors under {} capabilities",
            descriptors.len(),
            index.providers.len()
        );

        index
    }

    fn register(&mut self, position: usize, capability: Capability) {
        let next_slot = self.providers.len();
        let slot = *self.slots.entry(capability).or_insert(next_slot);
        if slot == next_slot {
            self.providers.push(Vec::new());
        }

        // A descriptor may list its identity among its capabilities
        let providers = &mut self.providers[slot];
        if providers.last() != Some(&position) {
            providers.push(position);
            self.registrations[position].push(slot);
        }
    }

    /// Positions of all descriptors providing the capability
    pub fn providers(&self, capability: &str) -> &[usize] {
        match self.slots.get(capability) {
            Some(&slot) => &self.providers[slot],
            None => &[],
        }
    }

    pub fn is_provided(&self, capability: &str) -> bool {
        !self.providers(capability).is_empty()
    }

    /// Number of distinct capabilities
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Fresh state in which no descriptor is wired yet
    pub fn wiring_state(&self) -> WiringState {
        WiringState {
            wired: vec![false; self.registrations.len()],
            unwired_providers: self.providers.iter().map(Vec::len).collect(),
        }
    }

    /// True if the capability has at least one provider and all of them are
    /// wired.
    ///
    /// A capability nobody provides is never fully wired. The resolver reads
    /// this as "supplied from outside the visible graph".
    pub fn is_fully_wired(&self, capability: &str, state: &WiringState) -> bool {
        match self.slots.get(capability) {
            Some(&slot) => {
                !self.providers[slot].is_empty() && state.unwired_providers.get(slot) == Some(&0)
            }
            None => false,
        }
    }
}

/// Which descriptors have been placed into the build order.
///
/// Owned by a single resolution, so descriptors themselves stay immutable.
/// A state only matches the [CapabilityIndex] which created it.
#[derive(Debug, Clone)]
pub struct WiringState {
    wired: Vec<bool>,
    /// Providers not yet wired, per capability slot
    unwired_providers: Vec<usize>,
}

impl WiringState {
    pub(crate) fn is_wired(&self, position: usize) -> bool {
        self.wired[position]
    }

    /// Marks the descriptor as wired. Marking it again has no effect.
    pub(crate) fn mark_wired(&mut self, position: usize, index: &CapabilityIndex) {
        if std::mem::replace(&mut self.wired[position], true) {
            return;
        }
        for &slot in &index.registrations[position] {
            self.unwired_providers[slot] -= 1;
        }
    }

    pub fn wired_count(&self) -> usize {
        self.wired.iter().filter(|wired| **wired).count()
    }
}
