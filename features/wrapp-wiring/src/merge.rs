use std::collections::{HashMap, HashSet};

use crate::types::ComponentDescriptor;

/// Descriptors keyed by identity, kept in encounter order.
///
/// Inserting a descriptor whose identity is already present replaces the
/// existing one in place, so the set never holds two descriptors with the same
/// identity and replacing never changes the order.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    descriptors: Vec<ComponentDescriptor>,
    positions: HashMap<String, usize>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the descriptor, returning the one it replaced
    pub fn insert(&mut self, descriptor: ComponentDescriptor) -> Option<ComponentDescriptor> {
        match self.positions.get(descriptor.identity()) {
            Some(&position) => Some(std::mem::replace(
                &mut self.descriptors[position],
                descriptor,
            )),
            None => {
                self.positions
                    .insert(descriptor.identity().to_string(), self.descriptors.len());
                self.descriptors.push(descriptor);
                None
            }
        }
    }

    pub fn get(&self, identity: &str) -> Option<&ComponentDescriptor> {
        self.position(identity).map(|position| &self.descriptors[position])
    }

    /// Encounter position of the descriptor
    pub fn position(&self, identity: &str) -> Option<usize> {
        self.positions.get(identity).copied()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.positions.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComponentDescriptor> {
        self.descriptors.iter()
    }

    pub fn as_slice(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    pub fn into_vec(self) -> Vec<ComponentDescriptor> {
        self.descriptors
    }
}
impl FromIterator<ComponentDescriptor> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = ComponentDescriptor>>(iter: I) -> Self {
        let mut set = DescriptorSet::new();
        set.extend(iter);
        set
    }
}
impl Extend<ComponentDescriptor> for DescriptorSet {
    fn extend<I: IntoIterator<Item = ComponentDescriptor>>(&mut self, iter: I) {
        for descriptor in iter {
            self.insert(descriptor);
        }
    }
}
impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a ComponentDescriptor;
    type IntoIter = std::slice::Iter<'a, ComponentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

/// Combines the descriptors recovered from the previous run's artifact with
/// the descriptors scanned from this run's changed sources.
///
/// Fresh descriptors always win over recovered ones with the same identity and
/// take over their position. Recovered descriptors without a fresh counterpart
/// are kept as they are. Fresh descriptors which are new are appended in the
/// order they were scanned.
pub fn merge(
    recovered: impl IntoIterator<Item = ComponentDescriptor>,
    fresh: impl IntoIterator<Item = ComponentDescriptor>,
) -> DescriptorSet {
    let mut merged: DescriptorSet = recovered.into_iter().collect();
    let recovered_count = merged.len();

    let mut replaced: HashSet<String> = HashSet::new();
    let mut added = 0;
    for descriptor in fresh {
        let identity = descriptor.identity().to_string();
        let was_recovered = merged
            .position(&identity)
            .is_some_and(|position| position < recovered_count);

        match merged.insert(descriptor) {
            Some(_) if was_recovered && replaced.insert(identity.clone()) => {}
            Some(_) => {
                tracing::debug!("'{identity}' was scanned twice - keeping the last one");
            }
            None => added += 1,
        }
    }

    let kept = recovered_count - replaced.len();
    tracing::debug!(
        "Merged descriptors: {} replaced, {added} added, {kept} kept from previous run",
        replaced.len()
    );

    merged
}
