use thiserror::Error;

use crate::{
    capability_index::{CapabilityIndex, WiringState},
    merge::DescriptorSet,
    report::BuildOrderReport,
    types::{Capability, ComponentDescriptor},
};

/// Orders the components of a [DescriptorSet] so every component is built
/// after the providers of everything it depends on.
///
/// Components which depend on nothing go first, in encounter order. Then the
/// remaining ones are placed in rounds: a component is placed once all
/// providers of all its requirements are wired. Placement within a round is
/// decided against the state at the start of the round. Whatever is left
/// once a round places nothing can not be proven satisfiable here - it is
/// appended in encounter order and reported, as its dependencies are assumed
/// to be supplied by an outer scope.
pub struct GraphResolver<'a> {
    descriptors: &'a DescriptorSet,
    index: &'a CapabilityIndex,
}

impl<'a> GraphResolver<'a> {
    /// `index` must have been built from `descriptors`
    pub fn new(descriptors: &'a DescriptorSet, index: &'a CapabilityIndex) -> Self {
        Self { descriptors, index }
    }

    pub fn resolve(&self) -> BuildOrderReport {
        let descriptors = self.descriptors.as_slice();
        let mut state = self.index.wiring_state();
        let mut ordered = Vec::with_capacity(descriptors.len());

        let (ready, mut pending): (Vec<usize>, Vec<usize>) =
            (0..descriptors.len()).partition(|&position| !descriptors[position].has_dependencies());

        for position in ready {
            state.mark_wired(position, self.index);
            ordered.push(position);
        }
        tracing::debug!(
            "{} components without dependencies, {} pending",
            ordered.len(),
            pending.len()
        );

        let mut rounds = 0;
        while !pending.is_empty() {
            let (placeable, remaining): (Vec<usize>, Vec<usize>) = pending
                .iter()
                .partition(|&&position| self.is_placeable(&descriptors[position], &state));

            if placeable.is_empty() {
                break;
            }
            rounds += 1;
            tracing::debug!("Round {rounds} placed {} components", placeable.len());

            for &position in &placeable {
                state.mark_wired(position, self.index);
            }
            ordered.extend(placeable);
            pending = remaining;
        }

        let diagnostics = pending
            .iter()
            .filter_map(|&position| self.diagnose(&descriptors[position], &state))
            .collect();
        let resolved = ordered.len();
        ordered.extend(pending);

        BuildOrderReport::new(
            ordered
                .into_iter()
                .map(|position| descriptors[position].clone())
                .collect(),
            resolved,
            UnresolvedDependencies {
                errors: diagnostics,
            },
            rounds,
        )
    }

    fn is_placeable(&self, descriptor: &ComponentDescriptor, state: &WiringState) -> bool {
        descriptor
            .depends_on()
            .iter()
            .all(|requirement| self.index.is_fully_wired(requirement.target.as_str(), state))
    }

    /// Explains the first requirement which kept the component from being placed
    fn diagnose(
        &self,
        descriptor: &ComponentDescriptor,
        state: &WiringState,
    ) -> Option<UnresolvedDependency> {
        let requirement = descriptor
            .depends_on()
            .iter()
            .find(|requirement| !self.index.is_fully_wired(requirement.target.as_str(), state))?;

        let providers = self.index.providers(requirement.target.as_str());
        let reason = if providers.is_empty() {
            UnsatisfiedReason::NoProvider
        } else {
            UnsatisfiedReason::ProvidersUnwired {
                providers: providers
                    .iter()
                    .filter(|&&position| !state.is_wired(position))
                    .map(|&position| self.descriptors.as_slice()[position].identity().to_string())
                    .collect(),
            }
        };

        Some(UnresolvedDependency {
            component: descriptor.identity().to_string(),
            capability: requirement.target.clone(),
            reason,
        })
    }
}

/// Why a capability never became fully wired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsatisfiedReason {
    /// Nothing in the visible graph provides it
    NoProvider,
    /// It is provided, but these providers could not be placed themselves
    ProvidersUnwired { providers: Vec<String> },
}

/// A component which could not be placed, because one of its dependencies is
/// not satisfied within the visible graph.
///
/// Not fatal - the component is still emitted, last.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{component}' needs '{capability}' {}", describe(.reason))]
pub struct UnresolvedDependency {
    pub component: String,
    pub capability: Capability,
    pub reason: UnsatisfiedReason,
}

fn describe(reason: &UnsatisfiedReason) -> String {
    match reason {
        UnsatisfiedReason::NoProvider => {
            "but nothing provides it - assuming it is supplied externally".to_string()
        }
        UnsatisfiedReason::ProvidersUnwired { providers } => {
            format!("but its providers {providers:?} are unresolved themselves")
        }
    }
}

impl std::fmt::Display for UnresolvedDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The dependency graph has unresolved components:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
pub struct UnresolvedDependencies {
    pub errors: Vec<UnresolvedDependency>,
}
impl UnresolvedDependencies {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnresolvedDependency> {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{builder::DescriptorBuilder, config::ExcludedMarkers};

    fn resolve(builders: Vec<DescriptorBuilder>) -> BuildOrderReport {
        let excluded = ExcludedMarkers::default();
        let descriptors: DescriptorSet = builders
            .into_iter()
            .map(|builder| builder.build(&excluded).unwrap())
            .collect();
        let index = CapabilityIndex::build(&descriptors);
        GraphResolver::new(&descriptors, &index).resolve()
    }

    #[test]
    fn places_dependency_chain_in_rounds() {
        let report = resolve(vec![
            DescriptorBuilder::new("C").requires("B"),
            DescriptorBuilder::new("B").requires("A"),
            DescriptorBuilder::new("A"),
        ]);

        assert_eq!(report.identities(), vec!["A", "B", "C"]);
        assert_eq!(report.rounds(), 2);
        assert!(report.is_complete());
    }

    #[test]
    fn round_decisions_ignore_placements_in_the_same_round() {
        // B becomes placeable in round 1, C only sees it in round 2
        let report = resolve(vec![
            DescriptorBuilder::new("A"),
            DescriptorBuilder::new("B").requires("A"),
            DescriptorBuilder::new("C").requires("B"),
            DescriptorBuilder::new("D").requires("A"),
        ]);

        assert_eq!(report.identities(), vec!["A", "B", "D", "C"]);
        assert_eq!(report.rounds(), 2);
    }

    #[test]
    fn missing_provider_is_reported() {
        let report = resolve(vec![
            DescriptorBuilder::new("A").requires("Y"),
            DescriptorBuilder::new("B"),
        ]);

        assert_eq!(report.identities(), vec!["B", "A"]);
        assert_eq!(
            report.diagnostics().errors,
            vec![UnresolvedDependency {
                component: "A".into(),
                capability: Capability::new("Y"),
                reason: UnsatisfiedReason::NoProvider,
            }]
        );
    }

    #[test]
    fn cycle_is_reported_with_unwired_providers() {
        let report = resolve(vec![
            DescriptorBuilder::new("A").requires("B"),
            DescriptorBuilder::new("B").requires("A"),
        ]);

        assert_eq!(report.identities(), vec!["A", "B"]);
        assert_eq!(report.unresolved().len(), 2);
        assert_eq!(
            report.diagnostics().errors[0].reason,
            UnsatisfiedReason::ProvidersUnwired {
                providers: vec!["B".into()]
            }
        );
    }

    #[test]
    fn dependents_of_unresolved_components_are_unresolved() {
        let report = resolve(vec![
            DescriptorBuilder::new("A").requires("External"),
            DescriptorBuilder::new("B").requires("A"),
            DescriptorBuilder::new("C"),
        ]);

        assert_eq!(report.identities(), vec!["C", "A", "B"]);
        assert_eq!(report.diagnostics().len(), 2);
        assert_eq!(report.diagnostics().errors[1].capability, Capability::new("A"));
    }

    #[test]
    fn single_requirement_tolerates_several_providers() {
        let report = resolve(vec![
            DescriptorBuilder::new("Consumer").requires("Heater"),
            DescriptorBuilder::new("Electric").interface("Heater"),
            DescriptorBuilder::new("Gas").interface("Heater"),
        ]);

        assert_eq!(report.identities(), vec!["Electric", "Gas", "Consumer"]);
        assert!(report.is_complete());
    }

    #[test]
    fn produced_component_follows_its_owner() {
        let report = resolve(vec![
            DescriptorBuilder::new("Heater").produced_by("Config", "heater"),
            DescriptorBuilder::new("Pump").requires("Heater"),
            DescriptorBuilder::new("Config"),
        ]);

        assert_eq!(
            report.identities(),
            vec!["Config", "Heater#Config.heater", "Pump"]
        );
    }

    #[test]
    fn diagnostics_display_lists_every_component() {
        let report = resolve(vec![
            DescriptorBuilder::new("A").requires("X"),
            DescriptorBuilder::new("B").requires("A"),
        ]);

        assert_eq!(
            report.diagnostics().to_string(),
            "The dependency graph has unresolved components:\n\
             - 'A' needs 'X' but nothing provides it - assuming it is supplied externally\n\
             - 'B' needs 'A' but its providers [\"A\"] are unresolved themselves"
        );
    }

    #[test]
    fn empty_set_resolves_to_empty_report() {
        let report = resolve(Vec::new());
        assert!(report.ordered().is_empty());
        assert!(report.is_complete());
        assert_eq!(report.rounds(), 0);
    }
}
