//! Wrapp Wiring computes, at build time, the order in which the components of
//! an application have to be constructed so that each one finds its
//! dependencies already built. No reflection is needed at run time - the
//! emitter generates plain construction code from the resulting order.
//!
//! One wiring run consists of three steps:
//! 1. Merge: descriptors recovered from the previously generated artifact are
//!    combined with descriptors freshly scanned from changed sources.
//! 2. Index: every capability is mapped to the descriptors providing it.
//! 3. Resolve: descriptors are placed in rounds until nothing more can be
//!    placed. Leftovers are assumed to depend on an outer scope and are
//!    reported, not rejected.
//!
//! # Examples
//!
//! ```rust
//! use wrapp_wiring::{plan_wiring, DescriptorBuilder, WiringConfig};
//!
//! let config = WiringConfig::default();
//! let heater = DescriptorBuilder::new("coffee::ElectricHeater")
//!     .interface("coffee::Heater")
//!     .build(&config.excluded_markers)
//!     .unwrap();
//! let maker = DescriptorBuilder::new("coffee::CoffeeMaker")
//!     .requires("coffee::Heater")
//!     .build(&config.excluded_markers)
//!     .unwrap();
//!
//! let report = plan_wiring(Vec::new(), vec![maker, heater], &config);
//! assert_eq!(
//!     report.identities(),
//!     vec!["coffee::ElectricHeater", "coffee::CoffeeMaker"]
//! );
//! ```

pub mod builder;
pub mod capability_index;
pub mod config;
pub mod dependency_graph;
pub mod errors;
pub mod merge;
pub mod report;
pub mod types;

pub use builder::DescriptorBuilder;
pub use capability_index::{CapabilityIndex, WiringState};
pub use config::{ContextModule, DiagnosticLevel, ExcludedMarkers, WiringConfig};
pub use dependency_graph::{
    GraphResolver, UnresolvedDependencies, UnresolvedDependency, UnsatisfiedReason,
};
pub use errors::{ConfigError, DescriptorError};
pub use merge::{merge, DescriptorSet};
pub use report::BuildOrderReport;
pub use types::{Capability, Cardinality, ComponentDescriptor, DependencyRequirement, ProducerMethod};

/// Runs one wiring pass: merge, index and resolve.
///
/// Nothing is kept between calls, every call works on its own set, index and
/// wiring state.
pub fn plan_wiring(
    recovered: impl IntoIterator<Item = ComponentDescriptor>,
    fresh: impl IntoIterator<Item = ComponentDescriptor>,
    config: &WiringConfig,
) -> BuildOrderReport {
    let descriptors = merge(recovered, fresh);
    let index = CapabilityIndex::build(&descriptors);
    let report = GraphResolver::new(&descriptors, &index)
        .resolve()
        .with_module(config.module.clone());

    log_unresolved(&report, config.unresolved_level);

    report
}

fn log_unresolved(report: &BuildOrderReport, level: DiagnosticLevel) {
    let unresolved = report.unresolved().len();
    if unresolved == 0 {
        return;
    }

    tracing::warn!(
        "there are {unresolved} components with unsatisfied dependencies (assuming external dependencies)"
    );
    for diagnostic in report.diagnostics().iter() {
        match level {
            DiagnosticLevel::Warn => tracing::warn!("{diagnostic}"),
            DiagnosticLevel::Info => tracing::info!("{diagnostic}"),
            DiagnosticLevel::Debug => tracing::debug!("{diagnostic}"),
        }
    }
}
