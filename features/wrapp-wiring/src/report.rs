use crate::{
    config::ContextModule, dependency_graph::UnresolvedDependencies, types::ComponentDescriptor,
};

const PATH_SEPARATOR: &str = "::";

/// Result of resolving a descriptor set, handed to the emitter.
///
/// `ordered` holds every descriptor exactly once. The resolved ones come first
/// in construction order, followed by the unresolved ones in encounter order.
#[derive(Debug, Clone)]
pub struct BuildOrderReport {
    ordered: Vec<ComponentDescriptor>,
    resolved: usize,
    diagnostics: UnresolvedDependencies,
    rounds: usize,
    module: ContextModule,
    module_path: Option<String>,
}

impl BuildOrderReport {
    pub(crate) fn new(
        ordered: Vec<ComponentDescriptor>,
        resolved: usize,
        diagnostics: UnresolvedDependencies,
        rounds: usize,
    ) -> Self {
        let module_path = common_module_path(&ordered);
        BuildOrderReport {
            ordered,
            resolved,
            diagnostics,
            rounds,
            module: ContextModule::default(),
            module_path,
        }
    }

    pub(crate) fn with_module(mut self, module: ContextModule) -> Self {
        self.module = module;
        self
    }

    /// All descriptors in the order they should be constructed
    pub fn ordered(&self) -> &[ComponentDescriptor] {
        &self.ordered
    }

    /// Descriptors whose dependencies are all satisfied
    pub fn resolved(&self) -> &[ComponentDescriptor] {
        &self.ordered[..self.resolved]
    }

    /// Descriptors assumed to depend on something outside the visible graph
    pub fn unresolved(&self) -> &[ComponentDescriptor] {
        &self.ordered[self.resolved..]
    }

    /// One diagnostic per unresolved descriptor
    pub fn diagnostics(&self) -> &UnresolvedDependencies {
        &self.diagnostics
    }

    /// Number of rounds which placed at least one descriptor
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_complete(&self) -> bool {
        self.resolved == self.ordered.len()
    }

    pub fn module(&self) -> &ContextModule {
        &self.module
    }

    /// Common parent module of all directly constructed components
    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    pub fn identities(&self) -> Vec<&str> {
        self.ordered.iter().map(ComponentDescriptor::identity).collect()
    }

    /// The ordered descriptors, to be recorded for the next incremental run
    pub fn into_descriptors(self) -> Vec<ComponentDescriptor> {
        self.ordered
    }
}

/// Module path of a type path, "" for a type at the root
fn parent_path(type_path: &str) -> &str {
    match type_path.rfind(PATH_SEPARATOR) {
        Some(position) => &type_path[..position],
        None => "",
    }
}

/// Longest module path shared by `left` and `right`, segment wise
fn common_parent<'a>(left: &'a str, right: &str) -> &'a str {
    let mut shared = 0;
    let segments = left.split(PATH_SEPARATOR).zip(right.split(PATH_SEPARATOR));
    for (i, (l, r)) in segments.enumerate() {
        if l != r {
            break;
        }
        shared += l.len();
        if i > 0 {
            shared += PATH_SEPARATOR.len();
        }
    }
    &left[..shared]
}

fn common_module_path(descriptors: &[ComponentDescriptor]) -> Option<String> {
    descriptors
        .iter()
        .filter(|descriptor| descriptor.producer().is_none())
        .map(|descriptor| parent_path(descriptor.identity()))
        .reduce(common_parent)
        .map(str::to_string)
}
