use crate::{
    config::ExcludedMarkers,
    errors::DescriptorError,
    types::{Capability, ComponentDescriptor, DependencyRequirement, ProducerMethod},
};

//////////////////////////////////////////////////////////////////////
///
/// Collects the facts a scanner found about one component and turns them into
/// a validated [ComponentDescriptor].
///
/// Interfaces always become capabilities. Markers only do if they are not in
/// the [ExcludedMarkers] passed to [DescriptorBuilder::build].
pub struct DescriptorBuilder {
    identity: String,
    depends_on: Vec<DependencyRequirement>,
    interfaces: Vec<Capability>,
    markers: Vec<Capability>,
    producer: Option<(String, String)>,
}

impl DescriptorBuilder {
    /// Starts a descriptor for the given type
    pub fn new(identity: impl Into<String>) -> Self {
        DescriptorBuilder {
            identity: identity.into(),
            depends_on: Vec::new(),
            interfaces: Vec::new(),
            markers: Vec::new(),
            producer: None,
        }
    }
}
impl DescriptorBuilder {
    pub fn depends_on(mut self, requirement: DependencyRequirement) -> Self {
        self.depends_on.push(requirement);
        self
    }

    pub fn requires(self, target: impl Into<Capability>) -> Self {
        self.depends_on(DependencyRequirement::single(target))
    }

    pub fn requires_optional(self, target: impl Into<Capability>) -> Self {
        self.depends_on(DependencyRequirement::optional(target))
    }

    pub fn requires_all(self, target: impl Into<Capability>) -> Self {
        self.depends_on(DependencyRequirement::collection(target))
    }

    /// An interface the component implements
    pub fn interface(mut self, capability: impl Into<Capability>) -> Self {
        self.interfaces.push(capability.into());
        self
    }

    /// A marker attached to the component
    pub fn marker(mut self, capability: impl Into<Capability>) -> Self {
        self.markers.push(capability.into());
        self
    }

    /// The component is produced by `method` on the `owner` component.
    ///
    /// The type given to [DescriptorBuilder::new] becomes the produced type.
    pub fn produced_by(mut self, owner: impl Into<String>, method: impl Into<String>) -> Self {
        self.producer = Some((owner.into(), method.into()));
        self
    }

    pub fn build(self, excluded: &ExcludedMarkers) -> Result<ComponentDescriptor, DescriptorError> {
        let DescriptorBuilder {
            identity: declared_type,
            depends_on: declared_dependencies,
            interfaces,
            markers,
            producer,
        } = self;

        let declared_type = declared_type.trim().to_string();
        let producer = producer.map(|(owner, method)| ProducerMethod {
            owner,
            method,
            produces: declared_type.clone(),
        });

        let identity = match &producer {
            Some(producer) => producer.component_identity(),
            None => declared_type.clone(),
        };

        // Produced components need their owner first
        let mut depends_on = Vec::with_capacity(declared_dependencies.len() + 1);
        if let Some(producer) = &producer {
            depends_on.push(DependencyRequirement::single(producer.owner.as_str()));
        }
        depends_on.extend(declared_dependencies);

        let mut provides: Vec<Capability> = Vec::new();
        if producer.is_some() {
            provides.push(Capability::new(declared_type));
        }
        let markers = markers
            .into_iter()
            .filter(|marker| !excluded.is_excluded(marker.as_str()));
        for capability in interfaces.into_iter().chain(markers) {
            if capability.as_str() == identity || provides.contains(&capability) {
                continue;
            }
            provides.push(capability);
        }

        let descriptor = ComponentDescriptor {
            identity,
            depends_on,
            provides,
            producer,
        };
        validate(&descriptor)?;
        Ok(descriptor)
    }
}

/// Checks a descriptor is well formed, no matter if it was built or recovered.
///
/// A component may not require a capability it provides itself: its own
/// capability is only fully wired once the component is, so it could never be
/// placed.
pub(crate) fn validate(descriptor: &ComponentDescriptor) -> Result<(), DescriptorError> {
    let identity = descriptor.identity();
    if identity.trim().is_empty() {
        return Err(DescriptorError::MissingIdentity);
    }

    if let Some(producer) = descriptor.producer() {
        if producer.produces.trim().is_empty() {
            return Err(DescriptorError::MissingIdentity);
        }
        if producer.owner.trim().is_empty() || producer.method.trim().is_empty() {
            return Err(DescriptorError::MissingProducerOwner {
                identity: identity.to_string(),
            });
        }
    }

    let empty_capability = descriptor
        .provides()
        .iter()
        .chain(descriptor.depends_on().iter().map(|requirement| &requirement.target))
        .any(|capability| capability.as_str().is_empty());
    if empty_capability {
        return Err(DescriptorError::EmptyCapability {
            identity: identity.to_string(),
        });
    }

    for requirement in descriptor.depends_on() {
        if requirement.target.as_str() == identity
            || descriptor.provides().contains(&requirement.target)
        {
            return Err(DescriptorError::SelfDependency {
                identity: identity.to_string(),
            });
        }
    }

    Ok(())
}
