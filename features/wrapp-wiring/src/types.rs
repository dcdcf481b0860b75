use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::{builder::validate, errors::DescriptorError};

/// Identifier a component can be looked up by.
///
/// Either the component's own type, an interface it implements, or a
/// qualifying marker attached to it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(String);

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Capability(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Capability::new(name)
    }
}
impl From<String> for Capability {
    fn from(name: String) -> Self {
        Capability(name)
    }
}
impl Borrow<str> for Capability {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// How many providers a requirement wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one provider - checked by the emitter, not during ordering
    Single,
    /// Zero or one provider
    Optional,
    /// Every provider of the capability
    Collection,
}

/// A dependency of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRequirement {
    /// The requested capability
    pub target: Capability,
    /// If one, maybe one or all providers are wanted
    pub cardinality: Cardinality,
    /// Name used to pick between several same-typed providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}
impl DependencyRequirement {
    pub fn single(target: impl Into<Capability>) -> Self {
        Self::with_cardinality(target, Cardinality::Single)
    }

    pub fn optional(target: impl Into<Capability>) -> Self {
        Self::with_cardinality(target, Cardinality::Optional)
    }

    pub fn collection(target: impl Into<Capability>) -> Self {
        Self::with_cardinality(target, Cardinality::Collection)
    }

    pub fn with_cardinality(target: impl Into<Capability>, cardinality: Cardinality) -> Self {
        DependencyRequirement {
            target: target.into(),
            cardinality,
            qualifier: None,
        }
    }

    pub fn named(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}
impl fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cardinality {
            Cardinality::Single => write!(f, "{}", self.target)?,
            Cardinality::Optional => write!(f, "Option<{}>", self.target)?,
            Cardinality::Collection => write!(f, "Vec<{}>", self.target)?,
        }
        if let Some(qualifier) = &self.qualifier {
            write!(f, " named '{qualifier}'")?;
        }
        Ok(())
    }
}

/// Factory method on another component which produces this component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerMethod {
    /// Identity of the component owning the method
    pub owner: String,
    /// Name of the producing method
    pub method: String,
    /// The type the method returns
    pub produces: String,
}
impl ProducerMethod {
    /// Identity of a component produced by this method
    pub fn component_identity(&self) -> String {
        format!("{}#{}.{}", self.produces, self.owner, self.method)
    }
}
impl fmt::Display for ProducerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.method)
    }
}

/// Everything the wiring generator knows about one component.
///
/// Descriptors are immutable once built. Whether a descriptor has been placed
/// into the build order is tracked by the resolver, not by the descriptor.
///
/// Deserialized descriptors, as recovered from a previous run's artifact, go
/// through the same checks as built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord")]
pub struct ComponentDescriptor {
    pub(crate) identity: String,
    pub(crate) depends_on: Vec<DependencyRequirement>,
    pub(crate) provides: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) producer: Option<ProducerMethod>,
}

/// Unchecked form of a [ComponentDescriptor] as read from an artifact
#[derive(Deserialize)]
struct DescriptorRecord {
    identity: String,
    #[serde(default)]
    depends_on: Vec<DependencyRequirement>,
    #[serde(default)]
    provides: Vec<Capability>,
    #[serde(default)]
    producer: Option<ProducerMethod>,
}
impl TryFrom<DescriptorRecord> for ComponentDescriptor {
    type Error = DescriptorError;

    fn try_from(record: DescriptorRecord) -> Result<Self, Self::Error> {
        let descriptor = ComponentDescriptor {
            identity: record.identity,
            depends_on: record.depends_on,
            provides: record.provides,
            producer: record.producer,
        };
        validate(&descriptor)?;
        Ok(descriptor)
    }
}

impl ComponentDescriptor {
    /// Globally unique key of the component
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Dependencies in declaration order
    pub fn depends_on(&self) -> &[DependencyRequirement] {
        &self.depends_on
    }

    /// Capabilities other than the identity this component can be looked up by
    pub fn provides(&self) -> &[Capability] {
        &self.provides
    }

    pub fn producer(&self) -> Option<&ProducerMethod> {
        self.producer.as_ref()
    }

    pub fn has_dependencies(&self) -> bool {
        !self.depends_on.is_empty()
    }

    /// The type this component is an instance of
    pub fn component_type(&self) -> &str {
        match &self.producer {
            Some(producer) => &producer.produces,
            None => &self.identity,
        }
    }
}
impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.producer {
            Some(producer) => write!(f, "{} via {}", producer.produces, producer),
            None => f.write_str(&self.identity),
        }
    }
}
