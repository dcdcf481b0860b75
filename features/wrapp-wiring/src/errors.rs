use thiserror::Error;

/// Errors while building a [ComponentDescriptor](crate::types::ComponentDescriptor)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The component has no identity
    #[error("A component was declared without an identity")]
    MissingIdentity,
    /// A capability or requirement of the component is an empty string
    #[error("'{identity}' declares an empty capability")]
    EmptyCapability { identity: String },
    /// The component requires itself
    #[error("'{identity}' depends on itself")]
    SelfDependency { identity: String },
    /// The producer method is missing its owner or name
    #[error("'{identity}' is produced by a method without owner or name")]
    MissingProducerOwner { identity: String },
}

/// Errors while loading a [WiringConfig](crate::config::WiringConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid wiring config: {0}")]
    Parse(#[from] toml::de::Error),
}
