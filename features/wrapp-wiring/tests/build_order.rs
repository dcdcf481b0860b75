//! Wiring scenarios across merge, index and resolve

use pretty_assertions::assert_eq;
use wrapp_wiring::{
    merge, plan_wiring, Capability, CapabilityIndex, ComponentDescriptor, ContextModule,
    DescriptorBuilder, DescriptorSet, ExcludedMarkers, GraphResolver, UnsatisfiedReason,
    WiringConfig,
};

fn build(builder: DescriptorBuilder) -> ComponentDescriptor {
    builder.build(&ExcludedMarkers::default()).unwrap()
}

fn resolve_identities(descriptors: Vec<ComponentDescriptor>) -> Vec<String> {
    plan_wiring(Vec::new(), descriptors, &WiringConfig::default())
        .identities()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_provider_before_dependent() {
    let report = plan_wiring(
        Vec::new(),
        vec![
            build(DescriptorBuilder::new("A").interface("X")),
            build(DescriptorBuilder::new("B").requires("X")),
        ],
        &WiringConfig::default(),
    );

    assert_eq!(report.identities(), vec!["A", "B"]);
    assert!(report.is_complete());
    assert!(report.diagnostics().is_empty());
}

#[test]
fn test_unprovided_dependency_goes_last() {
    let report = plan_wiring(
        Vec::new(),
        vec![
            build(DescriptorBuilder::new("A").requires("Y")),
            build(DescriptorBuilder::new("B")),
        ],
        &WiringConfig::default(),
    );

    assert_eq!(report.identities(), vec!["B", "A"]);
    assert_eq!(report.unresolved().len(), 1);
    assert_eq!(report.unresolved()[0].identity(), "A");

    let diagnostics = report.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.errors[0].component, "A");
    assert_eq!(diagnostics.errors[0].capability, Capability::new("Y"));
    assert_eq!(diagnostics.errors[0].reason, UnsatisfiedReason::NoProvider);
}

#[test]
fn test_independent_components_keep_encounter_order() {
    let identities = resolve_identities(vec![
        build(DescriptorBuilder::new("Zeta")),
        build(DescriptorBuilder::new("Alpha")),
        build(DescriptorBuilder::new("Mid")),
    ]);

    assert_eq!(identities, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn test_recovered_component_waits_for_new_provider() {
    let recovered = vec![build(DescriptorBuilder::new("A").requires("X"))];
    let fresh = vec![build(DescriptorBuilder::new("XProvider").interface("X"))];

    let merged = merge(recovered, fresh);
    assert_eq!(merged.len(), 2);

    let index = CapabilityIndex::build(&merged);
    let report = GraphResolver::new(&merged, &index).resolve();

    assert_eq!(report.identities(), vec!["XProvider", "A"]);
    assert!(report.is_complete());
}

#[test]
fn test_collection_waits_for_all_providers() {
    let report = plan_wiring(
        Vec::new(),
        vec![
            build(DescriptorBuilder::new("C").requires_all("X")),
            build(DescriptorBuilder::new("P1").interface("X").requires("Base")),
            build(DescriptorBuilder::new("P2").interface("X")),
            build(DescriptorBuilder::new("Base")),
        ],
        &WiringConfig::default(),
    );

    // P2 is ready at once, P1 only after Base - C must wait for both
    assert_eq!(report.identities(), vec!["P2", "Base", "P1", "C"]);
}

#[test]
fn test_fresh_descriptor_replaces_recovered() {
    let recovered = vec![
        build(DescriptorBuilder::new("Maker").requires("OldHeater")),
        build(DescriptorBuilder::new("Pump")),
    ];
    let fresh_maker = build(
        DescriptorBuilder::new("Maker")
            .requires("Pump")
            .interface("Machine"),
    );

    let merged = merge(recovered, vec![fresh_maker.clone()]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("Maker"), Some(&fresh_maker));

    let index = CapabilityIndex::build(&merged);
    let report = GraphResolver::new(&merged, &index).resolve();
    assert_eq!(report.identities(), vec!["Pump", "Maker"]);
    assert!(report.is_complete());
}

#[test]
fn test_wiring_state_is_not_carried_between_runs() {
    let descriptors: DescriptorSet = vec![
        build(DescriptorBuilder::new("A")),
        build(DescriptorBuilder::new("B").requires("A")),
    ]
    .into_iter()
    .collect();
    let index = CapabilityIndex::build(&descriptors);
    let resolver = GraphResolver::new(&descriptors, &index);

    let first = resolver.resolve();
    let second = resolver.resolve();

    assert_eq!(first.identities(), second.identities());
    assert_eq!(first.rounds(), second.rounds());
}

#[test]
fn test_report_records_descriptors_for_next_run() {
    let config = WiringConfig::default();
    let first = plan_wiring(
        Vec::new(),
        vec![
            build(DescriptorBuilder::new("B").requires("A")),
            build(DescriptorBuilder::new("A")),
        ],
        &config,
    );
    let recorded = first.into_descriptors();

    // Nothing changed - the recorded order resolves to itself
    let second = plan_wiring(recorded.clone(), Vec::new(), &config);
    assert_eq!(second.ordered(), recorded.as_slice());
}

#[test]
fn test_module_details_are_passed_through() {
    let config = WiringConfig {
        module: ContextModule {
            name: Some("coffee".into()),
            depends_on: vec!["base".into()],
        },
        ..WiringConfig::default()
    };

    let report = plan_wiring(
        Vec::new(),
        vec![
            build(DescriptorBuilder::new("app::coffee::Pump")),
            build(DescriptorBuilder::new("app::coffee::brew::Maker").requires("app::coffee::Pump")),
        ],
        &config,
    );

    assert_eq!(report.module(), &config.module);
    assert_eq!(report.module_path(), Some("app::coffee"));
}

#[test]
fn test_excluded_markers_do_not_satisfy_dependencies() {
    let config = WiringConfig::default();
    let report = plan_wiring(
        Vec::new(),
        vec![
            DescriptorBuilder::new("Consumer")
                .requires("javax.inject.Singleton")
                .build(&config.excluded_markers)
                .unwrap(),
            DescriptorBuilder::new("Service")
                .marker("javax.inject.Singleton")
                .build(&config.excluded_markers)
                .unwrap(),
        ],
        &config,
    );

    assert_eq!(report.identities(), vec!["Service", "Consumer"]);
    assert_eq!(report.unresolved().len(), 1);
}

#[test]
fn test_recovered_descriptors_deserialize() {
    let recovered: ComponentDescriptor = toml::from_str(
        r#"
        identity = "coffee::Heater#coffee::Config.heater"
        provides = ["coffee::Heater"]

        [[depends_on]]
        target = "coffee::Config"
        cardinality = "single"

        [producer]
        owner = "coffee::Config"
        method = "heater"
        produces = "coffee::Heater"
        "#,
    )
    .unwrap();

    let expected = build(DescriptorBuilder::new("coffee::Heater").produced_by("coffee::Config", "heater"));
    assert_eq!(recovered, expected);
}
