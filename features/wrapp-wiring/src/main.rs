use std::error::Error;

use tracing_subscriber::EnvFilter;
use wrapp_wiring::{plan_wiring, DescriptorBuilder, WiringConfig};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WiringConfig::default();
    let excluded = &config.excluded_markers;

    // Previous run
    let recovered = vec![
        DescriptorBuilder::new("coffee::CoffeeMaker")
            .requires("coffee::Heater")
            .requires("coffee::Pump")
            .marker("javax.inject.Singleton")
            .build(excluded)?,
        DescriptorBuilder::new("coffee::Config").build(excluded)?,
    ];

    // Changed sources
    let fresh = vec![
        DescriptorBuilder::new("coffee::Thermosiphon")
            .interface("coffee::Pump")
            .requires("coffee::Heater")
            .build(excluded)?,
        DescriptorBuilder::new("coffee::ElectricHeater")
            .produced_by("coffee::Config", "heater")
            .interface("coffee::Heater")
            .build(excluded)?,
        DescriptorBuilder::new("coffee::Barista")
            .requires("coffee::CoffeeMaker")
            .requires("billing::Register")
            .build(excluded)?,
    ];

    let report = plan_wiring(recovered, fresh, &config);

    println!("Build order for module '{}':", report.module_path().unwrap_or(""));
    for (i, descriptor) in report.ordered().iter().enumerate() {
        println!("{:>3}. {}", i + 1, descriptor);
    }
    if !report.is_complete() {
        println!("{}", report.diagnostics());
    }

    Ok(())
}
