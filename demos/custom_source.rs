//! Example demonstrating custom configuration sources and source factories.
//!
//! This example shows how to:
//! - Implement `ConfigSource` for an in-process store
//! - Rank sources with ordinals
//! - Build a source from configuration with a `ConfigSourceFactory`
//! - Inspect where a value came from
//!
//! Run with: cargo run --example custom_source

use ordinal_config::prelude::*;
use ordinal_config::sources::{ConfigSource, ConfigSourceContext, ConfigSourceFactory, MapSource};
use std::collections::{BTreeMap, BTreeSet};

/// A source backed by a feature-flag table, as a flag service client would hold.
struct FeatureFlags {
    flags: BTreeMap<String, bool>,
}

impl ConfigSource for FeatureFlags {
    fn name(&self) -> String {
        "feature-flags".to_string()
    }

    fn ordinal(&self) -> i32 {
        200
    }

    fn property_names(&self) -> BTreeSet<String> {
        self.flags.keys().map(|k| format!("feature.{}", k)).collect()
    }

    fn get_value(&self, name: &str) -> Option<String> {
        let flag = name.strip_prefix("feature.")?;
        self.flags.get(flag).map(|enabled| enabled.to_string())
    }
}

/// Adds region-specific endpoints once the region is known.
struct RegionFactory;

impl ConfigSourceFactory for RegionFactory {
    fn name(&self) -> String {
        "region".to_string()
    }

    fn config_sources(
        &self,
        context: &ConfigSourceContext<'_>,
    ) -> Result<Vec<Box<dyn ConfigSource>>> {
        let Some(region) = context.get_value("app.region")? else {
            return Ok(Vec::new());
        };
        let source = MapSource::new(format!("region:{}", region.value()))
            .with_property(
                "api.endpoint",
                format!("https://{}.api.example.com", region.value()),
            )
            .with_ordinal(150);
        Ok(vec![Box::new(source)])
    }
}

fn main() -> Result<()> {
    println!("=== Custom Source Example ===\n");

    let flags = FeatureFlags {
        flags: BTreeMap::from([
            ("new-checkout".to_string(), true),
            ("dark-mode".to_string(), false),
        ]),
    };

    let config = Config::builder()
        .with_defaults([
            ("app.region", "us-east-1"),
            ("api.endpoint", "https://api.example.com"),
            ("feature.dark-mode", "true"),
        ])
        .with_source(MapSource::new("application").with_property("app.region", "eu-west-1"))
        .with_source(flags)
        .with_source_factory(RegionFactory)
        .build()?;

    println!("Sources in precedence order:");
    for source in config.config_sources() {
        println!("  {:>12}  {}", source.ordinal(), source.name());
    }
    println!();

    for name in ["app.region", "api.endpoint", "feature.new-checkout", "feature.dark-mode"] {
        if let Some(value) = config.get_config_value(name)? {
            println!("{}", value);
        }
    }

    let checkout: bool = config.get_value("feature.new-checkout")?;
    println!("\nnew checkout enabled: {}", checkout);

    Ok(())
}
