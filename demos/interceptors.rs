//! Example demonstrating the interceptor chain.
//!
//! This example shows how to:
//! - Activate profiles and use `%profile.` properties
//! - Expand `${...}` expressions with defaults
//! - Relocate renamed properties
//! - Add a custom interceptor and mask secrets in resolution logs
//!
//! Run with: RUST_LOG=debug cargo run --example interceptors

use ordinal_config::interceptors::{from_fn, priorities};
use ordinal_config::prelude::*;
use ordinal_config::sources::MapSource;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Interceptors Example ===\n");

    let application = MapSource::new("application")
        .with_property("config.profile", "dev")
        .with_property("db.host", "db.internal")
        .with_property("%dev.db.host", "localhost")
        .with_property("datasource.url", "postgres://${db.host}:${db.port:5432}/app")
        .with_property("datasource.password", "hunter2")
        .with_property("greeting", "hello");

    let config = Config::builder()
        .with_source(application)
        .with_relocations(HashMap::from([(
            "db.url".to_string(),
            "datasource.url".to_string(),
        )]))
        .with_interceptor(
            priorities::APPLICATION,
            from_fn(|context, name| {
                Ok(context.proceed(name)?.map(|value| {
                    if name == "greeting" {
                        let shouted = value.value().to_uppercase();
                        value.with_value(shouted)
                    } else {
                        value
                    }
                }))
            }),
        )
        .with_logging()
        .with_secret_keys(["datasource.password"])
        .build()?;

    println!("Active profiles: {:?}", config.profiles());
    println!("Interceptor priorities: {:?}\n", config.interceptor_priorities());

    println!("db.host        = {}", config.get_value::<String>("db.host")?);
    println!("db.url         = {}", config.get_value::<String>("db.url")?);
    println!("greeting       = {}", config.get_value::<String>("greeting")?);

    match config.get_value::<String>("missing.key") {
        Ok(value) => println!("missing.key    = {}", value),
        Err(e) => println!("missing.key    -> {}", e),
    }

    Ok(())
}
