//! Loading a service configuration from arguments, the environment and a dotenv file.
//!
//! This example demonstrates:
//! - Describing a record with tagged fields
//! - Defaults, required values and numeric bounds
//! - Source precedence (arguments > environment > `.env`)
//! - Routing loader diagnostics to a tracing subscriber
//!
//! Run with: DB_URL=postgres://localhost/app cargo run --example env_config -- --PORT=9090

use configly::prelude::*;
use std::time::Duration;

/// Service configuration
#[derive(Debug, Default)]
struct ServiceConfig {
    port: u16,
    database_url: String,
    timeout: Duration,
    min_workers: i32,
    max_workers: i32,
    log_level: String,
    read_only: bool,
}

impl Configurable for ServiceConfig {
    fn describe(schema: &mut Schema<Self>) {
        schema
            .field("port", |c| &mut c.port)
            .tag("configly", "PORT,default=8080,min=1");
        schema
            .field("database_url", |c| &mut c.database_url)
            .tag("configly", "DB_URL,required");
        schema
            .field("timeout", |c| &mut c.timeout)
            .tag("configly", "TIMEOUT,default=30s");
        schema
            .field("min_workers", |c| &mut c.min_workers)
            .tag("configly", "MIN_WORKERS,default=2,min=1");
        schema
            .field("max_workers", |c| &mut c.max_workers)
            .tag("configly", "MAX_WORKERS,default=16,max=256");
        schema
            .field("log_level", |c| &mut c.log_level)
            .tag("configly", "LOG_LEVEL,default=info,minLen=4,maxLen=5");
        schema
            .field("read_only", |c| &mut c.read_only)
            .tag("configly", "READ_ONLY");
    }
}

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("configly=debug")),
        )
        .finish();

    let mut builder = Loader::builder()
        .with_logger(subscriber)
        .with_cli()
        .with_env();
    if std::path::Path::new(".env").exists() {
        builder = builder.with_file(".env");
    }

    let loader = match builder.build::<ServiceConfig>() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to create loader: {}", e);
            std::process::exit(1);
        }
    };
    println!("Sources (highest priority first): {:?}", loader.source_names());

    match loader.load() {
        Ok(config) => {
            println!("\nLoaded configuration:");
            println!("  port:        {}", config.port);
            println!("  database:    {}", config.database_url);
            println!("  timeout:     {:?}", config.timeout);
            println!("  workers:     {}..={}", config.min_workers, config.max_workers);
            println!("  log level:   {}", config.log_level);
            println!("  read only:   {}", config.read_only);
        }
        Err(ConfigError::Invalid(errors)) => {
            eprintln!("\nConfiguration rejected with {} problem(s):", errors.len());
            for error in &errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\nFailed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
