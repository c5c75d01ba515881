use dragon_ini::{AppContext, Loader, MissingPolicy};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct AppConfig {
    name: String,
    debug: String,
    server: ServerSection,
    database: DatabaseSection,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ServerSection {
    url: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DatabaseSection {
    host: String,
    port: u16,
    url: String,
}

fn main() -> Result<(), dragon_ini::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ctx = AppContext::builder()
        .with_loader(
            Loader::builder()
                .with_missing_policy(MissingPolicy::Keep)
                .build(),
        )
        .with_file("demos/app.ini")
        .build()?;

    let store = ctx.config();
    println!(
        "{} (debug={})",
        store.string("name"),
        store.default_bool("debug", false)
    );
    println!("server: {}", store.string("server.url"));
    println!("workers: {}", store.default_int("server.workers", 4));

    let config: AppConfig = store.deserialize()?;
    println!("database: {}", config.database.url);
    println!("{config:#?}");

    Ok(())
}
