//! Basic example of the Sandiq DI container.
//!
//! Run with `RUST_LOG=sandiq_container=debug` to watch registrations,
//! resolutions and disposal.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sandiq::prelude::*;

// === Define your traits and types ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

#[derive(Component)]
#[component(implements = "dyn Logger")]
struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

/// Owns a (pretend) connection pool; closed when the root container goes away.
#[derive(Component)]
#[component(dispose, no_constructor)]
struct Database {
    url: String,
    queries: AtomicUsize,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.queries.fetch_add(1, Ordering::SeqCst);
        format!("Results of `{sql}` from {}", self.url)
    }
}

impl Dispose for Database {
    fn dispose(&self) {
        println!(
            "🔌 Closing {} after {} queries",
            self.url,
            self.queries.load(Ordering::SeqCst)
        );
    }
}

#[derive(Component)]
struct UserRepository {
    db: Arc<Database>,
}

#[derive(Component)]
struct UserService {
    repo: Arc<UserRepository>,
    logger: Arc<dyn Logger>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        self.repo.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Application-wide services live in the root container
    let mut builder = Container::builder();
    builder
        .register::<dyn Logger, ConsoleLogger>(Lifetime::Singleton)?
        .register_self_factory::<Database>(Lifetime::Singleton, |_| {
            Ok(Database {
                url: "postgres://localhost/myapp".to_string(),
                queries: AtomicUsize::new(0),
            })
        })?
        .register_self::<UserRepository>(Lifetime::Singleton)?;
    let root = builder.build()?;

    println!("✅ Container built successfully!");
    println!("{root:?}");

    // === One child container per request ===
    for id in [42, 7] {
        let mut builder = root.create_child_container()?;
        builder.register_self::<UserService>(Lifetime::Transient)?;
        let request = builder.build()?;

        let service: Arc<UserService> = request.resolve_one(ResolveStrategy::Any)?;
        println!("👤 {}", service.get_user(id));

        // Disposing the request leaves the shared database open
        request.dispose()?;
    }

    let strategy: ResolveStrategy = "non-local".parse()?;
    tracing::info!(%strategy, "Strategy parsed from configuration");

    root.dispose()?;
    println!("\n🎉 Everything works!");
    Ok(())
}
