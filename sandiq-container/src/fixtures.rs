//! Components shared by the unit tests.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::{Component, Constructor, Dispose};

/// Routes container events to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub trait Logger: Debug + Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Debug)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn name(&self) -> &'static str {
        "console"
    }
}

impl Component for ConsoleLogger {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("ConsoleLogger", |_| Ok(ConsoleLogger))]
    }
}

#[derive(Debug)]
pub struct FileLogger;

impl Logger for FileLogger {
    fn name(&self) -> &'static str {
        "file"
    }
}

impl Component for FileLogger {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("FileLogger", |_| Ok(FileLogger))]
    }
}

crate::implements!(dyn Logger => ConsoleLogger, FileLogger);

/// Transient consumer of a logger.
#[derive(Debug)]
pub struct Greeter {
    pub logger: Arc<dyn Logger>,
}

impl Component for Greeter {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("Greeter", |ctx| Ok(Greeter { logger: ctx.get()? }))]
    }
}

/// Consumer of every visible logger.
#[derive(Debug)]
pub struct Broadcaster {
    pub loggers: Vec<Arc<dyn Logger>>,
}

impl Component for Broadcaster {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("Broadcaster", |ctx| {
            Ok(Broadcaster { loggers: ctx.get()? })
        })]
    }
}

/// Consumer with an optional logger.
#[derive(Debug)]
pub struct Quiet {
    pub logger: Option<Arc<dyn Logger>>,
}

impl Component for Quiet {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("Quiet", |ctx| Ok(Quiet { logger: ctx.get()? }))]
    }
}

/// Asks for a value type, which can never be resolved.
#[derive(Debug)]
pub struct NeedsPort {
    pub port: u16,
}

impl Component for NeedsPort {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("NeedsPort", |ctx| Ok(NeedsPort { port: ctx.get()? }))]
    }
}

/// Declares two constructors.
#[derive(Debug)]
pub struct ManyConstructors {
    pub via: &'static str,
}

impl Component for ManyConstructors {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("ManyConstructors::new", |_| Ok(ManyConstructors { via: "new" })),
            Constructor::new("ManyConstructors::with_logger", |ctx| {
                let _logger: Arc<dyn Logger> = ctx.get()?;
                Ok(ManyConstructors { via: "with_logger" })
            }),
        ]
    }
}

/// Declares no constructor at all.
#[derive(Debug)]
pub struct Abstract;

impl Component for Abstract {
    fn constructors() -> Vec<Constructor<Self>> {
        Vec::new()
    }
}

/// Records disposal order; registered as a pre-built instance.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<&'static str>>,
}

impl Journal {
    pub fn record(&self, entry: &'static str) {
        self.entries.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().clone()
    }
}

impl Component for Journal {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new("Journal", |_| Ok(Journal::default()))]
    }
}

macro_rules! disposable {
    ($name:ident { $($field:ident: $ty:ty),* }) => {
        #[derive(Debug)]
        pub struct $name {
            pub journal: Arc<Journal>,
            $(pub $field: $ty,)*
        }

        impl Dispose for $name {
            fn dispose(&self) {
                self.journal.record(stringify!($name));
            }
        }

        impl Component for $name {
            const DISPOSABLE: bool = true;

            fn constructors() -> Vec<Constructor<Self>> {
                vec![Constructor::new(stringify!($name), |ctx| {
                    Ok($name {
                        journal: ctx.get()?,
                        $($field: ctx.get()?,)*
                    })
                })]
            }

            fn into_dispose(this: Arc<Self>) -> Option<Arc<dyn Dispose>> {
                Some(this)
            }
        }
    };
}

disposable!(GrandParent {});
disposable!(Parent { grand: Arc<GrandParent> });
disposable!(Child { parent: Arc<Parent> });
