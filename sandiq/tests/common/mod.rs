//! Test components shaped like a small file-management application.
#![allow(dead_code)]

use std::any::type_name;
use std::sync::Arc;

use parking_lot::Mutex;
use sandiq::prelude::*;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Loggers ──

pub trait ErrorLogger: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Component)]
#[component(implements = "dyn ErrorLogger")]
pub struct ConsoleLogger;

impl ErrorLogger for ConsoleLogger {
    fn name(&self) -> &'static str {
        "console"
    }
}

#[derive(Component)]
#[component(implements = "dyn ErrorLogger")]
pub struct FileLogger;

impl ErrorLogger for FileLogger {
    fn name(&self) -> &'static str {
        "file"
    }
}

// ── File system ──

pub trait UserDirectory: Send + Sync {}

pub trait UserFile: Send + Sync {}

#[derive(Component)]
#[component(implements = "dyn UserDirectory")]
pub struct PublicDirectory;
impl UserDirectory for PublicDirectory {}

#[derive(Component)]
#[component(implements = "dyn UserDirectory")]
pub struct HiddenDirectory;
impl UserDirectory for HiddenDirectory {}

#[derive(Component)]
#[component(implements = "dyn UserFile")]
pub struct SystemFile;
impl UserFile for SystemFile {}

#[derive(Component)]
#[component(implements = "dyn UserFile")]
pub struct DocumentFile;
impl UserFile for DocumentFile {}

#[derive(Component)]
pub struct FileSystem {
    pub files: Vec<Arc<dyn UserFile>>,
    pub directories: Vec<Arc<dyn UserDirectory>>,
    pub logger: Arc<dyn ErrorLogger>,
}

/// Can only be built from a pre-supplied instance.
#[derive(Component)]
pub struct TypeWithIntParameter {
    pub value: u32,
}

// ── Several constructors ──

pub struct ManyConstructors {
    pub constructor_used: &'static str,
}

impl ManyConstructors {
    pub fn new() -> Self {
        Self { constructor_used: "without parameters" }
    }

    pub fn with_logger(_logger: Arc<dyn ErrorLogger>) -> Self {
        Self { constructor_used: "with ErrorLogger" }
    }

    pub fn with_directory(_directory: Arc<dyn UserDirectory>) -> Self {
        Self { constructor_used: "with UserDirectory" }
    }
}

impl Component for ManyConstructors {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new("ManyConstructors::new", |_| Ok(Self::new())),
            Constructor::new("ManyConstructors::with_logger", |ctx| {
                Ok(Self::with_logger(ctx.get()?))
            }),
            Constructor::new("ManyConstructors::with_directory", |ctx| {
                Ok(Self::with_directory(ctx.get()?))
            }),
        ]
    }
}

// ── Disposal ──

/// Shared record of disposal order.
#[derive(Component, Default)]
#[component(no_constructor)]
pub struct DisposableSequence {
    disposed: Mutex<Vec<&'static str>>,
}

impl DisposableSequence {
    pub fn save<T>(&self) {
        let name = type_name::<T>().rsplit("::").next().unwrap_or_default();
        self.disposed.lock().push(name);
    }

    pub fn disposed(&self) -> Vec<&'static str> {
        self.disposed.lock().clone()
    }
}

#[derive(Component)]
#[component(dispose)]
pub struct ChildDisposable {
    sequence: Arc<DisposableSequence>,
}

impl Dispose for ChildDisposable {
    fn dispose(&self) {
        self.sequence.save::<Self>();
    }
}

#[derive(Component)]
#[component(dispose)]
pub struct ParentDisposable {
    child: Arc<ChildDisposable>,
    sequence: Arc<DisposableSequence>,
}

impl Dispose for ParentDisposable {
    fn dispose(&self) {
        self.sequence.save::<Self>();
    }
}

#[derive(Component)]
#[component(dispose)]
pub struct GrandParentDisposable {
    parent: Arc<ParentDisposable>,
    sequence: Arc<DisposableSequence>,
}

impl Dispose for GrandParentDisposable {
    fn dispose(&self) {
        self.sequence.save::<Self>();
    }
}
