use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sandiq::prelude::*;
use sandiq::{RegistrationFailure, SandiqError};

mod scanned {
    use std::sync::Arc;

    use sandiq::prelude::*;

    pub trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
    }

    #[derive(Component)]
    #[component(register(lifetime = "singleton", contract = "dyn Notifier"))]
    pub struct EmailNotifier;

    impl Notifier for EmailNotifier {
        fn channel(&self) -> &'static str {
            "email"
        }
    }

    #[derive(Component)]
    #[component(register(lifetime = "transient", contract = "dyn Notifier"))]
    pub struct SmsNotifier;

    impl Notifier for SmsNotifier {
        fn channel(&self) -> &'static str {
            "sms"
        }
    }

    pub mod inbox {
        use super::*;

        #[derive(Component)]
        #[component(register(lifetime = "transient"))]
        pub struct Inbox {
            pub notifiers: Vec<Arc<dyn Notifier>>,
        }
    }
}

mod broken {
    use sandiq::prelude::*;

    #[derive(Component)]
    #[component(register(lifetime = "singleton"))]
    pub struct Complete;

    #[derive(Component)]
    #[component(no_constructor, register())]
    pub struct Abstract;
}

use scanned::inbox::Inbox;
use scanned::{EmailNotifier, Notifier, SmsNotifier};

// ── Scanning ──

#[test]
fn scan_entries_are_ordered() {
    let entries = sandiq::scan::scanned(concat!(module_path!(), "::scanned"));
    let implementations: Vec<&str> = entries
        .iter()
        .map(|entry| entry.implementation().rsplit("::").next().unwrap_or_default())
        .collect();
    assert_eq!(implementations, ["EmailNotifier", "SmsNotifier", "Inbox"]);

    assert_eq!(entries[0].contract(), Some("dyn Notifier"));
    assert_eq!(entries[1].lifetime(), Lifetime::Transient);
    assert_eq!(entries[2].contract(), None);
}

#[test]
fn empty_module_scans_everything() {
    let everything = sandiq::scan::scanned("");
    let this_crate = sandiq::scan::scanned(module_path!());
    assert_eq!(this_crate.len(), 5);
    assert!(
        this_crate
            .iter()
            .all(|entry| everything.iter().any(|e| std::ptr::eq(*e, *entry)))
    );
}

#[test]
fn register_by_scan() {
    let mut builder = Container::builder();
    builder
        .register_by_scan(concat!(module_path!(), "::scanned"))
        .unwrap();
    assert_eq!(builder.len(), 3);
    let container = builder.build().unwrap();

    let email_a = container.resolve_many::<dyn Notifier>(ResolveStrategy::Any).unwrap();
    let email_b = container.resolve_many::<dyn Notifier>(ResolveStrategy::Any).unwrap();
    assert_eq!(email_a[0].channel(), "email");
    assert!(Arc::ptr_eq(&email_a[0], &email_b[0]));
    assert!(!Arc::ptr_eq(&email_a[1], &email_b[1]));

    let inbox: Arc<Inbox> = container.resolve_one(ResolveStrategy::Any).unwrap();
    let channels: Vec<_> = inbox.notifiers.iter().map(|n| n.channel()).collect();
    assert_eq!(channels, ["email", "sms"]);
}

#[test]
fn scan_of_nested_module_only() {
    let mut builder = Container::builder();
    builder
        .register_by_scan(concat!(module_path!(), "::scanned::inbox"))
        .unwrap();
    let container = builder.build().unwrap();
    assert_eq!(container.len(), 1);

    let inbox: Arc<Inbox> = container.resolve_one(ResolveStrategy::Any).unwrap();
    assert!(inbox.notifiers.is_empty());
}

#[test]
fn failed_scan_rolls_back() {
    let mut builder = Container::builder();
    builder.register::<dyn Notifier, EmailNotifier>(Lifetime::Singleton).unwrap();

    let err = builder
        .register_by_scan(concat!(module_path!(), "::broken"))
        .unwrap_err();
    match err {
        SandiqError::Registration(rejected) => {
            assert_eq!(rejected.reason, RegistrationFailure::NoConstructor);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(builder.len(), 1);
}

// ── Generated impls ──

#[derive(Component)]
struct Relay(Arc<dyn Notifier>);

#[derive(Component)]
struct MaybeNotify {
    notifier: Option<Arc<dyn Notifier>>,
}

#[derive(Component)]
#[component(implements = "dyn Notifier", implements = "dyn Channel")]
struct Pager;

trait Channel: Send + Sync {}
impl Channel for Pager {}
impl Notifier for Pager {
    fn channel(&self) -> &'static str {
        "pager"
    }
}

#[derive(Component)]
#[component(dispose, no_constructor)]
struct Connection {
    closed: AtomicBool,
}

impl Dispose for Connection {
    fn dispose(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[test]
fn tuple_struct_fields_are_injected() {
    let mut builder = Container::builder();
    builder
        .register::<dyn Notifier, SmsNotifier>(Lifetime::Transient)
        .unwrap()
        .register_self::<Relay>(Lifetime::Transient)
        .unwrap();
    let container = builder.build().unwrap();

    let relay: Arc<Relay> = container.resolve_one(ResolveStrategy::Any).unwrap();
    assert_eq!(relay.0.channel(), "sms");
}

#[test]
fn optional_field() {
    let mut builder = Container::builder();
    builder.register_self::<MaybeNotify>(Lifetime::Transient).unwrap();
    let container = builder.build().unwrap();

    let maybe: Arc<MaybeNotify> = container.resolve_one(ResolveStrategy::Any).unwrap();
    assert!(maybe.notifier.is_none());
}

#[test]
fn several_contracts() {
    let mut builder = Container::builder();
    builder.register::<dyn Notifier, Pager>(Lifetime::Singleton).unwrap();
    let container = builder.build().unwrap();
    let pager: Arc<dyn Notifier> = container.resolve_one(ResolveStrategy::Any).unwrap();
    assert_eq!(pager.channel(), "pager");

    let mut builder = Container::builder();
    builder.register::<dyn Channel, Pager>(Lifetime::Singleton).unwrap();
    let container = builder.build().unwrap();
    assert!(container.resolve_one::<dyn Channel>(ResolveStrategy::Any).is_ok());
}

#[test]
fn derived_dispose() {
    assert!(Connection::DISPOSABLE);
    assert!(!Pager::DISPOSABLE);
    assert!(Connection::constructors().is_empty());

    let mut builder = Container::builder();
    builder
        .register_self_factory::<Connection>(Lifetime::Singleton, |_| {
            Ok(Connection { closed: AtomicBool::new(false) })
        })
        .unwrap();
    let container = builder.build().unwrap();

    let connection: Arc<Connection> = container.resolve_one(ResolveStrategy::Any).unwrap();
    container.dispose().unwrap();
    assert!(connection.closed.load(Ordering::SeqCst));
}

#[test]
fn no_constructor_is_abstract() {
    assert!(broken::Abstract::constructors().is_empty());
    assert_eq!(broken::Complete::constructors()[0].label(), "Complete");
}
