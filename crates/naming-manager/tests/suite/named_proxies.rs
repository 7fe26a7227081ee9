use super::support::{identity, manager, value_of, PrefixProxy, APP, MODULE};
use naming_core::{BoundValue, Context, Value};
use naming_manager::{JndiBinding, ProxyRegistry};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn platform_objects_come_from_named_proxies() {
    let m = manager();
    let (orb, calls) = PrefixProxy::shared("java:comp/ORB", "orb-handle");
    m.install_proxy_registry(Arc::new(ProxyRegistry::new(vec![orb])));

    let ctx = m.java_url_context(identity("c1")).unwrap();
    assert_eq!(value_of(ctx.lookup("java:comp/ORB").unwrap()), Value::from("orb-handle"));
    assert_eq!(value_of(ctx.lookup("java:comp/ORB").unwrap()), Value::from("orb-handle"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn environment_entries_are_never_shadowed_by_proxies() {
    let m = manager();
    let (greedy, calls) = PrefixProxy::shared("java:comp/env", "from proxy");
    m.install_proxy_registry(Arc::new(ProxyRegistry::new(vec![greedy])));
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [JndiBinding::new("java:comp/env/queue", BoundValue::value("from registry"))],
    )
    .unwrap();

    let ctx = m.java_url_context(identity("c1")).unwrap();
    assert_eq!(
        value_of(ctx.lookup("java:comp/env/queue").unwrap()),
        Value::from("from registry")
    );
    assert!(ctx.lookup("java:comp/env/absent").is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn proxies_win_over_namespace_bindings_outside_env() {
    let m = manager();
    let (tx, _) = PrefixProxy::shared("java:comp/TransactionSynchronizationRegistry", "tsr");
    m.install_proxy_registry(Arc::new(ProxyRegistry::new(vec![tx])));
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [JndiBinding::new(
            "java:comp/TransactionSynchronizationRegistry",
            BoundValue::value("shadowed"),
        )],
    )
    .unwrap();

    let ctx = m.java_url_context(identity("c1")).unwrap();
    assert_eq!(
        value_of(ctx.lookup("java:comp/TransactionSynchronizationRegistry").unwrap()),
        Value::from("tsr")
    );
}

#[test]
fn replacing_the_registry_drops_cached_providers() {
    let m = manager();
    let (first, first_calls) = PrefixProxy::shared("java:comp/ORB", "first");
    m.install_proxy_registry(Arc::new(ProxyRegistry::new(vec![first])));

    let ctx = m.java_url_context(identity("c1")).unwrap();
    assert_eq!(value_of(ctx.lookup("java:comp/ORB").unwrap()), Value::from("first"));

    let (second, second_calls) = PrefixProxy::shared("java:comp/ORB", "second");
    m.install_proxy_registry(Arc::new(ProxyRegistry::new(vec![second])));
    assert_eq!(value_of(ctx.lookup("java:comp/ORB").unwrap()), Value::from("second"));

    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}
