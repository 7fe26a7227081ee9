use super::support::{CountingProxy, EchoOrb, InitializingProxy, StubbornProxy};
use naming_core::{BoundValue, Context, NamingError, Value};
use naming_provider::{ProviderManager, SerialContextProvider, Transport};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn initialized_manager() -> ProviderManager {
    let manager = ProviderManager::default();
    manager.init_remote_provider(Arc::new(EchoOrb));
    manager
}

#[test]
fn remote_listing_omits_non_serializable_values() {
    let manager = initialized_manager();
    let local = manager.initial_context();
    local.bind("app/config", BoundValue::value("cfg")).unwrap();
    local.bind("app/pool", BoundValue::local(vec![1u8, 2, 3])).unwrap();
    let (proxy, _) = CountingProxy::new("lazy");
    local.bind("app/lazy", BoundValue::deferred(proxy)).unwrap();

    let local_names: Vec<_> = local.list("app").unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(local_names, ["config", "lazy", "pool"]);

    let remote = manager.remote_initial_context().unwrap();
    let remote_names: Vec<_> = remote.list("app").unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(remote_names, ["config"]);
}

#[test]
fn deferred_proxies_are_materialized_in_the_server() {
    let manager = initialized_manager();
    let (proxy, calls) = CountingProxy::new(Value::Int(7));
    manager
        .local_provider()
        .bind("ejb/Lazy", BoundValue::deferred(proxy))
        .unwrap();

    let remote = manager.remote_initial_context().unwrap();
    assert_eq!(remote.lookup("ejb/Lazy").unwrap().as_value(), Some(&Value::Int(7)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn initializing_proxies_are_looked_up_again() {
    let manager = initialized_manager();
    manager
        .local_provider()
        .bind(
            "ejb/Init",
            BoundValue::deferred(InitializingProxy {
                name: "ejb/Init".to_owned(),
                value: Value::from("real"),
            }),
        )
        .unwrap();

    let remote = manager.remote_provider().unwrap();
    match remote.lookup("ejb/Init").unwrap() {
        BoundValue::Object(object) => assert_eq!(object.as_value(), Some(&Value::from("real"))),
        other => panic!("unexpected binding {other:?}"),
    }
}

#[test]
fn proxies_that_never_rebind_fail_the_second_lookup() {
    let manager = initialized_manager();
    manager
        .local_provider()
        .bind("ejb/Stuck", BoundValue::deferred(StubbornProxy))
        .unwrap();

    let remote = manager.remote_provider().unwrap();
    match remote.lookup("ejb/Stuck") {
        Err(naming_provider::ProviderError::Naming(NamingError::Other { message })) => {
            assert!(message.contains("still a proxy"), "{message}");
        }
        other => panic!("expected a naming failure, got {other:?}"),
    }

    let client = manager.remote_client().unwrap();
    assert!(matches!(
        client.lookup("ejb/Stuck"),
        Err(naming_provider::ProviderError::Naming(NamingError::Other { .. }))
    ));
}

#[test]
fn local_objects_cannot_cross_the_boundary() {
    let manager = initialized_manager();
    manager
        .local_provider()
        .bind("svc/local", BoundValue::local(5u64))
        .unwrap();

    let client = manager.remote_client().unwrap();
    assert!(matches!(
        client.lookup("svc/local"),
        Err(naming_provider::ProviderError::Naming(NamingError::NotSerializable { .. }))
    ));
    assert!(matches!(
        client.bind("svc/other", BoundValue::local(6u64)),
        Err(naming_provider::ProviderError::Naming(NamingError::NotSerializable { .. }))
    ));
}

#[test]
fn remote_mutations_reach_the_shared_store() {
    let manager = initialized_manager();
    let remote = manager.remote_initial_context().unwrap();
    remote.bind("jms/queue", BoundValue::value("orders")).unwrap();
    remote.create_subcontext("jms/topics").unwrap();
    remote.rename("jms/queue", "jms/orders").unwrap();

    let local = manager.initial_context();
    assert_eq!(
        local.lookup("jms/orders").unwrap().as_value(),
        Some(&Value::from("orders"))
    );
    assert!(local.lookup("jms/topics").unwrap().as_context().is_some());
    assert_eq!(
        remote.bind("jms/orders", BoundValue::value("dup")).unwrap_err(),
        NamingError::already_bound("jms/orders")
    );
}

#[test]
fn transport_failures_are_communication_errors() {
    let manager = initialized_manager();
    let client = manager.remote_client().unwrap();
    client.transport().close();
    assert!(client.transport().round_trip(Vec::new()).is_err());

    let err: NamingError = client.lookup("anything").unwrap_err().into();
    assert!(matches!(err, NamingError::Communication { .. }), "{err}");
}
