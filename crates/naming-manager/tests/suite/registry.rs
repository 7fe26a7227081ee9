use super::support::{identity, manager, value_of, CountingProxy, APP, MODULE};
use naming_core::{
    BoundValue, Context, InvocationIdentity, JndiName, NamingError, Object, Reference, Resolved,
    Result, Value,
};
use naming_manager::JndiBinding;
use naming_provider::ObjectFactory;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn name(s: &str) -> JndiName {
    JndiName::new(s)
}

#[test]
fn component_namespaces_are_isolated_and_modules_shared() {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "servlet-a",
        false,
        [
            JndiBinding::new("java:comp/env/greeting", BoundValue::value("hello from a")),
            JndiBinding::new("java:module/env/shared", BoundValue::value("module wide")),
            JndiBinding::new("java:app/env/tier", BoundValue::value("gold")),
        ],
    )
    .unwrap();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "servlet-b",
        false,
        [JndiBinding::new("java:comp/env/greeting", BoundValue::value("hello from b"))],
    )
    .unwrap();

    let a = identity("servlet-a");
    let b = identity("servlet-b");
    let greeting = name("java:comp/env/greeting");
    assert_eq!(value_of(m.lookup(&a, &greeting, None).unwrap()), Value::from("hello from a"));
    assert_eq!(value_of(m.lookup(&b, &greeting, None).unwrap()), Value::from("hello from b"));

    let shared = name("java:module/env/shared");
    assert_eq!(value_of(m.lookup(&b, &shared, None).unwrap()), Value::from("module wide"));
    let tier = name("java:app/env/tier");
    assert_eq!(value_of(m.lookup(&b, &tier, None).unwrap()), Value::from("gold"));

    // Another module of the same app sees the app binding but not the module one.
    let other = InvocationIdentity::new(APP, "ejb-jar", "bean");
    assert_eq!(value_of(m.lookup(&other, &tier, None).unwrap()), Value::from("gold"));
    let err = m.lookup(&other, &shared, None).unwrap_err();
    assert!(err.is_name_not_found(), "{err:?}");
}

#[test]
fn component_binds_keep_the_first_value_while_module_binds_replace() {
    let m = manager();
    let env = name("java:comp/env/limit");
    for limit in [1, 2] {
        m.bind_to_component_namespace(
            Some(APP),
            Some(MODULE),
            "c1",
            false,
            [JndiBinding::new(env.clone(), BoundValue::value(limit))],
        )
        .unwrap();
    }
    assert_eq!(value_of(m.lookup(&identity("c1"), &env, None).unwrap()), Value::Int(1));

    let module_env = name("java:module/env/limit");
    for limit in [1, 2] {
        m.bind_to_module_namespace(
            APP,
            MODULE,
            [JndiBinding::new(module_env.clone(), BoundValue::value(limit))],
        )
        .unwrap();
    }
    assert_eq!(
        value_of(m.lookup(&identity("c1"), &module_env, None).unwrap()),
        Value::Int(2)
    );
}

#[test]
fn scoped_binds_ignore_names_of_other_scopes() {
    let m = manager();
    m.bind_to_app_namespace(
        APP,
        [
            JndiBinding::new("java:app/env/a", BoundValue::value("kept")),
            JndiBinding::new("java:module/env/b", BoundValue::value("dropped")),
        ],
    )
    .unwrap();
    m.bind_to_module_namespace(
        APP,
        MODULE,
        [JndiBinding::new("java:comp/env/c", BoundValue::value("dropped"))],
    )
    .unwrap();

    let id = identity("c1");
    assert!(m.lookup(&id, &name("java:app/env/a"), None).is_ok());
    assert!(m.lookup(&id, &name("java:module/env/b"), None).is_err());
    assert!(m.lookup(&id, &name("java:comp/env/c"), None).is_err());
}

#[test]
fn global_names_are_skipped_without_failing_the_batch() {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [
            JndiBinding::new("java:global/shop/Cart", BoundValue::value("ignored")),
            JndiBinding::new("java:comp/env/after", BoundValue::value("bound")),
        ],
    )
    .unwrap();
    assert_eq!(
        value_of(m.lookup(&identity("c1"), &name("java:comp/env/after"), None).unwrap()),
        Value::from("bound")
    );
}

#[test]
fn module_bindings_require_a_full_scope_key() {
    let m = manager();
    let err = m
        .bind_to_component_namespace(
            Some(APP),
            None,
            "c1",
            false,
            [JndiBinding::new("java:module/env/x", BoundValue::value(1))],
        )
        .unwrap_err();
    assert!(matches!(err, NamingError::InvalidScope { .. }), "{err:?}");
}

#[test]
fn intermediate_contexts_are_listable() {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [
            JndiBinding::new("java:comp/env/jdbc/orders", BoundValue::value("ds1")),
            JndiBinding::new("java:comp/env/jdbc/billing", BoundValue::value("ds2")),
            JndiBinding::new("java:comp/env/mail", BoundValue::value("smtp")),
        ],
    )
    .unwrap();
    let id = identity("c1");

    let env: Vec<_> = m
        .list(&id, &name("java:comp/env"))
        .unwrap()
        .into_iter()
        .map(|pair| pair.full_name)
        .collect();
    assert_eq!(env, ["java:comp/env/jdbc", "java:comp/env/mail"]);

    let jdbc: Vec<_> = m
        .list(&id, &name("java:comp/env/jdbc"))
        .unwrap()
        .into_iter()
        .map(|pair| pair.name)
        .collect();
    assert_eq!(jdbc, ["billing", "orders"]);

    let err = m.list(&id, &name("java:comp/env/mail")).unwrap_err();
    assert!(matches!(err, NamingError::NotContext { .. }), "{err:?}");

    let jdbc_ctx = m
        .lookup(&id, &name("java:comp/env/jdbc"), None)
        .unwrap()
        .into_context()
        .unwrap();
    assert_eq!(jdbc_ctx.name_in_namespace(), "java:comp/env/jdbc");
    assert_eq!(value_of(jdbc_ctx.lookup("orders").unwrap()), Value::from("ds1"));
}

#[test]
fn unpopulated_namespaces_answer_from_the_seeds() {
    let m = manager();
    let id = identity("never-deployed");

    let env = m.lookup(&id, &name("java:comp/env"), None).unwrap();
    assert_eq!(env.into_context().unwrap().name_in_namespace(), "java:comp/env");

    let children: Vec<_> = m
        .list(&id, &name("java:comp"))
        .unwrap()
        .into_iter()
        .map(|pair| pair.full_name)
        .collect();
    assert_eq!(children, ["java:comp/env"]);
    assert!(m.list(&id, &name("java:comp/env")).unwrap().is_empty());
}

#[test]
fn component_as_module_rewrites_and_keeps_the_callers_name() {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "web-component",
        true,
        [JndiBinding::new("java:comp/env/jdbc/ds", BoundValue::value("pool"))],
    )
    .unwrap();

    let web = identity("web-component");
    assert_eq!(
        value_of(m.lookup(&web, &name("java:comp/env/jdbc/ds"), None).unwrap()),
        Value::from("pool")
    );
    // Stored in the module namespace, so every component of the module sees it.
    assert_eq!(
        value_of(
            m.lookup(&identity("servlet"), &name("java:module/env/jdbc/ds"), None)
                .unwrap()
        ),
        Value::from("pool")
    );

    let ctx = m
        .lookup(&web, &name("java:comp/env"), None)
        .unwrap()
        .into_context()
        .unwrap();
    assert_eq!(ctx.name_in_namespace(), "java:comp/env");

    let listed: Vec<_> = m
        .list(&web, &name("java:comp/env"))
        .unwrap()
        .into_iter()
        .map(|pair| pair.full_name)
        .collect();
    assert_eq!(listed, ["java:comp/env/jdbc"]);
}

#[test]
fn deferred_values_are_created_on_every_lookup() {
    let m = manager();
    let (proxy, calls) = CountingProxy::new("fresh");
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [JndiBinding::new("java:comp/env/lazy", BoundValue::deferred(proxy))],
    )
    .unwrap();

    let id = identity("c1");
    for _ in 0..2 {
        assert_eq!(
            value_of(m.lookup(&id, &name("java:comp/env/lazy"), None).unwrap()),
            Value::from("fresh")
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let bindings = m.list_bindings(&id, &name("java:comp/env"), None).unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].full_name, "java:comp/env/lazy");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn lookup_requires_a_component_id() {
    let m = manager();
    let err = m
        .lookup(&InvocationIdentity::default(), &name("java:comp/env"), None)
        .unwrap_err();
    assert!(matches!(err, NamingError::Invocation { .. }), "{err:?}");
}

#[test]
fn undeploy_removes_component_and_app_state() {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [
            JndiBinding::new("java:comp/env/x", BoundValue::value(1)),
            JndiBinding::new("java:module/env/y", BoundValue::value(2)),
            JndiBinding::new("java:app/env/z", BoundValue::value(3)),
        ],
    )
    .unwrap();
    m.bind_to_component_namespace(
        Some("billing"),
        Some(MODULE),
        "other-app-component",
        false,
        [
            JndiBinding::new("java:app/env/z", BoundValue::value(4)),
            JndiBinding::new("java:module/env/y", BoundValue::value(5)),
        ],
    )
    .unwrap();
    let id = identity("c1");

    m.unbind_component_objects("c1");
    assert!(m.lookup(&id, &name("java:comp/env/x"), None).unwrap_err().is_name_not_found());
    assert!(m.lookup(&id, &name("java:module/env/y"), None).is_ok());

    m.unbind_app_objects(APP);
    assert!(m.lookup(&id, &name("java:module/env/y"), None).unwrap_err().is_name_not_found());
    assert!(m.lookup(&id, &name("java:app/env/z"), None).unwrap_err().is_name_not_found());

    let other = InvocationIdentity::new("billing", MODULE, "other-app-component");
    assert_eq!(
        value_of(m.lookup(&other, &name("java:app/env/z"), None).unwrap()),
        Value::Int(4)
    );
    // Same module name, different app: its module namespace is untouched.
    assert_eq!(
        value_of(m.lookup(&other, &name("java:module/env/y"), None).unwrap()),
        Value::Int(5)
    );
    assert_eq!(
        value_of(
            m.lookup_from_module_namespace("billing", MODULE, &name("java:module/env/y"), None, None)
                .unwrap()
        ),
        Value::Int(5)
    );
}

#[test]
fn single_objects_can_be_unbound_from_app_and_module() {
    let m = manager();
    m.bind_to_app_namespace(APP, [JndiBinding::new("java:app/env/a", BoundValue::value(1))])
        .unwrap();
    m.bind_to_module_namespace(
        APP,
        MODULE,
        [JndiBinding::new("java:module/env/b", BoundValue::value(2))],
    )
    .unwrap();

    m.unbind_app_object(APP, &name("java:app/env/a"));
    m.unbind_module_object(APP, MODULE, &name("java:module/env/b"));
    // Unknown apps and modules are ignored.
    m.unbind_app_object("nope", &name("java:app/env/a"));

    let id = identity("c1");
    assert!(m.lookup(&id, &name("java:app/env/a"), None).is_err());
    assert!(m.lookup(&id, &name("java:module/env/b"), None).is_err());
    assert!(m.lookup(&id, &name("java:app/env"), None).is_ok());
}

struct PriceFactory;

impl ObjectFactory for PriceFactory {
    fn get_object_instance(&self, reference: &Reference, _name: &str) -> Result<Option<Object>> {
        match reference.addr("cents") {
            Some(cents) => cents
                .parse::<i64>()
                .map(|cents| Some(Object::Value(Value::Int(cents))))
                .map_err(|err| NamingError::other(err.to_string())),
            None => Ok(None),
        }
    }
}

#[test]
fn direct_namespace_lookups_resolve_references_or_return_them() {
    let m = manager();
    m.providers()
        .factories()
        .register("shop.PriceFactory", Arc::new(PriceFactory));
    m.bind_to_app_namespace(
        APP,
        [
            JndiBinding::new(
                "java:app/env/price",
                Reference::new("Price", Some("shop.PriceFactory".to_owned())).with_addr("cents", "250"),
            ),
            JndiBinding::new(
                "java:app/env/broken",
                Reference::new("Price", Some("shop.PriceFactory".to_owned())).with_addr("cents", "x"),
            ),
        ],
    )
    .unwrap();
    m.bind_to_module_namespace(
        APP,
        MODULE,
        [JndiBinding::new("java:module/env/plain", BoundValue::value("v"))],
    )
    .unwrap();

    let price = m
        .lookup_from_app_namespace(APP, &name("java:app/env/price"), None, None)
        .unwrap();
    assert_eq!(value_of(price), Value::Int(250));

    let broken = m
        .lookup_from_app_namespace(APP, &name("java:app/env/broken"), None, None)
        .unwrap();
    assert!(matches!(broken, Resolved::Reference(_)), "{broken:?}");

    let plain = m
        .lookup_from_module_namespace(APP, MODULE, &name("java:module/env/plain"), None, None)
        .unwrap();
    assert_eq!(value_of(plain), Value::from("v"));

    let err = m
        .lookup_from_app_namespace("other", &name("java:app/env/price"), None, None)
        .unwrap_err();
    assert!(err.is_name_not_found());
}
