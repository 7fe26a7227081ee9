use super::support::{identity, manager, value_of, APP, MODULE};
use naming_core::{BoundValue, Context, JndiName, NamingError, Value};
use naming_manager::{JavaUrlContext, JndiBinding, NamingManager};
use std::sync::Arc;

fn deployed() -> Arc<NamingManager> {
    let m = manager();
    m.bind_to_component_namespace(
        Some(APP),
        Some(MODULE),
        "c1",
        false,
        [
            JndiBinding::new("java:comp/env/jdbc/orders", BoundValue::value("ds")),
            JndiBinding::new("java:comp/env/greeting", BoundValue::value("hi")),
        ],
    )
    .unwrap();
    m
}

fn root(m: &NamingManager) -> JavaUrlContext {
    m.java_url_context(identity("c1")).unwrap()
}

#[test]
fn absolute_and_relative_lookups_agree() {
    let m = deployed();
    let ctx = root(&m);
    assert_eq!(value_of(ctx.lookup("java:comp/env/greeting").unwrap()), Value::from("hi"));

    let env = ctx.lookup("java:comp/env").unwrap().into_context().unwrap();
    assert_eq!(value_of(env.lookup("greeting").unwrap()), Value::from("hi"));

    let jdbc = env.lookup("jdbc").unwrap().into_context().unwrap();
    assert_eq!(jdbc.name_in_namespace(), "java:comp/env/jdbc");
    assert_eq!(value_of(jdbc.lookup("orders").unwrap()), Value::from("ds"));
}

#[test]
fn the_java_root_resolves_scoped_names() {
    let m = deployed();
    let java = root(&m).lookup("java:").unwrap().into_context().unwrap();
    assert_eq!(java.name_in_namespace(), "java:");
    assert_eq!(value_of(java.lookup("comp/env/greeting").unwrap()), Value::from("hi"));
}

#[test]
fn empty_name_returns_a_copy_of_the_context() {
    let m = deployed();
    let env = m
        .restore_java_comp_env_context(&JndiName::new("java:comp/env"), identity("c1"))
        .unwrap();
    let copy = env.lookup("").unwrap().into_context().unwrap();
    assert_eq!(copy.name_in_namespace(), "java:comp/env");
    assert_eq!(value_of(copy.lookup("greeting").unwrap()), Value::from("hi"));
}

#[test]
fn restoring_requires_a_java_name() {
    let m = deployed();
    let err = m
        .restore_java_comp_env_context(&JndiName::new("comp/env"), identity("c1"))
        .unwrap_err();
    assert!(matches!(err, NamingError::InvalidName { .. }), "{err:?}");
}

#[test]
fn restored_contexts_resolve_and_list_for_their_component() {
    let m = deployed();
    let env = m
        .restore_java_comp_env_context(&JndiName::new("java:comp/env"), identity("c1"))
        .unwrap();
    assert_eq!(env.identity(), Some(&identity("c1")));
    assert_eq!(value_of(env.lookup("greeting").unwrap()), Value::from("hi"));
    assert_eq!(value_of(env.lookup("jdbc/orders").unwrap()), Value::from("ds"));

    let names: Vec<_> = env.list("").unwrap().into_iter().map(|pair| pair.name).collect();
    assert_eq!(names, ["greeting", "jdbc"]);
}

#[test]
fn contexts_from_direct_namespace_lookups_act_for_the_given_identity() {
    let m = deployed();
    m.bind_to_app_namespace(
        APP,
        [JndiBinding::new("java:app/env/mail/host", BoundValue::value("smtp.local"))],
    )
    .unwrap();

    let mail = m
        .lookup_from_app_namespace(
            APP,
            &JndiName::new("java:app/env/mail"),
            None,
            Some(&identity("c1")),
        )
        .unwrap()
        .into_context()
        .unwrap();
    assert_eq!(mail.name_in_namespace(), "java:app/env/mail");
    assert_eq!(value_of(mail.lookup("host").unwrap()), Value::from("smtp.local"));
}

#[test]
fn every_mutation_is_rejected() {
    let m = deployed();
    let env = root(&m).lookup("java:comp/env").unwrap().into_context().unwrap();

    let read_only = |result: naming_core::Result<()>| match result.unwrap_err() {
        NamingError::ReadOnly { namespace, name } => (namespace, name),
        other => panic!("expected a read-only error, got {other:?}"),
    };
    assert_eq!(
        read_only(env.bind("x", BoundValue::value(1))),
        ("java:comp/env".to_owned(), "x".to_owned())
    );
    assert_eq!(read_only(env.rebind("x", BoundValue::value(1))).1, "x");
    assert_eq!(read_only(env.unbind("greeting")).1, "greeting");
    assert_eq!(read_only(env.rename("a", "b")).1, "a and b");
    assert_eq!(read_only(env.destroy_subcontext("jdbc")).1, "jdbc");
    assert!(matches!(
        env.create_subcontext("new").unwrap_err(),
        NamingError::ReadOnly { .. }
    ));

    // Nothing changed.
    assert_eq!(value_of(env.lookup("greeting").unwrap()), Value::from("hi"));
}

#[test]
fn names_of_other_schemes_are_not_found() {
    let m = deployed();
    let err = root(&m).lookup("jdbc:derby:memory:db").unwrap_err();
    assert!(matches!(err, NamingError::NameNotFound { .. }), "{err:?}");
}

#[test]
fn unresolved_names_report_every_attempt() {
    let m = deployed();
    let err = root(&m).lookup("java:comp/env/missing").unwrap_err();
    assert!(err.is_name_not_found());
    match err {
        NamingError::Unresolved { name, attempts } => {
            assert_eq!(name, "java:comp/env/missing");
            assert_eq!(attempts.len(), 1);
            assert!(attempts[0].is_name_not_found());
        }
        other => panic!("expected an unresolved error, got {other:?}"),
    }
}

#[test]
fn contexts_without_an_invocation_cannot_resolve_scoped_names() {
    let m = deployed();
    let ctx = JavaUrlContext::new(Arc::clone(&m), "java:comp/env");
    match ctx.lookup("greeting").unwrap_err() {
        NamingError::Unresolved { attempts, .. } => {
            assert!(
                attempts
                    .iter()
                    .any(|attempt| matches!(attempt, NamingError::Invocation { .. })),
                "{attempts:?}"
            );
        }
        other => panic!("expected an unresolved error, got {other:?}"),
    }
    assert!(matches!(
        ctx.list("").unwrap_err(),
        NamingError::Invocation { .. }
    ));
}

#[test]
fn listing_goes_through_the_registry() {
    let m = deployed();
    let ctx = root(&m);

    let env: Vec<_> = ctx
        .list("java:comp/env")
        .unwrap()
        .into_iter()
        .map(|pair| pair.name)
        .collect();
    assert_eq!(env, ["greeting", "jdbc"]);

    let env_ctx = ctx.lookup("java:comp/env").unwrap().into_context().unwrap();
    let bindings = env_ctx.list_bindings("jdbc").unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].full_name, "java:comp/env/jdbc/orders");
    assert_eq!(bindings[0].value.as_value(), Some(&Value::from("ds")));

    let err = env_ctx.list("greeting").unwrap_err();
    assert!(matches!(err, NamingError::NotContext { .. }), "{err:?}");
}

#[test]
fn environment_is_carried_by_the_context() {
    let m = deployed();
    let mut env = naming_core::Environment::new();
    env.insert("naming.factory".to_owned(), "test".to_owned());
    let ctx = root(&m).with_environment(env.clone());
    assert_eq!(ctx.environment(), env);
    assert_eq!(ctx.lookup("").unwrap().into_context().unwrap().environment(), env);
}
