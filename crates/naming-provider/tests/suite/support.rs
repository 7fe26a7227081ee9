use naming_core::{Context, NamingError, NamingObjectProxy, Object, RemoteStub, Result, Value};
use naming_provider::Orb;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// ORB whose objects are stubs echoing the url they were resolved from.
pub struct EchoOrb;

impl Orb for EchoOrb {
    fn string_to_object(&self, url: &str) -> Result<Object> {
        Ok(Object::Stub(RemoteStub {
            type_id: "IDL:Echo:1.0".to_owned(),
            ior: url.to_owned(),
        }))
    }

    fn naming_context(&self) -> Result<Arc<dyn Context>> {
        Err(NamingError::other("EchoOrb has no naming service"))
    }
}

/// Produces a fixed value and counts how often it ran.
pub struct CountingProxy {
    pub value: Value,
    pub calls: Arc<AtomicUsize>,
}

impl CountingProxy {
    pub fn new(value: impl Into<Value>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                value: value.into(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl NamingObjectProxy for CountingProxy {
    fn create(&self, _ctx: &dyn Context) -> Result<Object> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Object::Value(self.value.clone()))
    }
}

/// Initializes by rebinding the real value under its own name.
pub struct InitializingProxy {
    pub name: String,
    pub value: Value,
}

impl NamingObjectProxy for InitializingProxy {
    fn create(&self, ctx: &dyn Context) -> Result<Object> {
        ctx.rebind(&self.name, self.value.clone().into())?;
        Ok(Object::Value(Value::from("transient")))
    }

    fn relookup_after_create(&self) -> bool {
        true
    }
}

/// Asks for a second lookup but never replaces its own binding.
pub struct StubbornProxy;

impl NamingObjectProxy for StubbornProxy {
    fn create(&self, _ctx: &dyn Context) -> Result<Object> {
        Ok(Object::Value(Value::from("transient")))
    }

    fn relookup_after_create(&self) -> bool {
        true
    }
}

pub struct FailingProxy;

impl NamingObjectProxy for FailingProxy {
    fn create(&self, _ctx: &dyn Context) -> Result<Object> {
        Err(NamingError::other("backend unavailable"))
    }
}
