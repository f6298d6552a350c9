//! Tokio runtime and mock server shared across the steps of one scenario.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime handle that can live in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Returns the scenario's runtime and the base URL of its mock server,
/// starting either on first use.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or a slot stays
/// empty after being filled.
pub fn runtime_with_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<(SharedRuntime, String), io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }
    let shared = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime missing after start"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    let uri = server
        .with_ref(MockServer::uri)
        .ok_or_else(|| io::Error::other("mock server missing after start"))?;

    Ok((shared, uri))
}
