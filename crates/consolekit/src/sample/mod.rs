//! Sample service and application showing constructor injection.

mod console;
mod dummy_service;
mod test_client;

pub use dummy_service::{DUMMY_SERVICE, DefaultDummyService, DummyService, register_services};
pub use test_client::TestClient;
