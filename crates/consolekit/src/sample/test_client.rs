use super::console::wait_for_keypress;
use super::dummy_service::{DUMMY_SERVICE, DummyService};
use async_trait::async_trait;
use consolekit_host::{ConsoleApplication, HostError, SETTINGS, ServiceResolver};
use log::info;
use std::sync::Arc;

/// Setting that controls the final keypress prompt.
const WAIT_FOR_KEYPRESS_KEY: &str = "WaitForKeypress";

/// Sample application consuming an injected `DummyService`.
pub struct TestClient {
    dummy_service: Arc<dyn DummyService>,
    wait_for_keypress: bool,
}

impl TestClient {
    pub fn new(dummy_service: Arc<dyn DummyService>, wait_for_keypress: bool) -> Self {
        Self {
            dummy_service,
            wait_for_keypress,
        }
    }

    /// Build from the service graph. `allow_wait` is the command-line switch;
    /// the `WaitForKeypress` setting can only turn waiting off.
    pub fn from_resolver(
        resolver: &mut ServiceResolver,
        allow_wait: bool,
    ) -> Result<Self, HostError> {
        let settings = resolver.get(SETTINGS)?;
        let wait_for_keypress = allow_wait && settings.get_value_as(WAIT_FOR_KEYPRESS_KEY, true)?;
        Ok(Self::new(resolver.get(DUMMY_SERVICE)?, wait_for_keypress))
    }

    pub fn waits_for_keypress(&self) -> bool {
        self.wait_for_keypress
    }
}

#[async_trait]
impl ConsoleApplication for TestClient {
    async fn run(&self) -> anyhow::Result<i32> {
        self.dummy_service.am_a_dummy();
        self.dummy_service.not_a_dummy().await?;

        if self.wait_for_keypress {
            info!("All done! Press any key to exit");
            tokio::task::spawn_blocking(wait_for_keypress).await??;
        } else {
            info!("All done!");
        }
        Ok(0)
    }
}
