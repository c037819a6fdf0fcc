use async_trait::async_trait;
use consolekit_config::AppSettings;
use consolekit_host::{Capability, SETTINGS, ServiceCollection, push_property};
use log::{debug, info, warn};
use std::sync::Arc;

/// Setting read by the sample service.
const DUMMY_MESSAGE_KEY: &str = "DummyMessage";
const DUMMY_MESSAGE_DEFAULT: &str = "defaultValue";

/// Example business service; replace with your own.
#[async_trait]
pub trait DummyService: Send + Sync {
    fn am_a_dummy(&self);
    async fn not_a_dummy(&self) -> anyhow::Result<()>;
}

pub const DUMMY_SERVICE: Capability<dyn DummyService> = Capability::new("dummy-service");

/// `DummyService` backed by the injected settings.
pub struct DefaultDummyService {
    settings: Arc<AppSettings>,
}

impl DefaultDummyService {
    pub fn new(settings: Arc<AppSettings>) -> Self {
        debug!("dummy service created");
        Self { settings }
    }

    /// The configured `DummyMessage`.
    pub fn message(&self) -> String {
        self.settings.get_value(DUMMY_MESSAGE_KEY, DUMMY_MESSAGE_DEFAULT)
    }
}

#[async_trait]
impl DummyService for DefaultDummyService {
    fn am_a_dummy(&self) {
        let _operation = push_property("Operation", "am_a_dummy");
        info!("Your Message: '{}'", self.message());
        warn!("My mistake, I am a dummy");
    }

    async fn not_a_dummy(&self) -> anyhow::Result<()> {
        tokio::task::spawn_blocking(|| info!("Execute some async operation...")).await?;
        info!("I am not a dummy");
        Ok(())
    }
}

/// Registration callback for the services the sample application needs.
pub fn register_services(services: &mut ServiceCollection) {
    services.add_singleton(DUMMY_SERVICE, |resolver| {
        let service: Arc<dyn DummyService> =
            Arc::new(DefaultDummyService::new(resolver.get(SETTINGS)?));
        Ok(service)
    });
}
