//! Composition root and console start-up.

use crate::application::ConsoleApplication;
use crate::error::HostError;
use crate::logging::create_logger;
use crate::registry::{Capability, ServiceCollection, ServiceResolver};
use consolekit_config::{AppSettings, ConfigLoadOptions, ResolvedConfiguration};
use log::{debug, error, info};
use std::sync::Arc;

/// The resolved configuration, registered by the host.
pub const CONFIGURATION: Capability<ResolvedConfiguration> = Capability::new("configuration");
/// Settings facade over [`CONFIGURATION`], registered by the host.
pub const SETTINGS: Capability<AppSettings> = Capability::new("settings");
/// The application the host runs. Only the host registers it.
pub const APPLICATION: Capability<dyn ConsoleApplication> = Capability::new("application");

/// Load configuration and install the application logger.
///
/// Nothing is logged and no logger is created when loading fails.
pub fn init_console(
    app_name: &str,
    options: ConfigLoadOptions,
) -> Result<Arc<ResolvedConfiguration>, HostError> {
    let config = Arc::new(ResolvedConfiguration::load(options)?);
    create_logger(&config, app_name)?.install()?;

    for layer in config.layers() {
        match &layer.path {
            Some(path) => debug!(
                "using config layer (source={}, path={})",
                layer.source.label(),
                path.display()
            ),
            None => debug!("using config layer (source={})", layer.source.label()),
        }
    }
    info!("Starting {app_name} application");
    Ok(config)
}

/// Compose the service graph and run the application.
///
/// Registers the configuration and settings, lets `register` add the
/// application specific services, registers `application` as the single
/// application, builds every singleton and runs it. The application's exit
/// code is returned unchanged.
pub async fn run_console<A, R, F>(
    configuration: Arc<ResolvedConfiguration>,
    register: R,
    application: F,
) -> Result<i32, HostError>
where
    A: ConsoleApplication + 'static,
    R: FnOnce(&mut ServiceCollection),
    F: Fn(&mut ServiceResolver) -> Result<A, HostError> + 'static,
{
    let mut services = ServiceCollection::new();
    services.add_instance(CONFIGURATION, configuration);
    services.add_singleton(SETTINGS, |resolver| {
        Ok(Arc::new(AppSettings::new(resolver.get(CONFIGURATION)?)))
    });

    register(&mut services);

    if services.contains(APPLICATION) {
        return Err(HostError::DuplicateApplication);
    }
    services.add_singleton(APPLICATION, move |resolver| {
        let app: Arc<dyn ConsoleApplication> = Arc::new(application(resolver)?);
        debug!("console application created");
        Ok(app)
    });

    let provider = services.build()?;
    let app = provider.get(APPLICATION)?;
    match app.run().await {
        Ok(code) => {
            info!("application finished (exit_code={})", code);
            Ok(code)
        }
        Err(err) => {
            error!("application failed: {err:#}");
            Err(HostError::Application(err))
        }
    }
}
