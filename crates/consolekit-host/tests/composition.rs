//! Composition root tests: registration, graph build and dispatch.

use async_trait::async_trait;
use consolekit_config::{AppSettings, ConfigLoadOptions, HostEnvironment, ResolvedConfiguration};
use consolekit_host::{
    APPLICATION, Capability, ConsoleApplication, HostError, SETTINGS, ServiceCollection,
    run_console,
};
use consolekit_test_utils::{
    ConstructionLog, FailingApplication, RecordingApplication, resolved_config, settings_dir,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;

trait MessageSource: Send + Sync {
    fn message(&self) -> String;
}

struct SettingsMessage {
    settings: Arc<AppSettings>,
}

impl MessageSource for SettingsMessage {
    fn message(&self) -> String {
        self.settings.get_value("DummyMessage", "defaultValue")
    }
}

const MESSAGE_SOURCE: Capability<dyn MessageSource> = Capability::new("message-source");

struct EchoApp {
    source: Arc<dyn MessageSource>,
    seen: ConstructionLog,
}

#[async_trait]
impl ConsoleApplication for EchoApp {
    async fn run(&self) -> anyhow::Result<i32> {
        self.seen.record(self.source.message());
        Ok(0)
    }
}

fn register_message_source(log: ConstructionLog) -> impl FnOnce(&mut ServiceCollection) {
    move |services: &mut ServiceCollection| {
        services.add_singleton(MESSAGE_SOURCE, move |resolver| {
            log.record("message-source");
            let source: Arc<dyn MessageSource> = Arc::new(SettingsMessage {
                settings: resolver.get(SETTINGS)?,
            });
            Ok(source)
        });
    }
}

/// A zero exit code from the application is returned unchanged.
#[tokio::test]
async fn returns_application_exit_code() {
    let app = RecordingApplication::new(0);
    let runs = app.runs();
    let code = run_console(resolved_config(json!({})), |_| {}, move |_| Ok(app.clone()))
        .await
        .expect("run");
    assert_eq!(code, 0);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// Non-zero codes pass through as well.
#[tokio::test]
async fn returns_non_zero_exit_code() {
    let code = run_console(
        resolved_config(json!({})),
        |_| {},
        |_| Ok(RecordingApplication::new(3)),
    )
    .await
    .expect("run");
    assert_eq!(code, 3);
}

/// Extra registrations are constructed once and injected into the application.
#[tokio::test]
async fn injects_registered_capability_once() {
    let constructed = ConstructionLog::new();
    let seen = ConstructionLog::new();
    let app_log = constructed.clone();
    let app_seen = seen.clone();

    let code = run_console(
        resolved_config(json!({ "DummyMessage": "hello" })),
        register_message_source(constructed.clone()),
        move |resolver| {
            let source = resolver.get(MESSAGE_SOURCE)?;
            app_log.record("application");
            Ok(EchoApp {
                source,
                seen: app_seen.clone(),
            })
        },
    )
    .await
    .expect("run");

    assert_eq!(code, 0);
    assert_eq!(constructed.entries(), vec!["message-source", "application"]);
    assert_eq!(constructed.count("message-source"), 1);
    assert_eq!(seen.entries(), vec!["hello"]);
}

/// A dependency nobody registered stops start-up before the application runs.
#[tokio::test]
async fn missing_dependency_is_fatal_before_run() {
    let seen = ConstructionLog::new();
    let app_seen = seen.clone();
    let err = run_console(resolved_config(json!({})), |_| {}, move |resolver| {
        Ok(EchoApp {
            source: resolver.get(MESSAGE_SOURCE)?,
            seen: app_seen.clone(),
        })
    })
    .await
    .unwrap_err();

    match err {
        HostError::MissingService { name, required_by } => {
            assert_eq!(name, "message-source");
            assert_eq!(required_by.as_deref(), Some("application"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(seen.entries().is_empty());
}

/// The registration callback may not supply its own application.
#[tokio::test]
async fn rejects_application_registered_by_callback() {
    let err = run_console(
        resolved_config(json!({})),
        |services| {
            let app: Arc<dyn ConsoleApplication> = Arc::new(RecordingApplication::new(0));
            services.add_instance(APPLICATION, app);
        },
        |_| Ok(RecordingApplication::new(0)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HostError::DuplicateApplication));
}

/// Failures inside the entry method surface to the caller.
#[tokio::test]
async fn application_failure_propagates() {
    let err = run_console(
        resolved_config(json!({})),
        |_| {},
        |_| Ok(FailingApplication::new("boom")),
    )
    .await
    .unwrap_err();
    match err {
        HostError::Application(source) => assert_eq!(source.to_string(), "boom"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// File value overridden by an environment variable reaches the application.
#[tokio::test]
async fn environment_override_reaches_injected_service() {
    let root = settings_dir(&[("appsettings.json", r#"{ "DummyMessage": "hello" }"#)]);
    let config = ResolvedConfiguration::load(
        ConfigLoadOptions::new(root.path())
            .with_environment(HostEnvironment::Production)
            .with_env_vars([("DummyMessage", "world")]),
    )
    .expect("load");
    let seen = ConstructionLog::new();
    let app_seen = seen.clone();

    let code = run_console(
        Arc::new(config),
        register_message_source(ConstructionLog::new()),
        move |resolver| {
            Ok(EchoApp {
                source: resolver.get(MESSAGE_SOURCE)?,
                seen: app_seen.clone(),
            })
        },
    )
    .await
    .expect("run");

    assert_eq!(code, 0);
    assert_eq!(seen.entries(), vec!["world"]);
}
