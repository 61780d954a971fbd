//! Background fetch tasks and their completion events.
//!
//! Each selected source is fetched in its own task. Tasks report back through
//! the `AppEvent` channel; a shared semaphore bounds how many run at once.

use crate::app::{App, AppEvent, FetchTicket};
use crate::feed::fetch_source;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Spawn one background fetch per ticket.
pub(super) fn spawn_fetches(
    app: &App,
    tickets: Vec<FetchTicket>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    for ticket in tickets {
        let client = app.http_client.clone();
        let settings = Arc::clone(&app.settings);
        let permits = Arc::clone(&app.fetch_permits);
        let tx = event_tx.clone();

        tracing::debug!(
            source = %ticket.source.label,
            generation = ticket.generation,
            "Spawning fetch task"
        );

        tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only fails on shutdown
            let _permit = permits.acquire_owned().await.ok();
            let report = fetch_source(&client, &ticket.source, &settings).await;
            let event = AppEvent::SourceFetched {
                index: ticket.index,
                generation: ticket.generation,
                outcome: report.outcome,
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
            }
        });
    }
}

/// Apply a background task's result to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::SourceFetched {
            index,
            generation,
            outcome,
        } => {
            let failed = outcome.is_failed();
            if app.apply_fetch(index, generation, outcome) && failed {
                if let Some(slot) = app.slots.get(index) {
                    app.set_status(format!("Could not load {}", slot.source.label));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FetchOutcome, FetchSettings, Source, SourceRegistry};
    use crate::theme::ThemeVariant;

    fn app() -> App {
        let registry = SourceRegistry::from_entries(vec![
            Source::new("A", "https://a.example.com/rss"),
            Source::new("B", "https://b.example.com/rss"),
        ]);
        App::new(
            &registry,
            FetchSettings::default(),
            reqwest::Client::new(),
            ThemeVariant::Dark,
        )
    }

    #[test]
    fn test_failed_fetch_sets_status() {
        let mut app = app();
        let tickets = app.begin_fetch_all();
        handle_app_event(
            &mut app,
            AppEvent::SourceFetched {
                index: 1,
                generation: tickets[1].generation,
                outcome: FetchOutcome::Failed("HTTP error: status 500".into()),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Could not load B");
    }

    #[test]
    fn test_stale_failure_is_silent() {
        let mut app = app();
        handle_app_event(
            &mut app,
            AppEvent::SourceFetched {
                index: 0,
                generation: 99,
                outcome: FetchOutcome::Failed("down".into()),
            },
        );
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_spawned_fetch_reports_back() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<?xml version="1.0"?><rss version="2.0"><channel><title>T</title>
                <item><title>One</title><link>https://example.com/1</link></item>
                </channel></rss>"#,
            ))
            .mount(&mock_server)
            .await;

        let registry =
            SourceRegistry::from_entries(vec![Source::new("Mock", format!("{}/rss", mock_server.uri()))]);
        let mut app = App::new(
            &registry,
            FetchSettings::default(),
            reqwest::Client::new(),
            ThemeVariant::Dark,
        );
        let (tx, mut rx) = mpsc::channel(4);

        let tickets = app.begin_fetch_all();
        spawn_fetches(&app, tickets, &tx);

        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event);
        assert_eq!(app.active_items().len(), 1);
        assert_eq!(app.active_items()[0].title, "One");
    }
}
