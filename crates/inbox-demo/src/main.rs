//! Sample run of the JSON-document inbox.
//!
//! Stores an author with embedded contact details and two inbox events in a
//! single envelope table, then reads them back through the typed queries.

use chrono::Duration;
use futures::TryStreamExt;
use inbox_core::clock::{Clock, SystemClock};
use inbox_payloads::application::command_handlers::handle_insert;
use inbox_payloads::application::query_handlers::{find_by_natural_key, list_all};
use inbox_payloads::domain::author::{Address, Author, ContactDetails};
use inbox_payloads::InboxError;
use inbox_payloads::domain::entry::{EventAInbox, EventBInbox, InboxEntry};
use inbox_payloads::domain::events::{EventA, EventB};
use inbox_store::pg_envelope_store::PgEnvelopeStore;
use inbox_store::schema;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod config;
mod error;

use config::DemoConfig;
use error::DemoError;

/// Logs the author read back after insertion.
///
/// Several authors with the same name are tolerated, since earlier runs may
/// have left one behind. Any other failure is returned unchanged.
fn report_author_lookup(
    lookup: Result<InboxEntry<Author>, InboxError>,
) -> Result<(), InboxError> {
    match lookup {
        Ok(found) => {
            tracing::info!(id = %found.id, author = ?found.payload, "author loaded");
            Ok(())
        }
        Err(InboxError::MultipleMatches { count, .. }) => {
            tracing::warn!(count, "author lookup was not unique");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = DemoConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await?;

    // Forward-only: existing envelopes survive every run.
    schema::run_migrations(&pool).await?;
    tracing::info!("migrations applied");

    let store = PgEnvelopeStore::new(pool, tracing::info_span!("inbox", table = "envelopes"));
    let clock = SystemClock;

    let author = Author {
        name: "Maddy Montaquila".to_owned(),
        contact: ContactDetails {
            phone: Some("01632 12345".to_owned()),
            address: Address::new("1 Main St", "Camberwick Green", "CW1 5ZH", "UK"),
        },
    };
    handle_insert(&author, &clock, &store).await?;

    // Earlier runs may have left an author with the same name behind.
    report_author_lookup(
        find_by_natural_key::<Author, _>(&store, |a| a.name == author.name).await,
    )?;

    let event_a = EventA {
        name: "Maddy Montaquila".to_owned(),
        process_earliest: Some(clock.now() + Duration::days(1)),
    };
    let event_b = EventB {
        name: "Jeremy Likness".to_owned(),
        age: 43,
    };
    handle_insert(&event_a, &clock, &store).await?;
    handle_insert(&event_b, &clock, &store).await?;

    let a_rows: Vec<EventAInbox> = list_all(&store).try_collect().await?;
    for row in &a_rows {
        tracing::info!(id = %row.id, event = ?row.payload, "EventA inbox entry");
    }
    let b_rows: Vec<EventBInbox> = list_all(&store).try_collect().await?;
    for row in &b_rows {
        tracing::info!(id = %row.id, event = ?row.payload, "EventB inbox entry");
    }

    Ok(())
}
