use crate::config::Config;
use crate::storage::{mongo::MongoStore, EntitlementStore, ProblemStore, SubmissionStore};
use mongodb::Client as MongoClient;
use std::sync::Arc;

pub mod content;
pub mod grader;
pub mod grading;

/// Shared application state: configuration plus the injected storage
/// collaborators. Handlers and services never construct their own clients.
pub struct AppState {
    pub config: Config,
    pub problems: Arc<dyn ProblemStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub entitlements: Arc<dyn EntitlementStore>,
}

impl AppState {
    /// Production wiring over MongoDB. Fails fast when the database is
    /// unreachable.
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let db = mongo_client.database(&config.mongo_database);
        let store = Arc::new(MongoStore::new(db));

        tokio::time::timeout(std::time::Duration::from_secs(5), store.ping())
            .await
            .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;

        tracing::info!("MongoDB connection established");

        Ok(Self {
            config,
            problems: store.clone(),
            submissions: store.clone(),
            entitlements: store,
        })
    }

    /// Explicit wiring, used by the test harness and alternative backends.
    pub fn with_stores(
        config: Config,
        problems: Arc<dyn ProblemStore>,
        submissions: Arc<dyn SubmissionStore>,
        entitlements: Arc<dyn EntitlementStore>,
    ) -> Self {
        Self {
            config,
            problems,
            submissions,
            entitlements,
        }
    }
}
