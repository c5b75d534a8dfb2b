//! Seeds the problem bank and entitlements from a JSON file, standing in for
//! the external content-management collaborator during development.
//!
//! Usage: `seed-problems [path/to/seed.json]` (defaults to `seed/problems.json`).

use anyhow::{Context, Result};
use mongodb::bson::doc;
use serde::Deserialize;
use workbook_api::models::Problem;
use workbook_api::Config;

#[derive(Debug, Deserialize)]
struct SeedFile {
    problems: Vec<Problem>,
    #[serde(default)]
    entitlements: Vec<SeedEntitlement>,
}

#[derive(Debug, Deserialize, serde::Serialize)]
struct SeedEntitlement {
    learner_id: String,
    chapter_id: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_problems=info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "seed/problems.json".to_string());

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let seed: SeedFile = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let config = Config::load().context("loading configuration")?;
    let client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .context("connecting to MongoDB")?;
    let db = client.database(&config.mongo_database);

    let problems = db.collection::<Problem>("problems");
    let mut inserted = 0usize;
    for problem in &seed.problems {
        // Insert-if-missing so reruns are safe.
        let exists = problems
            .find_one(doc! { "_id": problem.id })
            .await
            .context("checking existing problem")?;
        if exists.is_none() {
            problems
                .insert_one(problem)
                .await
                .with_context(|| format!("inserting problem {}", problem.id))?;
            inserted += 1;
        }
    }
    tracing::info!(
        total = seed.problems.len(),
        inserted,
        "problem seeding complete"
    );

    let entitlements = db.collection::<SeedEntitlement>("entitlements");
    let mut granted = 0usize;
    for entitlement in &seed.entitlements {
        let exists = entitlements
            .find_one(doc! {
                "learner_id": &entitlement.learner_id,
                "chapter_id": entitlement.chapter_id,
            })
            .await
            .context("checking existing entitlement")?;
        if exists.is_none() {
            entitlements
                .insert_one(entitlement)
                .await
                .context("inserting entitlement")?;
            granted += 1;
        }
    }
    tracing::info!(
        total = seed.entitlements.len(),
        granted,
        "entitlement seeding complete"
    );

    Ok(())
}
