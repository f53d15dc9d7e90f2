use aws_sdk_dynamodb::config::Region;
use lambda_http::{run, service_fn, Error};
use std::sync::Arc;
use wellness_core::{Config, LogNotifier};

mod dynamo;
mod http_handler;

use dynamo::DynamoStore;
use http_handler::{function_handler, AppState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    wellness_core::logging::init_for_lambda("info");

    let config = Config::from_env()?;

    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    let loader = match &config.aws.region {
        Some(region) => loader.region(Region::new(region.clone())),
        None => loader,
    };
    let sdk_config = loader.load().await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);

    let tables = &config.tables;
    let state = AppState {
        diet: Arc::new(DynamoStore::new(client.clone(), &tables.diet_report, "reportId")),
        posture: Arc::new(DynamoStore::new(client.clone(), &tables.posture_report, "posture_id")),
        questions: Arc::new(DynamoStore::new(
            client.clone(),
            &tables.questions,
            wellness_core::questions::PARTITION_ATTRIBUTE,
        )),
        newsletter: Arc::new(DynamoStore::new(client.clone(), &tables.newsletter, "email")),
        registrations: Arc::new(DynamoStore::new(client, &tables.registrations, "email")),
        notifier: Arc::new(LogNotifier),
        config: config.clone(),
    };

    tracing::info!("Wellness handlers ready (diet table {})", state.config.tables.diet_report);
    run(service_fn(|event| function_handler(&state, event))).await
}
