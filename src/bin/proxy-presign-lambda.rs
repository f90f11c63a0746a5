use std::sync::Arc;

use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use proxy_presign::config::ProcessEnvironment;
use proxy_presign::response::PresignEnvelope;
use proxy_presign::signer::s3::S3UrlSigner;
use proxy_presign::state::PresignState;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch adds its own timestamps
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let signer = Arc::new(S3UrlSigner::new(&sdk_config));
    let function_name = std::env::var("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_default();
    let state = PresignState::new(signer, Arc::new(ProcessEnvironment))
        .with_span(tracing::info_span!("proxy_presign", function = %function_name));

    run(service_fn(|event| handle(event, &state))).await
}

async fn handle(event: LambdaEvent<Value>, state: &PresignState) -> Result<PresignEnvelope, Error> {
    let (payload, context) = event.into_parts();
    tracing::info!(request_id = %context.request_id, "received invocation");
    Ok(state.handle_event(payload).await)
}
