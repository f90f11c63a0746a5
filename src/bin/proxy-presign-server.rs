use std::sync::Arc;

use aws_config::BehaviorVersion;
use proxy_presign::config::ProcessEnvironment;
use proxy_presign::router::build_presign_router;
use proxy_presign::signer::s3::S3UrlSigner;
use proxy_presign::state::PresignState;
use tower_http::trace::TraceLayer;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // setup tracing and logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // configure url signer
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let signer = Arc::new(S3UrlSigner::new(&sdk_config));

    // initialize handler state
    let state = PresignState::new(signer, Arc::new(ProcessEnvironment));

    // start server
    let app = build_presign_router(Arc::new(state)).layer(TraceLayer::new_for_http());

    let addr =
        std::env::var("PRESIGN_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
