#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use aws_sdk_s3::config::{BehaviorVersion, Credentials};
use proxy_presign::router::build_presign_router;
use proxy_presign::signer::s3::S3UrlSigner;
use proxy_presign::state::PresignState;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const REGION: &str = "us-east-1";
pub const PROXY_DOMAIN: &str = "https://proxy.example.io";

/// S3 signer with static credentials. Pre-signing never leaves the process.
pub fn static_signer() -> S3UrlSigner {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "static",
        ))
        .build();
    S3UrlSigner::from_conf(config)
}

pub fn configured_environment() -> HashMap<String, String> {
    HashMap::from([
        ("AWS_REGION".to_owned(), REGION.to_owned()),
        ("PROXY_CLOUDFRONT_URL".to_owned(), PROXY_DOMAIN.to_owned()),
    ])
}

pub struct TestClient {
    client: reqwest::Client,
    addr: SocketAddr,
}

impl TestClient {
    pub async fn new() -> Self {
        Self::with_environment(configured_environment()).await
    }

    pub async fn with_environment(environment: HashMap<String, String>) -> Self {
        let state = PresignState::new(Arc::new(static_signer()), Arc::new(environment));

        let svc = build_presign_router(Arc::new(state));
        let app = svc.layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind ephemeral socket");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        TestClient { client, addr }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        RequestBuilder {
            builder: self.client.get(format!("http://{}{}", self.addr, url)),
        }
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder {
            builder: self.client.post(format!("http://{}{}", self.addr, url)),
        }
    }
}

pub struct RequestBuilder {
    builder: reqwest::RequestBuilder,
}

impl RequestBuilder {
    pub async fn send(self) -> TestResponse {
        TestResponse {
            response: self.builder.send().await.unwrap(),
        }
    }

    pub fn body(mut self, body: impl Into<reqwest::Body>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    pub fn json<T>(mut self, json: &T) -> Self
    where
        T: serde::Serialize,
    {
        self.builder = self.builder.json(json);
        self
    }

    pub fn query(mut self, query: &[(&str, &str)]) -> Self {
        self.builder = self.builder.query(query);
        self
    }
}

/// A wrapper around [`reqwest::Response`] that provides common methods with internal `unwrap()`s.
#[derive(Debug)]
pub struct TestResponse {
    response: reqwest::Response,
}

impl TestResponse {
    pub fn assert_status_ok(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::OK);
    }

    pub fn assert_status_bad_request(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    pub fn assert_status_internal_server_error(&self) {
        assert_eq!(self.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }

    pub fn assert_header_content_type_json(&self) {
        assert_eq!(
            self.response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .unwrap(),
            "application/json"
        );
    }

    pub async fn text(self) -> String {
        self.response.text().await.unwrap()
    }

    pub async fn json<T>(self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        self.response.json().await.unwrap()
    }

    pub fn status(&self) -> reqwest::StatusCode {
        self.response.status()
    }
}
