//! UrlSigner for S3 objects.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    config::Region,
    error::{DisplayErrorContext, SdkError},
    presigning::{PresignedRequest, PresigningConfig},
    Client, Config,
};
use tracing::{debug, error};

use super::{PresignRequest, SignedUrl, SignerError, UrlSigner};
use crate::action::Action;

/// Regional S3 endpoint the client is pinned to.
pub fn s3_endpoint_url(region: &str) -> String {
    format!("https://s3.{region}.amazonaws.com")
}

/// Signing configuration for the S3 object store.
///
/// A client is derived per request so the region can follow the invocation
/// configuration. Urls are always virtual-host addressed, e.g.
/// `https://<bucket>.s3.<region>.amazonaws.com/<key>`.
#[derive(Debug, Clone)]
pub struct S3UrlSigner {
    config: Config,
}

impl S3UrlSigner {
    /// Create a new `S3UrlSigner` from the shared AWS configuration.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_conf(Config::from(sdk_config))
    }

    /// Create a new `S3UrlSigner` from an S3 SDK configuration.
    pub fn from_conf(config: Config) -> Self {
        Self { config }
    }

    fn client(&self, region: &str) -> Client {
        let config = self
            .config
            .to_builder()
            .region(Region::new(region.to_owned()))
            .endpoint_url(s3_endpoint_url(region))
            .force_path_style(false)
            .build();
        Client::from_conf(config)
    }
}

#[async_trait]
impl UrlSigner for S3UrlSigner {
    async fn presign(&self, request: &PresignRequest) -> Result<SignedUrl, SignerError> {
        let client = self.client(&request.region);
        let presign_config = PresigningConfig::expires_in(request.expires_in)
            .map_err(|e| SignerError::invalid_request(e.to_string()))?;
        let bucket = request.bucket.clone();
        let key = request.key.clone();

        debug!(action = %request.action, ?bucket, ?key, "pre-signing object request");
        let presigned = match request.action {
            Action::GetObject => client
                .get_object()
                .set_bucket(bucket)
                .set_key(key)
                .presigned(presign_config.clone())
                .await
                .map_err(from_sdk_error)?,
            Action::PutObject => client
                .put_object()
                .set_bucket(bucket)
                .set_key(key)
                .presigned(presign_config.clone())
                .await
                .map_err(from_sdk_error)?,
            Action::DeleteObject => client
                .delete_object()
                .set_bucket(bucket)
                .set_key(key)
                .presigned(presign_config.clone())
                .await
                .map_err(from_sdk_error)?,
        };

        Ok(signed_url(presigned, &presign_config))
    }
}

fn signed_url(presigned: PresignedRequest, presign_config: &PresigningConfig) -> SignedUrl {
    SignedUrl::new(
        presigned.uri().to_string(),
        presign_config.start_time().into(),
        presign_config.expires(),
    )
}

fn from_sdk_error<E, R>(err: SdkError<E, R>) -> SignerError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    error!(error = %DisplayErrorContext(&err), "pre-signing failed");
    let message = match std::error::Error::source(&err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    };
    match err {
        SdkError::ConstructionFailure(_) => SignerError::invalid_request(message),
        _ => SignerError::internal(message),
    }
}
