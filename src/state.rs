//! Presign handler state.

use std::sync::Arc;

use tracing::{info, info_span, Instrument, Span};

use crate::{
    action::Action,
    config::{Environment, ProxyConfig},
    error::Result,
    extract::{InvocationInput, ResolvedParameters},
    response::PresignEnvelope,
    rewrite::DomainRewriter,
    signer::{PresignRequest, UrlSigner},
};

/// State shared by all invocations of the presign handler.
#[derive(Clone)]
pub struct PresignState {
    signer: Arc<dyn UrlSigner>,
    environment: Arc<dyn Environment>,
    span: Span,
}

impl PresignState {
    /// Create a new presign state.
    ///
    /// Invocations are logged under a `proxy_presign` root span.
    pub fn new(signer: Arc<dyn UrlSigner>, environment: Arc<dyn Environment>) -> Self {
        Self {
            signer,
            environment,
            span: info_span!("proxy_presign"),
        }
    }

    /// Replace the root span invocations are logged under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Handle a raw JSON event.
    pub async fn handle_event(&self, event: serde_json::Value) -> PresignEnvelope {
        match InvocationInput::from_value(event) {
            Ok(input) => self.handle_invocation(input).await,
            Err(err) => PresignEnvelope::failure(err, ResolvedParameters::default()),
        }
    }

    /// Handle a single invocation. Every outcome is an envelope.
    pub async fn handle_invocation(&self, input: InvocationInput) -> PresignEnvelope {
        let span = info_span!(parent: &self.span, "invocation");
        async move {
            let config = match ProxyConfig::load(self.environment.as_ref()) {
                Ok(config) => config,
                Err(err) => {
                    return PresignEnvelope::failure(err.into(), ResolvedParameters::default())
                }
            };
            info!(
                region = config.region(),
                proxy_domain = config.proxy_domain(),
                "loaded configuration"
            );

            let params = input.resolve();
            match self.presign(&config, &params).await {
                Ok((s3_url, proxy_url)) => PresignEnvelope::success(&params, s3_url, proxy_url),
                Err(err) => PresignEnvelope::failure(err, params),
            }
        }
        .instrument(span)
        .await
    }

    async fn presign(
        &self,
        config: &ProxyConfig,
        params: &ResolvedParameters,
    ) -> Result<(String, String)> {
        let action = Action::from_method(params.method())?;
        let request = PresignRequest {
            action,
            bucket: params.bucket().map(ToOwned::to_owned),
            key: params.key().map(ToOwned::to_owned),
            region: config.region().to_owned(),
            expires_in: config.expiration(),
        };

        let signed = self.signer.presign(&request).await?;
        info!(url = %signed.url(), expires_at = %signed.expires_at(), "S3 pre-signed url");

        let proxy_url = DomainRewriter::from(config).rewrite(signed.url(), params.bucket());
        info!(url = %proxy_url, "proxy pre-signed url");

        Ok((signed.url().to_owned(), proxy_url))
    }
}
