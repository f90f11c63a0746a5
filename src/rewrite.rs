//! Rewriting of pre-signed S3 urls onto the proxy domain.

use crate::config::ProxyConfig;

/// Virtual-host style url of a bucket, e.g. `https://mybucket.s3.us-east-1.amazonaws.com`.
pub fn bucket_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com")
}

/// Replaces the bucket host of a pre-signed url with the proxy domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRewriter {
    region: String,
    proxy_domain: String,
}

impl DomainRewriter {
    /// Create a rewriter for the given region and proxy domain.
    pub fn new(region: impl Into<String>, proxy_domain: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            proxy_domain: proxy_domain.into(),
        }
    }

    /// Rewrite `signed_url` onto the proxy domain.
    ///
    /// Only a bucket url at the very start of `signed_url` is replaced. If it
    /// is not there, or the bucket is unset, the url is returned unchanged.
    pub fn rewrite(&self, signed_url: &str, bucket: Option<&str>) -> String {
        let Some(bucket) = bucket else {
            return signed_url.to_owned();
        };

        match signed_url.strip_prefix(&bucket_url(bucket, &self.region)) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?']) => {
                format!("{}{}", self.proxy_domain, rest)
            }
            _ => signed_url.to_owned(),
        }
    }
}

impl From<&ProxyConfig> for DomainRewriter {
    fn from(config: &ProxyConfig) -> Self {
        Self::new(config.region(), config.proxy_domain())
    }
}
