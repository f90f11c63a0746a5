//! # Proxy Presign
//!
//! Issue temporary pre-signed S3 urls and rewrite them onto a proxy domain,
//! typically a CloudFront distribution in front of the bucket, so that
//! clients never talk to the S3 endpoint directly.
//!
//! ## Design
//!
//! A single invocation is a linear pipeline:
//!
//! - the configuration (`AWS_REGION`, `PROXY_CLOUDFRONT_URL`) is read from
//! the environment,
//! - bucket, method and key are resolved from the invocation input, where
//! API Gateway `queryStringParameters` win over top-level values,
//! - the method is mapped onto an S3 object action,
//! - a UrlSigner pre-signs the action against the virtual-host endpoint,
//! - the bucket host of the url is replaced with the proxy domain.
//!
//! Every outcome, including failures, is returned as an API Gateway
//! compatible envelope. The handler can run on the Lambda runtime or behind
//! the bundled axum router.

#![warn(missing_docs)]

pub mod action;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod rewrite;
pub mod router;
pub mod signer;
pub mod state;
