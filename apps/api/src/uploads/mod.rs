// Image uploads to S3-compatible object storage (MinIO locally, AWS in production).

pub mod handlers;

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use chrono::{DateTime, Utc};

use crate::config::Config;

pub const UPLOAD_PREFIX: &str = "uploads";

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "freebird-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO only serves path-style bucket addressing.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `uploads/{millis}-{sanitized name}`
pub fn object_key(file_name: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "{UPLOAD_PREFIX}/{}-{}",
        uploaded_at.timestamp_millis(),
        sanitize_filename(file_name)
    )
}

pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", base_url.trim_end_matches('/'))
}
