//! AWS SigV4 POST policy signing.
//!
//! Builds the signed form fields for a browser/app-direct S3 POST upload.
//! The policy document pins the bucket, the exact object key, the exact
//! Content-Type, and a `content-length-range` ceiling, all verified by S3
//! at upload time. Separated from the S3 backend so the signing logic is
//! testable without network or credentials providers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Inputs for signing one POST policy.
pub struct PostPolicyRequest<'a> {
    pub bucket: &'a str,
    pub region: &'a str,
    pub key: &'a str,
    pub content_type: &'a str,
    pub max_bytes: u64,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub session_token: Option<&'a str>,
}

/// Sign a POST policy valid for `expires_in` starting at `now`.
///
/// Returns the form fields (excluding the file part itself) in the order a
/// client should submit them, plus the expiry instant.
pub fn sign_post_policy(
    request: &PostPolicyRequest<'_>,
    now: DateTime<Utc>,
    expires_in: Duration,
) -> (Vec<(String, String)>, DateTime<Utc>) {
    let expires_at = now + chrono::Duration::from_std(expires_in).unwrap_or(chrono::Duration::zero());
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();
    let credential = format!(
        "{}/{}/{}/s3/aws4_request",
        request.access_key_id, date_stamp, request.region
    );

    let mut conditions = vec![
        json!({ "bucket": request.bucket }),
        json!({ "key": request.key }),
        json!({ "Content-Type": request.content_type }),
        json!(["content-length-range", 1, request.max_bytes]),
        json!({ "x-amz-algorithm": ALGORITHM }),
        json!({ "x-amz-credential": credential }),
        json!({ "x-amz-date": amz_date }),
    ];
    if let Some(token) = request.session_token {
        conditions.push(json!({ "x-amz-security-token": token }));
    }

    let policy = json!({
        "expiration": expires_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "conditions": conditions,
    });
    let policy_b64 = BASE64.encode(policy.to_string());

    let signing_key = derive_signing_key(
        request.secret_access_key,
        &date_stamp,
        request.region,
        "s3",
    );
    let signature = hex::encode(hmac_sha256(&signing_key, policy_b64.as_bytes()));

    let mut fields = vec![
        ("key".to_string(), request.key.to_string()),
        ("Content-Type".to_string(), request.content_type.to_string()),
        ("x-amz-algorithm".to_string(), ALGORITHM.to_string()),
        ("x-amz-credential".to_string(), credential),
        ("x-amz-date".to_string(), amz_date),
    ];
    if let Some(token) = request.session_token {
        fields.push(("x-amz-security-token".to_string(), token.to_string()));
    }
    fields.push(("policy".to_string(), policy_b64));
    fields.push(("x-amz-signature".to_string(), signature));

    (fields, expires_at)
}

fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> PostPolicyRequest<'static> {
        PostPolicyRequest {
            bucket: "fieldops-media",
            region: "us-east-1",
            key: "tenants/t/visits/v/photos/p.jpg",
            content_type: "image/jpeg",
            max_bytes: 10_485_760,
            access_key_id: "AKIDEXAMPLE",
            secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            session_token: None,
        }
    }

    #[test]
    fn test_fields_pin_key_and_content_type() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let (fields, expires_at) =
            sign_post_policy(&request(), now, Duration::from_secs(900));

        let get = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("key"), "tenants/t/visits/v/photos/p.jpg");
        assert_eq!(get("Content-Type"), "image/jpeg");
        assert_eq!(get("x-amz-algorithm"), "AWS4-HMAC-SHA256");
        assert_eq!(
            get("x-amz-credential"),
            "AKIDEXAMPLE/20260201/us-east-1/s3/aws4_request"
        );
        assert_eq!(get("x-amz-date"), "20260201T120000Z");
        assert_eq!(expires_at, now + chrono::Duration::seconds(900));
        // SigV4 signatures are 32 bytes hex-encoded
        assert_eq!(get("x-amz-signature").len(), 64);
    }

    #[test]
    fn test_policy_document_carries_size_ceiling() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let (fields, _) = sign_post_policy(&request(), now, Duration::from_secs(900));
        let policy_b64 = fields
            .iter()
            .find(|(k, _)| k == "policy")
            .map(|(_, v)| v.clone())
            .unwrap();
        let decoded = BASE64.decode(policy_b64).unwrap();
        let policy: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        let conditions = policy["conditions"].as_array().unwrap();
        assert!(conditions
            .iter()
            .any(|c| c == &json!(["content-length-range", 1, 10_485_760u64])));
        assert!(conditions.iter().any(|c| c == &json!({ "bucket": "fieldops-media" })));
        assert_eq!(policy["expiration"], "2026-02-01T12:15:00.000Z");
    }

    #[test]
    fn test_session_token_included_when_present() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let mut req = request();
        req.session_token = Some("FwoGZXIvYXdzEP");
        let (fields, _) = sign_post_policy(&req, now, Duration::from_secs(900));
        assert!(fields
            .iter()
            .any(|(k, v)| k == "x-amz-security-token" && v == "FwoGZXIvYXdzEP"));
    }

    #[test]
    fn test_signature_is_deterministic_for_fixed_inputs() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let (a, _) = sign_post_policy(&request(), now, Duration::from_secs(900));
        let (b, _) = sign_post_policy(&request(), now, Duration::from_secs(900));
        assert_eq!(a, b);
    }
}
