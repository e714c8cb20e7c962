//! Mock Deferred Link Vendor
//!
//! Stands in for a real deferred deep link provider: mints a random
//! URL-safe token and embeds it in a link on a fixed host.

use platform::crypto::random_url_token;
use url::Url;

use crate::domain::repository::{DeferredLinkVendor, VendorError};
use crate::domain::value_objects::VendorLink;

pub const DEFAULT_VENDOR_BASE_URL: &str = "https://mock.deferred-example.link";

/// Random bytes per vendor token (22 base64url characters)
const TOKEN_BYTES: usize = 16;

/// Mock vendor, no network involved
#[derive(Debug, Clone)]
pub struct MockDeferredLinkVendor {
    base_url: String,
}

impl Default for MockDeferredLinkVendor {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR_BASE_URL)
    }
}

impl MockDeferredLinkVendor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl DeferredLinkVendor for MockDeferredLinkVendor {
    async fn generate_deferred_link(&self, referral_code: &str) -> Result<VendorLink, VendorError> {
        if referral_code.trim().is_empty() {
            return Err(VendorError::Request("referral code is empty".to_string()));
        }

        let vendor_token = random_url_token(TOKEN_BYTES);
        let url = Url::parse_with_params(
            &format!("{}/{}", self.base_url, vendor_token),
            &[("referral_code", referral_code)],
        )
        .map_err(|e| VendorError::InvalidResponse(e.to_string()))?;

        Ok(VendorLink {
            url: url.into(),
            vendor_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_unique_tokens() {
        let vendor = MockDeferredLinkVendor::default();
        let a = vendor.generate_deferred_link("C1").await.unwrap();
        let b = vendor.generate_deferred_link("C1").await.unwrap();

        assert_ne!(a.vendor_token, b.vendor_token);
        assert_eq!(a.vendor_token.len(), 22);
        assert_eq!(
            a.url,
            format!("https://mock.deferred-example.link/{}?referral_code=C1", a.vendor_token)
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_is_ignored() {
        let vendor = MockDeferredLinkVendor::new("https://links.test/");
        let link = vendor.generate_deferred_link("XYZ").await.unwrap();
        assert!(link.url.starts_with("https://links.test/"));
        assert_eq!(link.url.matches("//").count(), 1);
    }

    #[tokio::test]
    async fn test_referral_code_is_query_encoded() {
        let vendor = MockDeferredLinkVendor::default();
        let link = vendor.generate_deferred_link("A&B #1").await.unwrap();

        assert!(link.url.ends_with("?referral_code=A%26B+%231"));
        let parsed = Url::parse(&link.url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("referral_code".to_string(), "A&B #1".to_string())]);
        assert_eq!(parsed.path(), format!("/{}", link.vendor_token));
    }

    #[tokio::test]
    async fn test_unusable_base_url() {
        let vendor = MockDeferredLinkVendor::new("not a url");
        let err = vendor.generate_deferred_link("C1").await.unwrap_err();
        assert_eq!(err.category(), "InvalidResponse");
    }

    #[tokio::test]
    async fn test_blank_code_is_rejected() {
        let vendor = MockDeferredLinkVendor::default();
        let err = vendor.generate_deferred_link("  ").await.unwrap_err();
        assert_eq!(err.category(), "RequestFailed");
    }
}
