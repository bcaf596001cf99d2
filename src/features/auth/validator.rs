use super::jwks::JwksClient;
use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
    allowed_email_domain: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard JWT claims (validated by jsonwebtoken library)
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    // Provider claims
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

/// Check that an email identity belongs to the allowed domain suffix.
///
/// The provider also gates this at sign-in callback time; the check is
/// repeated here so every request is covered, not just session creation.
pub fn email_domain_allowed(email: Option<&str>, allowed_domain: &str) -> bool {
    match email {
        Some(email) => email
            .rsplit_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain == allowed_domain),
        None => false,
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
        allowed_email_domain: String,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
            allowed_email_domain,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        // Decode header to get kid
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        // Get decoding key from JWKS
        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        // Validate algorithm from header
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        // Setup validation
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true; // Validate not-before claim

        // Decode and validate token
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        // Only identities on the configured email domain are admitted
        if !email_domain_allowed(claims.email.as_deref(), &self.allowed_email_domain) {
            return Err(AppError::Forbidden(format!(
                "Only @{} accounts may access this service",
                self.allowed_email_domain
            )));
        }

        Ok(AuthenticatedUser {
            id: claims.sub,
            email: claims.email,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_emails_on_allowed_domain() {
        assert!(email_domain_allowed(Some("jo@corp.test"), "corp.test"));
        assert!(email_domain_allowed(Some("a.b+kb@corp.test"), "corp.test"));
    }

    #[test]
    fn rejects_other_domains_and_missing_email() {
        assert!(!email_domain_allowed(Some("jo@other.test"), "corp.test"));
        // Suffix match is not enough, the whole domain must be equal
        assert!(!email_domain_allowed(
            Some("jo@evilcorp.test"),
            "corp.test"
        ));
        assert!(!email_domain_allowed(Some("@corp.test"), "corp.test"));
        assert!(!email_domain_allowed(None, "corp.test"));
    }
}
