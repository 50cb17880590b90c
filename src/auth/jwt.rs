use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::model::role::Role;

/// Claims the backend puts in its bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "_id", alias = "userId", alias = "user_id")]
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| exp <= Utc::now().timestamp())
    }
}

/// Reads the claims out of a token without checking its signature.
///
/// The portal never holds the signing secret; the backend verifies every
/// request and answers 401 when the token is no good.
pub fn read_claims(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn sign(claims: &serde_json::Value) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn reads_backend_claims() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(&serde_json::json!({
            "id": "64ab", "role": "admin", "name": "Rina", "iat": 1, "exp": exp
        }));
        let claims = read_claims(&token).unwrap();
        assert_eq!(claims.id, "64ab");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name.as_deref(), Some("Rina"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn accepts_user_id_alias_and_missing_exp() {
        let token = sign(&serde_json::json!({"userId": "u7", "role": "employee"}));
        let claims = read_claims(&token).unwrap();
        assert_eq!(claims.id, "u7");
        assert_eq!(claims.exp, None);
        assert!(!claims.is_expired());
    }

    #[test]
    fn flags_expired_tokens() {
        let token = sign(&serde_json::json!({"id": "u7", "role": "employee", "exp": 1_000}));
        assert!(read_claims(&token).unwrap().is_expired());
    }

    #[test]
    fn rejects_garbage() {
        assert!(read_claims("not-a-token").is_err());
        let token = sign(&serde_json::json!({"id": "u7", "role": "superuser"}));
        assert!(read_claims(&token).is_err());
    }
}
