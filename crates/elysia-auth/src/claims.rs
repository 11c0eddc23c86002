//! JWT claims carried by a session token.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A session token is bound to exactly one subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject identifier (`stu_…`, `tea_…`, `adm_…` or `admin_…`)
    pub sub: String,
    /// Token identifier, unique per issued token
    pub jti: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_fields() {
        let json = r#"{"sub":"stu_1","jti":"ab","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "stu_1");
        assert_eq!(claims.exp - claims.iat, 99);
    }
}
