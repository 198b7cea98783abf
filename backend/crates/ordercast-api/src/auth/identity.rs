use actix_web::HttpRequest;
use ordercast_commons::RecipientId;

use crate::error::ApiError;

/// Read the resolved recipient identity from `header`.
pub fn resolve_identity(req: &HttpRequest, header: &str) -> Result<RecipientId, ApiError> {
    let value = req
        .headers()
        .get(header)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", header)))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("Invalid {} header", header)))?;

    RecipientId::try_new(value.trim()).map_err(|e| ApiError::Unauthorized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_resolves_header_value() {
        let req = TestRequest::default()
            .insert_header(("X-Authenticated-User", "a@x.com"))
            .to_http_request();
        let id = resolve_identity(&req, "X-Authenticated-User").unwrap();
        assert_eq!(id.as_str(), "a@x.com");
    }

    #[test]
    fn test_missing_or_blank_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            resolve_identity(&req, "X-Authenticated-User"),
            Err(ApiError::Unauthorized(_))
        ));

        let req = TestRequest::default()
            .insert_header(("X-Authenticated-User", "   "))
            .to_http_request();
        assert!(matches!(
            resolve_identity(&req, "X-Authenticated-User"),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
