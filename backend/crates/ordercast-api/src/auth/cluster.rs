use actix_web::HttpRequest;
use ordercast_commons::constants::CLUSTER_ID_HEADER;

use crate::error::ApiError;

/// Check the `X-Cluster-Id` header against the configured cluster id.
pub fn verify_cluster_id(req: &HttpRequest, expected: &str) -> Result<(), ApiError> {
    let header_cluster_id = req
        .headers()
        .get(CLUSTER_ID_HEADER)
        .and_then(|value| value.to_str().ok());

    if header_cluster_id != Some(expected) {
        return Err(ApiError::Unauthorized("Cluster id mismatch".to_string()));
    }
    Ok(())
}

/// Check if the request is from localhost
pub fn is_local_request(req: &HttpRequest) -> bool {
    req.peer_addr()
        .map(|addr| addr.ip().is_loopback())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_cluster_id_must_match() {
        let req = TestRequest::default()
            .insert_header((CLUSTER_ID_HEADER, "c1"))
            .to_http_request();
        assert!(verify_cluster_id(&req, "c1").is_ok());
        assert!(verify_cluster_id(&req, "c2").is_err());

        let bare = TestRequest::default().to_http_request();
        assert!(verify_cluster_id(&bare, "c1").is_err());
    }

    #[test]
    fn test_loopback_detection() {
        let local = TestRequest::default()
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_http_request();
        let remote = TestRequest::default()
            .peer_addr("10.1.2.3:40000".parse().unwrap())
            .to_http_request();
        assert!(is_local_request(&local));
        assert!(!is_local_request(&remote));
    }
}
