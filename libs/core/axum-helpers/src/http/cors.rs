use axum::http::{HeaderValue, Method, header};
use core_config::cors::CorsConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// Builds the CORS layer for a [`CorsConfig`].
///
/// Any-origin mode never allows credentials; tower-http rejects that
/// combination at request time.
pub fn cors_layer(config: &CorsConfig) -> io::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match config {
        CorsConfig::AnyOrigin => Ok(layer.allow_origin(Any)),
        CorsConfig::Origins(origins) => {
            let allowed = origins
                .iter()
                .map(|o| o.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Invalid CORS origin: {}", e),
                    )
                })?;

            Ok(layer
                .allow_origin(AllowOrigin::list(allowed))
                .allow_credentials(true))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_origin_layer_builds() {
        assert!(cors_layer(&CorsConfig::AnyOrigin).is_ok());
    }

    #[test]
    fn test_origin_list_layer_builds() {
        let config = CorsConfig::Origins(vec![
            "http://localhost:3000".to_string(),
            "https://quotes.example.com".to_string(),
        ]);
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = CorsConfig::Origins(vec!["http://bad\norigin".to_string()]);
        let err = cors_layer(&config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
