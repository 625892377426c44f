pub mod api;
pub mod gui;
pub mod shop;

pub use api::{ApiError, BackendClient};
pub use shop::{normalize_shop_domain, ShopDomainError};

/// アプリケーション起動まわりのエラー
#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ShopGenieResult<T> = Result<T, GuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_availability() {
        assert_eq!(
            normalize_shop_domain("demo").as_deref(),
            Ok("demo.myshopify.com")
        );
        let _client: Option<BackendClient> = None;
    }

    #[test]
    fn test_error_types() {
        let error = GuiError::Configuration("missing".to_string());
        assert_eq!(error.to_string(), "Configuration error: missing");

        let io: GuiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, GuiError::Io(_)));
    }
}
