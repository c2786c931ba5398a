//! Unit tests for error handling
//!
//! Tests error kinds, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::ErrorKind;
    use crate::errors::RagChatError;

    #[test]
    fn test_config_error() {
        let error = RagChatError::Config("TABLE_NAME is not set".to_string());
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(error.to_string().contains("TABLE_NAME"));
    }

    #[test]
    fn test_connection_error_kind() {
        let error = RagChatError::Connection("refused".to_string());
        assert_eq!(error.kind(), ErrorKind::Connection);
        assert_eq!(error.kind().as_str(), "connection");
    }

    #[test]
    fn test_embedding_is_retrieval_kind() {
        let error = RagChatError::Embedding("503".to_string());
        assert_eq!(error.kind(), ErrorKind::Retrieval);
    }

    #[test]
    fn test_template_is_generation_kind() {
        let error = RagChatError::Template("missing query".to_string());
        assert_eq!(error.kind(), ErrorKind::Generation);
    }

    #[test]
    fn test_request_kinds() {
        assert_eq!(
            RagChatError::InvalidOption("fetch_k".into()).kind(),
            ErrorKind::Request
        );
        assert_eq!(
            RagChatError::SessionBusy("abc".into()).kind(),
            ErrorKind::Request
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: RagChatError = io_err.into();
        assert!(matches!(err, RagChatError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: RagChatError = toml_err.into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::Generation).unwrap();
        assert_eq!(json, "\"generation\"");
    }
}
