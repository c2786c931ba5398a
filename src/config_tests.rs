//! Unit tests for configuration module
//!
//! These tests validate TOML parsing, environment overlay, and validation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use crate::config::*;
    use crate::vector_store::DistanceStrategy;
    use crate::RagChatError;

    fn full_env() -> HashMap<String, String> {
        [
            ("USERNAME", "rag"),
            ("PASSWORD", "secret"),
            ("DSN", "db.example.com:5432/docs"),
            ("CONFIG_DIR", "/etc/ragchat"),
            ("WALLET_DIR", "/etc/ragchat/wallet"),
            ("WALLET_PASSWORD", "walletpw"),
            ("TABLE_NAME", "docs_chunks"),
            ("COMPARTMENT_ID", "ocid1.compartment.oc1..aaaa"),
            (
                "SERVICE_ENDPOINT",
                "https://inference.generativeai.us-chicago-1.oci.oraclecloud.com/",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    // ====== Environment Overlay Tests ======

    #[test]
    fn test_env_map_populates_all_fields() {
        let config = AppConfig::from_env_map(full_env()).unwrap();

        assert_eq!(config.database.username, "rag");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.dsn, "db.example.com:5432/docs");
        assert_eq!(config.database.config_dir.as_deref(), Some("/etc/ragchat"));
        assert_eq!(
            config.database.wallet_dir.as_deref(),
            Some("/etc/ragchat/wallet")
        );
        assert_eq!(config.database.wallet_password.as_deref(), Some("walletpw"));
        assert_eq!(config.table_name(), "docs_chunks");
        assert_eq!(config.genai.compartment_id, "ocid1.compartment.oc1..aaaa");
        // Trailing slash is stripped so paths can be appended
        assert_eq!(
            config.service_endpoint(),
            "https://inference.generativeai.us-chicago-1.oci.oraclecloud.com"
        );
    }

    #[test]
    fn test_wallet_materials_are_optional() {
        let mut env = full_env();
        env.remove("CONFIG_DIR");
        env.remove("WALLET_DIR");
        env.remove("WALLET_PASSWORD");

        let config = AppConfig::from_env_map(env).unwrap();
        assert!(config.database.config_dir.is_none());
        assert!(config.database.wallet_dir.is_none());
        assert!(config.database.wallet_password.is_none());
    }

    #[test]
    fn test_missing_required_variable_is_config_error() {
        for name in [
            "USERNAME",
            "PASSWORD",
            "DSN",
            "TABLE_NAME",
            "COMPARTMENT_ID",
            "SERVICE_ENDPOINT",
        ] {
            let mut env = full_env();
            env.remove(name);
            let err = AppConfig::from_env_map(env).unwrap_err();
            assert!(matches!(err, RagChatError::Config(_)), "{name}");
            assert!(err.to_string().contains(name), "{name}: {err}");
        }
    }

    #[test]
    fn test_empty_variable_counts_as_missing() {
        let mut env = full_env();
        env.insert("DSN".to_string(), "   ".to_string());
        let err = AppConfig::from_env_map(env).unwrap_err();
        assert!(err.to_string().contains("DSN"));
    }

    #[test]
    fn test_invalid_service_endpoint() {
        let mut env = full_env();
        env.insert("SERVICE_ENDPOINT".to_string(), "not a url".to_string());
        assert!(AppConfig::from_env_map(env).is_err());

        let mut env = full_env();
        env.insert("SERVICE_ENDPOINT".to_string(), "ftp://host".to_string());
        assert!(AppConfig::from_env_map(env).is_err());
    }

    // ====== Table Name Tests ======

    #[test]
    fn test_table_name_identifiers() {
        assert!(validate_table_name("docs").is_ok());
        assert!(validate_table_name("_docs_2024").is_ok());
        assert!(validate_table_name("2docs").is_err());
        assert!(validate_table_name("docs; DROP TABLE x").is_err());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name(&"a".repeat(64)).is_err());
    }

    // ====== Default Value Tests ======

    #[test]
    fn test_fixed_model_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.genai.embedding_model, "cohere.embed-multilingual-v3.0");
        assert_eq!(config.genai.chat_model, "cohere.command-r-plus");
        assert_eq!(config.embedding_dimension(), 1024);
        assert_eq!(config.genai.probe_query, "What is Oracle Database?");
        assert_eq!(config.database.distance_strategy, DistanceStrategy::Cosine);
    }

    #[test]
    fn test_chat_defaults_match_sidebar() {
        let chat = AppConfig::default().chat;
        assert!(chat.use_vector_search);
        assert_eq!(chat.fetch_k, 5);
        assert!(chat.streaming);
        assert_eq!(chat.max_tokens, 500);
        assert_eq!(chat.temperature, 0.3);
        assert_eq!(chat.top_k, 0);
        assert_eq!(chat.top_p, 0.75);
        assert_eq!(chat.frequency_penalty, 0.0);
        assert_eq!(chat.presence_penalty, 0.0);
    }

    // ====== File Layer Tests ======

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[database]
table_name = "from_file"
distance_strategy = "euclidean"

[chat]
fetch_k = 8
temperature = 0.5
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.table_name(), "from_file");
        assert_eq!(
            config.database.distance_strategy,
            DistanceStrategy::Euclidean
        );
        assert_eq!(config.chat.fetch_k, 8);
        assert_eq!(config.chat.temperature, 0.5);
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
[database]
table_name = "from_file"
"#,
        )
        .unwrap();

        let env = EnvOverrides::collect(Some(full_env())).unwrap();
        config.apply_env(env);
        assert_eq!(config.table_name(), "docs_chunks");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_chat_default_rejected() {
        let mut config = AppConfig::from_env_map(full_env()).unwrap();
        config.chat.fetch_k = 21;
        assert!(matches!(
            config.validate(),
            Err(RagChatError::InvalidOption(_))
        ));
    }
}
