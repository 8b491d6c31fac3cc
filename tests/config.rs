use kinabalu::infrastructure::config::{Environment, Settings};

#[test]
fn given_valid_environment_strings_when_parsed_then_maps_to_variants() {
    assert_eq!(
        Environment::try_from("local".to_string()).unwrap(),
        Environment::Local
    );
    assert_eq!(
        Environment::try_from("TEST".to_string()).unwrap(),
        Environment::Test
    );
    assert_eq!(
        Environment::try_from("production".to_string()).unwrap(),
        Environment::Prod
    );
}

#[test]
fn given_invalid_environment_string_when_parsed_then_returns_error() {
    assert!(Environment::try_from("staging".to_string()).is_err());
}

#[test]
fn given_no_environment_variables_when_loaded_then_settings_use_documented_defaults() {
    let settings = Settings::from_env();

    assert_eq!(settings.embeddings.model, "text-embedding-3-large");
    assert_eq!(settings.embeddings.dimension, 3072);
    assert!(settings.chunking.embed_concurrency > 0);
    assert_eq!(settings.analysis.government_parties, vec!["Lab"]);
    assert!(settings
        .analysis
        .opposition_parties
        .contains(&"Con".to_string()));
}
