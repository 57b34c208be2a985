use libpluck::{ClientConfig, Credentials, FetchOptions, ImageReference, client_for};

#[test]
fn test_reference_parsing_through_public_api() {
    let reference = ImageReference::parse("grafana/loki:2.9").unwrap();
    assert_eq!(reference.registry(), "index.docker.io");
    assert_eq!(reference.repository(), "grafana/loki");
    assert_eq!(reference.tag(), "2.9");
}

#[test]
fn test_fetch_options_builder_chains() {
    let options = FetchOptions::new()
        .with_include_base(true)
        .with_concurrency(2);
    assert!(options.include_base);
    assert_eq!(options.concurrency, 2);
}

#[test]
fn test_client_construction_for_both_registry_kinds() {
    let hub = ImageReference::parse("alpine").unwrap();
    assert!(client_for(&hub, Credentials::anonymous(), ClientConfig::default()).is_ok());

    let generic = ImageReference::parse("ghcr.io/org/app").unwrap();
    assert!(
        client_for(
            &generic,
            Credentials::basic("user", "token"),
            ClientConfig::default()
        )
        .is_ok()
    );
}

#[test]
fn test_version_is_reported() {
    assert!(!libpluck::version().is_empty());
}
