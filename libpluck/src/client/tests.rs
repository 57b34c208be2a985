use super::*;

#[test]
fn test_client_config_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.timeout_seconds, 30);
    assert_eq!(config.max_idle_per_host, 10);
}

#[test]
fn test_client_config_builder() {
    let config = ClientConfig::new()
        .with_timeout(60)
        .with_max_idle_per_host(20);
    assert_eq!(config.timeout_seconds, 60);
    assert_eq!(config.max_idle_per_host, 20);
}

#[test]
fn test_normalize_url_adds_https_scheme() {
    let url = normalize_registry_url("ghcr.io").unwrap();
    assert_eq!(url, "https://ghcr.io");
}

#[test]
fn test_normalize_url_keeps_explicit_http() {
    let url = normalize_registry_url("http://localhost:5000").unwrap();
    assert_eq!(url, "http://localhost:5000");
}

#[test]
fn test_normalize_url_removes_trailing_slashes() {
    let url = normalize_registry_url("https://registry.example.com///").unwrap();
    assert_eq!(url, "https://registry.example.com");
}

#[test]
fn test_normalize_url_rejects_empty() {
    assert!(normalize_registry_url("").is_err());
    assert!(normalize_registry_url("   ").is_err());
}

#[test]
fn test_build_http_client_succeeds_with_defaults() {
    assert!(build_http_client(&ClientConfig::default()).is_ok());
}

#[test]
fn test_client_for_selects_hub_for_default_registry() {
    let reference = ImageReference::parse("ubuntu").unwrap();
    let client = client_for(
        &reference,
        Credentials::anonymous(),
        ClientConfig::default(),
    );
    assert!(client.is_ok());
}

#[test]
fn test_client_for_selects_generic_for_other_hosts() {
    let reference = ImageReference::parse("ghcr.io/org/app:v2").unwrap();
    let client = client_for(
        &reference,
        Credentials::basic("user", "token"),
        ClientConfig::default(),
    );
    assert!(client.is_ok());
}
