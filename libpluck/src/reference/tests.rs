use super::*;
use std::str::FromStr;

#[test]
fn test_bare_name_gets_all_defaults() {
    let reference = ImageReference::parse("ubuntu").unwrap();
    assert_eq!(reference.registry(), "index.docker.io");
    assert_eq!(reference.repository(), "library/ubuntu");
    assert_eq!(reference.tag(), "latest");
    assert!(reference.is_default_registry());
}

#[test]
fn test_name_with_tag() {
    let reference = ImageReference::parse("nginx:1.25").unwrap();
    assert_eq!(reference.registry(), "index.docker.io");
    assert_eq!(reference.repository(), "library/nginx");
    assert_eq!(reference.tag(), "1.25");
}

#[test]
fn test_namespaced_hub_repository_keeps_namespace() {
    let reference = ImageReference::parse("grafana/loki:2.9").unwrap();
    assert_eq!(reference.registry(), "index.docker.io");
    assert_eq!(reference.repository(), "grafana/loki");
    assert_eq!(reference.tag(), "2.9");
}

#[test]
fn test_explicit_registry_host() {
    let reference = ImageReference::parse("ghcr.io/org/app:v2").unwrap();
    assert_eq!(reference.registry(), "ghcr.io");
    assert_eq!(reference.repository(), "org/app");
    assert_eq!(reference.tag(), "v2");
    assert!(!reference.is_default_registry());
}

#[test]
fn test_registry_with_port() {
    let reference = ImageReference::parse("localhost:5000/myimage:dev").unwrap();
    assert_eq!(reference.registry(), "localhost:5000");
    assert_eq!(reference.repository(), "myimage");
    assert_eq!(reference.tag(), "dev");
}

#[test]
fn test_localhost_without_port_is_a_registry() {
    let reference = ImageReference::parse("localhost/myimage").unwrap();
    assert_eq!(reference.registry(), "localhost");
    assert_eq!(reference.repository(), "myimage");
    assert_eq!(reference.tag(), "latest");
}

#[test]
fn test_registry_with_port_and_default_tag() {
    let reference = ImageReference::parse("registry.example.com:5000/team/app").unwrap();
    assert_eq!(reference.registry(), "registry.example.com:5000");
    assert_eq!(reference.repository(), "team/app");
    assert_eq!(reference.tag(), "latest");
}

#[test]
fn test_docker_io_alias_normalizes_to_hub_host() {
    let reference = ImageReference::parse("docker.io/library/redis:7").unwrap();
    assert_eq!(reference.registry(), "index.docker.io");
    assert_eq!(reference.repository(), "library/redis");
    assert!(reference.is_default_registry());
}

#[test]
fn test_deep_repository_path() {
    let reference = ImageReference::parse("quay.io/ns/team/app:1.0").unwrap();
    assert_eq!(reference.registry(), "quay.io");
    assert_eq!(reference.repository(), "ns/team/app");
}

#[test]
fn test_empty_reference_fails() {
    let err = ImageReference::parse("").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));

    let err = ImageReference::parse("   ").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));
}

#[test]
fn test_digest_pinned_reference_rejected() {
    let err = ImageReference::parse(
        "nginx@sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    )
    .unwrap_err();
    assert!(err.to_string().contains("digest-pinned"));
}

#[test]
fn test_uppercase_repository_rejected() {
    let err = ImageReference::parse("ghcr.io/Org/App:v2").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));
}

#[test]
fn test_empty_tag_rejected() {
    let err = ImageReference::parse("nginx:").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));
}

#[test]
fn test_tag_with_invalid_characters_rejected() {
    let err = ImageReference::parse("nginx:la/test").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));
}

#[test]
fn test_overlong_tag_rejected() {
    let tag = "a".repeat(129);
    let err = ImageReference::parse(&format!("nginx:{tag}")).unwrap_err();
    assert!(err.to_string().contains("128"));
}

#[test]
fn test_empty_repository_segment_rejected() {
    let err = ImageReference::parse("ghcr.io/org//app").unwrap_err();
    assert!(matches!(err, PluckError::Reference { .. }));
}

#[test]
fn test_from_str_delegates_to_parse() {
    let reference = ImageReference::from_str("alpine:3.20").unwrap();
    assert_eq!(reference.repository(), "library/alpine");
}

#[test]
fn test_display_is_fully_qualified() {
    let reference = ImageReference::parse("ubuntu").unwrap();
    assert_eq!(reference.to_string(), "index.docker.io/library/ubuntu:latest");

    let reference = ImageReference::parse("ghcr.io/org/app:v2").unwrap();
    assert_eq!(reference.to_string(), "ghcr.io/org/app:v2");
}
