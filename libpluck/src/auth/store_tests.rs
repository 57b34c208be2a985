use super::*;
use crate::auth::Credentials;
use base64::{Engine as _, engine::general_purpose};
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, auths: &[(&str, &str, &str)]) -> std::path::PathBuf {
    let entries: Vec<String> = auths
        .iter()
        .map(|(key, user, pass)| {
            let encoded = general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            format!(r#""{key}": {{"auth": "{encoded}"}}"#)
        })
        .collect();
    let body = format!(r#"{{"auths": {{{}}}}}"#, entries.join(","));

    let path = dir.join("config.json");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_missing_file_yields_none() {
    let temp_dir = tempdir().unwrap();
    let source = DockerConfigFile::new(temp_dir.path().join("config.json"));

    assert!(source.lookup("index.docker.io").unwrap().is_none());
}

#[test]
fn test_hub_credentials_stored_under_v1_key() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        &[("https://index.docker.io/v1/", "hubuser", "hubpass")],
    );

    let source = DockerConfigFile::new(path);
    let creds = source.lookup("index.docker.io").unwrap().unwrap();
    assert_eq!(creds, Credentials::basic("hubuser", "hubpass"));
}

#[test]
fn test_exact_host_key_for_other_registries() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), &[("ghcr.io", "ghuser", "ghtoken")]);

    let source = DockerConfigFile::new(path);
    let creds = source.lookup("ghcr.io").unwrap().unwrap();
    assert_eq!(creds, Credentials::basic("ghuser", "ghtoken"));

    assert!(source.lookup("quay.io").unwrap().is_none());
}

#[test]
fn test_password_with_colon_splits_on_first() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), &[("ghcr.io", "user", "pa:ss:word")]);

    let source = DockerConfigFile::new(path);
    let creds = source.lookup("ghcr.io").unwrap().unwrap();
    assert_eq!(creds, Credentials::basic("user", "pa:ss:word"));
}

#[test]
fn test_empty_auth_entry_yields_none() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"auths": {"ghcr.io": {"auth": ""}}}"#).unwrap();

    let source = DockerConfigFile::new(path);
    assert!(source.lookup("ghcr.io").unwrap().is_none());
}

#[test]
fn test_entry_without_auth_field_yields_none() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    // credential-helper entries carry no inline auth
    std::fs::write(&path, r#"{"auths": {"ghcr.io": {}}}"#).unwrap();

    let source = DockerConfigFile::new(path);
    assert!(source.lookup("ghcr.io").unwrap().is_none());
}

#[test]
fn test_malformed_json_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();

    let source = DockerConfigFile::new(path);
    let err = source.lookup("ghcr.io").unwrap_err();
    assert!(matches!(err, PluckError::Config { .. }));
}

#[test]
fn test_invalid_base64_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"auths": {"ghcr.io": {"auth": "!!!"}}}"#).unwrap();

    let source = DockerConfigFile::new(path);
    let err = source.lookup("ghcr.io").unwrap_err();
    assert!(matches!(err, PluckError::Config { .. }));
}

#[test]
fn test_auth_without_separator_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("config.json");
    let encoded = general_purpose::STANDARD.encode("no-separator");
    std::fs::write(
        &path,
        format!(r#"{{"auths": {{"ghcr.io": {{"auth": "{encoded}"}}}}}}"#),
    )
    .unwrap();

    let source = DockerConfigFile::new(path);
    let err = source.lookup("ghcr.io").unwrap_err();
    assert!(matches!(err, PluckError::Config { .. }));
}

#[test]
fn test_default_path_under_home() {
    if let Some(path) = DockerConfigFile::default_path() {
        assert!(path.ends_with(".docker/config.json"));
    }
}
