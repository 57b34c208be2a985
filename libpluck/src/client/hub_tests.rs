use super::*;
use crate::digest::Digest;
use crate::error::PluckError;
use sha2::{Digest as Sha2Digest, Sha256};
use std::str::FromStr;

fn hub_client(server: &mockito::Server, credentials: Credentials) -> HubClient {
    HubClient::with_endpoints(
        &server.url(),
        &format!("{}/token", server.url()),
        &format!("{}/v2/users/login/", server.url()),
        credentials,
        ClientConfig::default(),
    )
    .unwrap()
}

async fn token_mock(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "hub-token"}"#)
        .create_async()
        .await
}

fn layer_for(body: &[u8]) -> LayerDescriptor {
    let mut hasher = Sha256::new();
    hasher.update(body);
    LayerDescriptor {
        media_type: "application/vnd.docker.image.rootfs.diff.tar.gzip".to_string(),
        size: body.len() as u64,
        digest: Digest::from_str(&format!("sha256:{:x}", hasher.finalize())).unwrap(),
    }
}

#[tokio::test]
async fn test_get_manifest_uses_negotiated_token() {
    let mut server = mockito::Server::new_async().await;
    let token = token_mock(&mut server).await;
    let manifest = server
        .mock("GET", "/v2/library/nginx/manifests/latest")
        .match_header("authorization", "Bearer hub-token")
        .match_header(
            "accept",
            "application/vnd.docker.distribution.manifest.v2+json",
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"schemaVersion": 2, "layers": [{{"size": 5, "digest": "sha256:{}"}}]}}"#,
            "a".repeat(64)
        ))
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let result = client.get_manifest(&reference).await.unwrap();

    assert_eq!(result.schema_version, 2);
    assert_eq!(result.layers.len(), 1);
    token.assert_async().await;
    manifest.assert_async().await;
}

#[tokio::test]
async fn test_get_manifest_unauthorized_is_auth_required() {
    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _manifest = server
        .mock("GET", "/v2/org/private/manifests/latest")
        .with_status(401)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("org/private").unwrap();
    let err = client.get_manifest(&reference).await.unwrap_err();

    assert!(matches!(err, PluckError::AuthRequired { .. }));
    assert!(err.to_string().contains("index.docker.io"));
}

#[tokio::test]
async fn test_get_manifest_missing_image_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _manifest = server
        .mock("GET", "/v2/library/nosuch/manifests/latest")
        .with_status(404)
        .with_body(r#"{"errors": [{"code": "MANIFEST_UNKNOWN"}]}"#)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nosuch").unwrap();
    let err = client.get_manifest(&reference).await.unwrap_err();

    assert!(matches!(err, PluckError::NotFound { .. }));
    assert!(err.to_string().contains("image not found"));
    assert!(err.to_string().contains("library/nosuch:latest"));
}

#[tokio::test]
async fn test_get_manifest_invalid_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _manifest = server
        .mock("GET", "/v2/library/nginx/manifests/latest")
        .with_status(200)
        .with_body("<html>not a manifest</html>")
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let err = client.get_manifest(&reference).await.unwrap_err();

    assert!(matches!(err, PluckError::ManifestParse { .. }));
}

#[tokio::test]
async fn test_get_manifest_server_error_carries_status() {
    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _manifest = server
        .mock("GET", "/v2/library/nginx/manifests/latest")
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let err = client.get_manifest(&reference).await.unwrap_err();

    assert!(matches!(err, PluckError::Registry { status: 503, .. }));
}

#[tokio::test]
async fn test_pull_layer_streams_verified_bytes() {
    let body = b"layer bytes that stand in for a tarball".to_vec();
    let layer = layer_for(&body);

    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let blob = server
        .mock(
            "GET",
            format!("/v2/library/nginx/blobs/{}", layer.digest).as_str(),
        )
        .match_header("authorization", "Bearer hub-token")
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let mut sink: Vec<u8> = Vec::new();
    let written = client
        .pull_layer(&reference, &layer, &mut sink)
        .await
        .unwrap();

    assert_eq!(written, body.len() as u64);
    assert_eq!(sink, body);
    blob.assert_async().await;
}

#[tokio::test]
async fn test_pull_layer_declared_length_mismatch_writes_nothing() {
    let body = vec![7u8; 100];
    let mut layer = layer_for(&body);
    // Manifest claims more bytes than the endpoint will declare.
    layer.size = 120;

    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _blob = server
        .mock(
            "GET",
            format!("/v2/library/nginx/blobs/{}", layer.digest).as_str(),
        )
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let mut sink: Vec<u8> = Vec::new();
    let err = client
        .pull_layer(&reference, &layer, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, PluckError::Integrity { .. }));
    assert!(err.to_string().contains("declared content length 100"));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_pull_layer_digest_mismatch_detected() {
    let body = b"actual layer content".to_vec();
    let mut layer = layer_for(&body);
    layer.digest = Digest::from_str(&format!("sha256:{}", "f".repeat(64))).unwrap();

    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _blob = server
        .mock(
            "GET",
            format!("/v2/library/nginx/blobs/{}", layer.digest).as_str(),
        )
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let mut sink: Vec<u8> = Vec::new();
    let err = client
        .pull_layer(&reference, &layer, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, PluckError::Integrity { .. }));
    assert!(err.to_string().contains("digest mismatch"));
}

#[tokio::test]
async fn test_pull_layer_missing_blob_is_not_found() {
    let layer = layer_for(b"whatever");

    let mut server = mockito::Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _blob = server
        .mock(
            "GET",
            format!("/v2/library/nginx/blobs/{}", layer.digest).as_str(),
        )
        .with_status(404)
        .create_async()
        .await;

    let client = hub_client(&server, Credentials::anonymous());
    let reference = ImageReference::parse("nginx").unwrap();
    let mut sink: Vec<u8> = Vec::new();
    let err = client
        .pull_layer(&reference, &layer, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, PluckError::NotFound { .. }));
    assert!(err.to_string().contains("layer blob not found"));
}
