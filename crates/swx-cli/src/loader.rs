//! Local-first loading of configured spec files.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{error, info, warn};
use reqwest::Client;
use swx_core::config::{RemoteSource, SwaggerSource};

/// HTTP client used to download remote specs.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to create HTTP client")
}

/// Read the Swagger document at `local`, downloading it from
/// `source.remote` when the file is not available. A downloaded document is
/// saved to `local`.
pub async fn read_source(client: &Client, source: &SwaggerSource, local: &Path) -> Result<String> {
    let local_err = match tokio::fs::read_to_string(local).await {
        Ok(content) => return Ok(content),
        Err(err) => err,
    };
    let Some(remote) = &source.remote else {
        return Err(local_err).with_context(|| {
            format!(
                "failed to read {} and no remote is configured",
                local.display()
            )
        });
    };

    warn!(
        "{}: {} is not available ({local_err}), fetching {}",
        source.name,
        local.display(),
        remote.url
    );
    let content = fetch_remote(client, remote).await?;
    match save(local, &content).await {
        Ok(()) => info!("{}: saved {}", source.name, local.display()),
        Err(err) => error!("{}: spec couldn't be saved: {err:#}", source.name),
    }
    Ok(content)
}

async fn fetch_remote(client: &Client, remote: &RemoteSource) -> Result<String> {
    let mut request = client.get(&remote.url);
    if let Some(username) = &remote.username {
        request = request.basic_auth(username, remote.password.as_deref());
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", remote.url))?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {status} when fetching {}", remote.url);
    }

    response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {}", remote.url))
}

async fn save(local: &Path, content: &str) -> Result<()> {
    if let Some(parent) = local.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(local, content)
        .await
        .with_context(|| format!("failed to write {}", local.display()))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const SPEC: &str = r#"{"swagger": "2.0", "paths": {}}"#;

    fn source(remote: Option<RemoteSource>) -> SwaggerSource {
        SwaggerSource {
            name: "petstore".to_string(),
            file: "specs/swagger.json".to_string(),
            overrides: None,
            remote,
        }
    }

    fn remote(url: String) -> RemoteSource {
        RemoteSource {
            url,
            username: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_local_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("swagger.json");
        std::fs::write(&local, SPEC).unwrap();

        // never contacted
        let source = source(Some(remote("http://127.0.0.1:9/swagger.json".to_string())));
        let content = read_source(&http_client().unwrap(), &source, &local)
            .await
            .unwrap();
        assert_eq!(content, SPEC);
    }

    #[tokio::test]
    async fn test_missing_local_without_remote() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("swagger.json");

        let err = read_source(&http_client().unwrap(), &source(None), &local)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no remote is configured"), "{err}");
        assert!(!local.exists());
    }

    #[tokio::test]
    async fn test_remote_fallback_is_saved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/swagger.json"))
            .and(header("authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPEC))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("specs/swagger.json");
        let source = source(Some(RemoteSource {
            url: format!("{}/v2/swagger.json", server.uri()),
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
        }));

        let content = read_source(&http_client().unwrap(), &source, &local)
            .await
            .unwrap();
        assert_eq!(content, SPEC);
        assert_eq!(std::fs::read_to_string(&local).unwrap(), SPEC);
    }

    #[tokio::test]
    async fn test_remote_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("swagger.json");
        let source = source(Some(remote(format!("{}/missing.json", server.uri()))));

        let err = read_source(&http_client().unwrap(), &source, &local)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 404"), "{err}");
        assert!(!local.exists());
    }
}
