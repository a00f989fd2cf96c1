use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::info;

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { background: #0D0D0D; color: #00F5FF; font-family: monospace;
           display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0; }
    .card { text-align: center; border: 1px solid #9B5DE5; padding: 40px; border-radius: 12px; }
    h1 { color: #9B5DE5; }
    p { color: #aaa; }
  </style>
</head>
<body>
  <div class="card">
    <h1>🎵 moodlist</h1>
    <p>Logged in to Spotify. You can close this tab.</p>
  </div>
</body>
</html>"#;

/// `host:port` the redirect listener binds to, taken from the configured redirect URI.
pub fn listen_addr(redirect_uri: &str) -> Result<String> {
    let rest = redirect_uri
        .strip_prefix("http://")
        .context("Redirect URI must be a plain http:// loopback address")?;
    let authority = rest.split('/').next().unwrap_or_default();
    if !authority.contains(':') {
        bail!("Redirect URI {redirect_uri} has no port");
    }
    Ok(authority.to_string())
}

/// Extracts `?code=...` from the first line of a raw HTTP request.
/// The `state` parameter must echo the one sent in the authorize URL.
pub fn parse_redirect(request: &str, expected_state: &str) -> Result<String> {
    // GET /login?code=...&state=... HTTP/1.1
    let query = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split_once('?').map(|(_, q)| q))
        .unwrap_or("");

    let params: HashMap<&str, &str> = query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .collect();

    if params.get("state").copied() != Some(expected_state) {
        bail!("OAuth state mismatch in redirect");
    }
    if let Some(err) = params.get("error") {
        bail!("Spotify authorization was refused: {err}");
    }
    let code = params.get("code").context("No code in redirect")?;
    Ok(code.to_string())
}

/// Accepts one redirect from Spotify on the configured loopback address and returns the code.
pub async fn wait_for_auth_code(redirect_uri: &str, expected_state: &str) -> Result<String> {
    let addr = listen_addr(redirect_uri)?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr} for OAuth redirect"))?;

    info!("Waiting for Spotify auth redirect on {redirect_uri} ...");

    let (mut stream, _) = listener.accept().await?;
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let code = parse_redirect(&request, expected_state);

    let (status, body) = match &code {
        Ok(_) => ("200 OK", SUCCESS_PAGE.to_string()),
        Err(e) => ("400 Bad Request", format!("<html><body><p>{e}</p></body></html>")),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        assert_eq!(listen_addr("http://127.0.0.1:8989/login").unwrap(), "127.0.0.1:8989");
        assert_eq!(listen_addr("http://localhost:8501").unwrap(), "localhost:8501");
        assert!(listen_addr("https://example.com/callback").is_err());
        assert!(listen_addr("http://127.0.0.1/login").is_err());
    }

    #[test]
    fn test_parse_redirect_code() {
        let req = "GET /login?code=AQB123&state=xyz HTTP/1.1\r\nHost: 127.0.0.1:8989\r\n\r\n";
        assert_eq!(parse_redirect(req, "xyz").unwrap(), "AQB123");
    }

    #[test]
    fn test_parse_redirect_rejects_wrong_state() {
        let req = "GET /login?code=AQB123&state=forged HTTP/1.1\r\n\r\n";
        let err = parse_redirect(req, "xyz").unwrap_err();
        assert!(err.to_string().contains("state"));

        let req = "GET /login?code=AQB123 HTTP/1.1\r\n\r\n";
        assert!(parse_redirect(req, "xyz").is_err());
    }

    #[test]
    fn test_parse_redirect_denied() {
        let req = "GET /login?error=access_denied&state=xyz HTTP/1.1\r\n\r\n";
        let err = parse_redirect(req, "xyz").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_parse_redirect_without_query() {
        assert!(parse_redirect("GET /favicon.ico HTTP/1.1\r\n\r\n", "xyz").is_err());
        assert!(parse_redirect("", "xyz").is_err());
    }
}
