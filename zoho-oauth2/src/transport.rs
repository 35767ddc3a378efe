//! Default HTTP transport
//!
//! [`crate::client::OAuthClient`] accepts any [`oauth2::AsyncHttpClient`].
//! [`async_http_client`] is the reqwest-backed one for applications that do
//! not bring their own.

use http::{HeaderMap, StatusCode};
use oauth2::{HttpRequest, HttpResponse};
use tracing::debug;

/// Errors raised by [`async_http_client`]
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// Request could not be built or sent, or the body could not be read
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Response could not be rebuilt as an `http::Response`
    #[error("Invalid HTTP response: {0}")]
    Http(#[from] http::Error),
}

/// Send a token or profile request to Zoho Accounts
///
/// Redirects are never followed. The response body is buffered in full.
///
/// # Errors
///
/// Returns [`HttpClientError`] if the request cannot be sent or the
/// response cannot be read
pub async fn async_http_client(request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
    let client = no_redirect_client()?;
    let request = to_reqwest(&client, request)?;

    debug!(method = %request.method(), url = %request.url(), "sending request to Zoho");

    let response = client.execute(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    debug!(%status, bytes = body.len(), "received response from Zoho");

    to_http_response(status, headers, body)
}

fn no_redirect_client() -> Result<reqwest::Client, HttpClientError> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?)
}

fn to_reqwest(
    client: &reqwest::Client,
    request: HttpRequest,
) -> Result<reqwest::Request, HttpClientError> {
    let (parts, body) = request.into_parts();

    Ok(client
        .request(parts.method, parts.uri.to_string())
        .headers(parts.headers)
        .body(body)
        .build()?)
}

fn to_http_response(
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
) -> Result<HttpResponse, HttpClientError> {
    let mut response = http::Response::builder().status(status).body(body)?;
    *response.headers_mut() = headers;
    Ok(response)
}
