//! Shared HTTP plumbing for the JSON sinks.

use serde::Serialize;

use crate::telemetry::error::SinkError;

/// POST `body` as JSON and return the response text on a 2xx status.
pub(crate) async fn post_json<T>(
    client: &reqwest::Client,
    endpoint: &str,
    body: &T,
) -> Result<String, SinkError>
where
    T: Serialize + ?Sized,
{
    let response = client.post(endpoint).json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(SinkError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}
