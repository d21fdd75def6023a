/// Read the response body as text, logging its size against the endpoint it came from.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    endpoint: &str,
    page: u32,
) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;
    tracing::trace!(endpoint, page, bytes = text.len(), "response body read");
    Ok(text)
}
