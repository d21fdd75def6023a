use url::Url;

use crate::core::{
    FeedClient, FeedError, RawRow,
    client::retry::retry,
    net,
};
use crate::hsx::wire::{self, GridEnvelope};

pub(super) fn page_url(client: &FeedClient, page: u32) -> Url {
    let cfg = client.config();
    let mut url = cfg.hsx_url.clone();
    url.query_pairs_mut()
        .append_pair("_search", "false")
        .append_pair("rows", &cfg.hsx_page_size.to_string())
        .append_pair("page", &page.to_string())
        .append_pair("sidx", "id")
        .append_pair("sord", "desc");
    url
}

async fn get_body(client: &FeedClient, url: &Url, page: u32) -> Result<String, FeedError> {
    let resp = client.http().get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(FeedError::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(net::get_text(resp, "hsx", page).await?)
}

pub(super) fn decode_page(body: &str) -> Result<Vec<RawRow>, FeedError> {
    let env: GridEnvelope = serde_json::from_str(body)
        .map_err(|e| FeedError::Protocol(format!("json parse error: {e}")))?;
    let rows = env
        .rows
        .ok_or_else(|| FeedError::Protocol("missing `rows` array".into()))?;

    Ok(rows
        .into_iter()
        .map(|r| RawRow {
            cells: r
                .cell
                .unwrap_or_default()
                .into_iter()
                .map(wire::cell_text)
                .collect(),
        })
        .collect())
}

pub(super) async fn fetch_page(client: &FeedClient, page: u32) -> Result<Vec<RawRow>, FeedError> {
    let url = page_url(client, page);
    let body = retry(&client.config().retry, "hsx_page", |_| get_body(client, &url, page)).await?;

    match decode_page(&body) {
        Ok(rows) => {
            tracing::debug!(page, rows = rows.len(), "hsx page fetched");
            Ok(rows)
        }
        // An unreadable page is indistinguishable from the end of the list.
        Err(e @ FeedError::Protocol(_)) => {
            tracing::warn!(page, error = %e, "hsx page treated as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

pub(super) async fn fetch_all(client: &FeedClient) -> Result<Vec<RawRow>, FeedError> {
    let mut all = Vec::new();
    for page in 1..=client.config().max_pages {
        let rows = fetch_page(client, page).await?;
        if rows.is_empty() {
            break;
        }
        all.extend(rows);
    }
    Ok(all)
}
