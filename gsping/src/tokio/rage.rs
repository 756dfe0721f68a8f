use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::AsyncPingable;
use crate::{
    Error, Rage, RageInfo, RageResponse,
    rage::{INFO_PATH, PLAYERS_PATH, ensure_json},
};

impl AsyncPingable for Rage {
    type Response = RageResponse;

    /// Fetches both documents one after the other. Latency is not measured
    /// for this protocol and is always 0.
    async fn ping(self) -> Result<(u64, Self::Response), Error> {
        let info: RageInfo = fetch_document(&self, INFO_PATH).await?;
        let players: serde_json::Value = fetch_document(&self, PLAYERS_PATH).await?;
        Ok((0, RageResponse::extract(info, &players)))
    }
}

async fn fetch_document<T: DeserializeOwned>(rage: &Rage, path: &str) -> Result<T, Error> {
    let url = rage.url(path)?;
    let res = rage
        .client
        .get(&url)
        .header(CACHE_CONTROL, "no-cache")
        .header(ACCEPT, "application/json")
        .send()
        .await?;
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if let Err(error) = ensure_json(res.status().as_u16(), content_type) {
        debug!(%url, %error, "Rejected status document");
        return Err(error);
    }
    let body = res.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
