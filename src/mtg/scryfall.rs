use async_trait::async_trait;
use serde::Deserialize;

use super::CardSource;
use super::HandError;
use super::error::Result;

/// Card lookups against a Scryfall style `cards/named` endpoint.
pub struct ScryfallClient {
    client: reqwest::Client,
    endpoint: String
}

#[derive(Deserialize, Debug)]
struct CardResponse {
    object: String,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    image_uris: Option<ImageUris>,
    #[serde(default)]
    card_faces: Vec<CardFace>
}

#[derive(Deserialize, Debug)]
struct CardFace {
    #[serde(default)]
    image_uris: Option<ImageUris>
}

#[derive(Deserialize, Debug)]
struct ImageUris {
    normal: String
}

impl ScryfallClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> ScryfallClient {
        ScryfallClient { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl CardSource for ScryfallClient {
    async fn image_url(&self, name: &str) -> Result<String> {
        let transfer_failed = |e: reqwest::Error| HandError::DownloadFailed { name: name.to_string(), reason: format!("card lookup failed: {}", e) };
        // Not found answers come with a 404, but the body still tells why.
        let response = self.client.get(&self.endpoint).query(&[("exact", name)]).send().await.map_err(transfer_failed)?;
        let body = response.text().await.map_err(transfer_failed)?;
        parse_card_response(name, &body)
    }

    async fn download(&self, name: &str, url: &str) -> Result<Vec<u8>> {
        let download_failed = |e: reqwest::Error| HandError::DownloadFailed { name: name.to_string(), reason: e.to_string() };
        let response = self.client.get(url).send().await.map_err(download_failed)?;
        let response = response.error_for_status().map_err(download_failed)?;
        Ok(response.bytes().await.map_err(download_failed)?.to_vec())
    }
}

fn parse_card_response(name: &str, body: &str) -> Result<String> {
    let card: CardResponse = serde_json::from_str(body).map_err(|e| HandError::CardLookupMalformed {
        name: name.to_string(),
        reason: e.to_string()
    })?;
    if card.object == "error" {
        return Err(HandError::CardNotFound {
            name: name.to_string(),
            details: card.details.unwrap_or_else(|| "no details given".to_string())
        });
    }
    // Double faced cards carry images per face only.
    card.image_uris
        .or_else(|| card.card_faces.into_iter().find_map(|face| face.image_uris))
        .map(|uris| uris.normal)
        .ok_or_else(|| HandError::CardLookupMalformed { name: name.to_string(), reason: "no normal image in card data".to_string() })
}
