use async_trait::async_trait;

use super::HandError;
use super::error::Result;

/// Where plain text decklists come from.
#[async_trait]
pub trait DeckSource: Send + Sync {
    async fn fetch_decklist(&self, deck: &str) -> Result<String>;
}

/// Decklist downloads from an MTGGoldfish style `deck/download/<id>` endpoint.
pub struct GoldfishClient {
    client: reqwest::Client,
    endpoint: String
}

impl GoldfishClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> GoldfishClient {
        GoldfishClient { client, endpoint: endpoint.into() }
    }

    pub fn decklist_url(&self, deck: &str) -> String {
        format!("{}{}", self.endpoint, deck)
    }
}

#[async_trait]
impl DeckSource for GoldfishClient {
    async fn fetch_decklist(&self, deck: &str) -> Result<String> {
        let unavailable = |reason: String| HandError::DecklistUnavailable { deck: deck.to_string(), reason };
        let response = self.client.get(self.decklist_url(deck)).send().await.map_err(|e| unavailable(e.to_string()))?;
        debug!("Decklist {} answered with {}", deck, response.status());
        if response.status() != reqwest::StatusCode::OK {
            return Err(unavailable(format!("status {}", response.status())));
        }
        response.text().await.map_err(|e| unavailable(e.to_string()))
    }
}
