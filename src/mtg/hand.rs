use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use super::CardSource;
use super::Decklist;
use super::DeckSource;
use super::GoldfishClient;
use super::HandError;
use super::ImageCache;
use super::ScryfallClient;
use super::compositor;
use super::error::Result;
use super::resolver;
use super::sampler;

/// Everything the hand pipeline needs to know about the outer world.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HandConfiguration {
    /// Deck id is appended to this to download a decklist.
    pub decklist_endpoint: String,
    /// Deck id is appended to this to link the deck page.
    pub deck_page: String,
    /// Exact name lookup of a card.
    pub card_lookup_endpoint: String,
    pub image_directory: PathBuf,
    pub hand_directory: PathBuf,
    pub default_hand_size: usize,
    pub max_hand_size: usize,
    /// Maindecks smaller than this get a warning.
    pub minimum_deck_size: usize,
    /// Seconds. `0` waits forever.
    pub request_timeout: u64,
    pub user_agent: String
}

impl Default for HandConfiguration {
    fn default() -> Self {
        Self {
            decklist_endpoint   : "https://www.mtggoldfish.com/deck/download/".to_string(),
            deck_page           : "https://www.mtggoldfish.com/deck/".to_string(),
            card_lookup_endpoint: "https://api.scryfall.com/cards/named".to_string(),
            image_directory     : PathBuf::from("./images"),
            hand_directory      : PathBuf::from("./hands"),
            default_hand_size   : 7,
            max_hand_size       : 7,
            minimum_deck_size   : 60,
            request_timeout     : 30,
            user_agent          : format!("karrthus/{}", env!("CARGO_PKG_VERSION"))
        }
    }
}

/// A stitched hand, ready to upload.
#[derive(Debug, Clone)]
pub struct CompositeHand {
    pub path: PathBuf,
    /// Card names in drawn position order.
    pub cards: Vec<String>,
    /// Set when the maindeck looked too small but a hand could still be drawn.
    pub warning: Option<HandError>
}

pub struct HandBuilder {
    configuration: HandConfiguration,
    decks: Arc<dyn DeckSource>,
    images: ImageCache,
    rng: Mutex<StdRng>
}

impl HandBuilder {
    pub fn new(configuration: HandConfiguration, decks: Arc<dyn DeckSource>, cards: Arc<dyn CardSource>, rng: StdRng) -> HandBuilder {
        let images = ImageCache::new(configuration.image_directory.clone(), cards);
        HandBuilder { configuration, decks, images, rng: Mutex::new(rng) }
    }

    /// Builder talking to the configured remote services.
    pub fn from_configuration(configuration: &HandConfiguration) -> anyhow::Result<HandBuilder> {
        let mut client = reqwest::Client::builder().user_agent(configuration.user_agent.clone());
        if configuration.request_timeout > 0 {
            client = client.timeout(Duration::from_secs(configuration.request_timeout));
        }
        let client = client.build()?;
        let decks = Arc::new(GoldfishClient::new(client.clone(), configuration.decklist_endpoint.clone()));
        let cards = Arc::new(ScryfallClient::new(client, configuration.card_lookup_endpoint.clone()));
        Ok(HandBuilder::new(configuration.clone(), decks, cards, StdRng::from_entropy()))
    }

    pub fn configuration(&self) -> &HandConfiguration {
        &self.configuration
    }

    /// Where the hand for `channel` is written. Each channel overwrites its own file.
    pub fn hand_path(&self, channel: &str) -> PathBuf {
        self.configuration.hand_directory.join(format!("{}.png", urlencoding::encode(channel)))
    }

    /// Draw `hand_size` cards from deck `deck` and stitch their images for `channel`.
    pub async fn build_hand(&self, deck: &str, hand_size: usize, channel: &str) -> Result<CompositeHand> {
        check_deck_id(deck)?;
        if hand_size == 0 || hand_size > self.configuration.max_hand_size {
            return Err(HandError::InvalidRequest(format!("hand size must be between 1 and {}", self.configuration.max_hand_size)));
        }

        let decklist = Decklist::parse(&self.decks.fetch_decklist(deck).await?);
        let warning = if decklist.is_plausible(self.configuration.minimum_deck_size) { None } else {
            warn!("Deck {} has a maindeck with only {} cards.", deck, decklist.total_count());
            Some(HandError::DecklistMalformed { deck: deck.to_string(), total: decklist.total_count() })
        };

        let positions = {
            let mut rng = self.rng.lock();
            sampler::sample(&mut *rng, decklist.total_count(), hand_size)?
        };
        let cards = resolver::resolve(&decklist, &positions)?;
        debug!("Deck {} drew {:?} at {:?}", deck, cards, positions);

        let images = self.images.resolve_all(&cards).await?;
        let path = compositor::compose(images, self.hand_path(channel)).await?;
        Ok(CompositeHand { path, cards, warning })
    }
}

/// Deck ids are numbers. Anything else could make us fetch arbitrary urls.
fn check_deck_id(deck: &str) -> Result<()> {
    if deck.is_empty() || !deck.chars().all(|c| c.is_ascii_digit()) {
        return Err(HandError::InvalidRequest(format!("deck id {:?} is not a number", deck)));
    }
    Ok(())
}
