/// Errors happen on building a hand.
///
/// Every variant owns its detail text so a single failure can be handed to
/// every requester waiting on the same card.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Deck {deck} does not lead to a decklist: {reason}")]
    DecklistUnavailable { deck: String, reason: String },
    /// Only a warning. A hand can still be drawn as long as the deck is big enough.
    #[error("Deck {deck} has a maindeck with only {total} cards.")]
    DecklistMalformed { deck: String, total: usize },
    #[error("Card data service reported for {name}: {details}")]
    CardNotFound { name: String, details: String },
    #[error("Card data for {name} could not be parsed: {reason}")]
    CardLookupMalformed { name: String, reason: String },
    #[error("Image download for {name} was unsuccessful: {reason}")]
    DownloadFailed { name: String, reason: String },
    #[error("Failed to stitch the hand together: {0}")]
    CompositionFailed(String),
}

pub type Result<T> = std::result::Result<T, HandError>;
