// ============================================================
// hand
// ------------------------------------------------------------
//! `!hand N n`: draw a sample hand of `n` cards from MTGGoldfish
//! deck `N` and upload the card images stitched together.
//!
//! `n` is optional. Anything that isn't a number between 1 and
//! the configured maximum falls back to the default hand size.
// ============================================================

use crate::karrthus::Context;
use crate::karrthus::Dispatcher;
use crate::karrthus::i18n;
use crate::mtg::HandConfiguration;
use crate::mtg::HandError;

pub fn init(dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    register_handlers(dispatcher);
    Ok(())
}

/// Deck id and hand size, or `None` when the syntax help should be shown.
pub fn parse_arguments(arguments: &[String], configuration: &HandConfiguration) -> Option<(String, usize)> {
    let deck = arguments.first()?;
    if !deck.chars().all(|c| c.is_ascii_digit()) { return None; }
    let hand_size = arguments.get(1)
        .and_then(|size| size.parse::<usize>().ok())
        .filter(|size| (1..=configuration.max_hand_size).contains(size))
        .unwrap_or(configuration.default_hand_size);
    Some((deck.clone(), hand_size))
}

fn register_handlers(dispatcher: &mut Dispatcher) {
    dispatcher.register_command("hand", |context, arguments| Box::pin(draw_hand(context, arguments)));
}

async fn draw_hand(context: &Context, arguments: &[String]) -> anyhow::Result<()> {
    let configuration = context.hand_builder.configuration();
    let (deck, hand_size) = match parse_arguments(arguments, configuration) {
        Some(request) => request,
        None => return context.reply(&i18n::render("{hand_syntax}", &[("max_hand_size", configuration.max_hand_size.to_string())])).await
    };
    let user = &context.message.user;
    let channel = &context.message.channel;
    let page_arguments = [
        ("deck_page", configuration.deck_page.clone()),
        ("deck", deck.clone()),
        ("hand_size", hand_size.to_string())
    ];
    match context.hand_builder.build_hand(&deck, hand_size, channel).await {
        Ok(hand) => {
            if let Some(warning) = hand.warning.as_ref() {
                warn!("{} in {} requested {} cards from {}: {}", user, channel, hand_size, deck, warning);
            }
            info!("{} in {} successfully requested {} cards from {}", user, channel, hand_size, deck);
            context.upload(&hand.path, &i18n::render("{hand_caption}", &page_arguments)).await
        },
        Err(error @ HandError::DecklistUnavailable { .. }) => {
            info!("{} in {} asked about deck {}: {}", user, channel, deck, error);
            context.reply(&i18n::render("{deck_not_found}", &page_arguments)).await
        },
        Err(error) => {
            warn!("{} in {} requested {} cards from {} and failed: {}", user, channel, hand_size, deck, error);
            context.reply(&i18n::render("{hand_failed}", &[("reason", error.to_string())])).await
        }
    }
}
