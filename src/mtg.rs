//! Sample hands of a constructed deck, drawn as one stitched image.
//!
//! decklist text -> [`Decklist`] -> [`sampler`] -> [`resolver`]
//! -> [`ImageCache`] -> [`compositor`]. [`HandBuilder`] runs the whole way.

pub mod error;
pub mod decklist;
pub mod sampler;
pub mod resolver;
pub mod image_cache;
pub mod compositor;
pub mod scryfall;
pub mod goldfish;
pub mod hand;
#[cfg(test)]
pub mod testing;

pub use error::HandError;
pub use decklist::*;
pub use sampler::HandPositions;
pub use image_cache::*;
pub use scryfall::ScryfallClient;
pub use goldfish::*;
pub use hand::*;
