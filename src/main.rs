#[macro_use] extern crate thiserror;
#[macro_use] extern crate anyhow;
#[macro_use] extern crate log;
extern crate pretty_env_logger;

pub mod mtg;
#[macro_use] pub mod karrthus;

use std::sync::Arc;

use crate::karrthus::ConsoleSink;
use crate::karrthus::Dispatcher;
use crate::karrthus::i18n;
use crate::mtg::HandBuilder;

#[tokio::main]
async fn main() {
    init();
    let dispatcher = register();
    start(dispatcher).await;
}

fn init() {
    pretty_env_logger::init();
    crate::karrthus::load_configuration().expect("Failed to load karrthus configuration.");
    i18n::init().expect("Failed to load i18n");
}

fn register() -> Arc<Dispatcher> {
    let configuration = karrthus::get_configuration();
    let hand_builder = HandBuilder::from_configuration(&configuration.hand).expect("Failed to build http client");
    let mut dispatcher = Dispatcher::new(configuration.command_prefix.clone(), Arc::new(ConsoleSink), Arc::new(hand_builder));
    crate::karrthus::plugins::init(&mut dispatcher, &configuration.plugins).expect("Init plugins failed");
    Arc::new(dispatcher)
}

async fn start(dispatcher: Arc<Dispatcher>) {
    if let Err(e) = karrthus::server::serve(dispatcher).await {
        error!("Console transport stopped: {:?}", e);
    }
    info!("Karrthus is going down.");
}
