use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use super::ChatMessage;
use super::Dispatcher;
use super::CONSOLE_CHANNEL;

/// Feed stdin lines to `dispatcher` until stdin closes.
///
/// Every message is handled on its own task, so a slow hand never holds up
/// the next command.
pub async fn serve(dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let user = std::env::var("USER").unwrap_or("console".to_string());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("Console started. Type `<channel>: <message>`, or just a message for channel {}.", CONSOLE_CHANNEL);
    while let Some(line) = lines.next_line().await? {
        let message = match ChatMessage::from_console_line(&user, &line) {
            Some(message) => message,
            None => continue
        };
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.dispatch(message).await;
        });
    }
    info!("Console closed.");
    Ok(())
}
