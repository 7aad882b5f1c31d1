use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::mtg::HandBuilder;

use super::ChatMessage;
use super::ChatSink;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

type Command = Box<dyn for<'a> Fn(&'a Context, &'a [String]) -> HandlerFuture<'a> + Send + Sync>;
type Filter = Box<dyn for<'a> Fn(&'a Context) -> HandlerFuture<'a> + Send + Sync>;

/// What a handler gets to work with for one message.
pub struct Context {
    pub message: ChatMessage,
    pub sink: Arc<dyn ChatSink>,
    pub hand_builder: Arc<HandBuilder>
}

impl Context {
    pub async fn reply(&self, text: &str) -> anyhow::Result<()> {
        self.sink.send_message(&self.message.channel, text).await
    }

    pub async fn upload(&self, file: &Path, text: &str) -> anyhow::Result<()> {
        self.sink.upload_file(&self.message.channel, file, text).await
    }
}

/// Routes chat messages to filters and commands.
///
/// Filters see every message. Commands only see messages starting with the
/// prefix, split on whitespace: the first word picks the command, the rest
/// are its arguments.
pub struct Dispatcher {
    prefix: String,
    commands: HashMap<&'static str, Command>,
    filters: Vec<(&'static str, Filter)>,
    sink: Arc<dyn ChatSink>,
    hand_builder: Arc<HandBuilder>
}

impl Dispatcher {
    pub fn new(prefix: impl Into<String>, sink: Arc<dyn ChatSink>, hand_builder: Arc<HandBuilder>) -> Dispatcher {
        Dispatcher { prefix: prefix.into(), commands: HashMap::new(), filters: Vec::new(), sink, hand_builder }
    }

    pub fn register_command<F>(&mut self, name: &'static str, execution: F)
        where F: for<'a> Fn(&'a Context, &'a [String]) -> HandlerFuture<'a> + Send + Sync + 'static {
        if self.commands.insert(name, Box::new(execution)).is_some() {
            warn!("Command {} registered twice, the last one wins.", name);
        }
    }

    pub fn register_filter<F>(&mut self, name: &'static str, execution: F)
        where F: for<'a> Fn(&'a Context) -> HandlerFuture<'a> + Send + Sync + 'static {
        self.filters.push((name, Box::new(execution)));
    }

    /// Command name and arguments, if `text` is a command at all.
    pub fn parse_command(&self, text: &str) -> Option<(String, Vec<String>)> {
        let mut words = text.strip_prefix(self.prefix.as_str())?.split_whitespace();
        let name = words.next()?.to_string();
        Some((name, words.map(|word| word.to_string()).collect()))
    }

    /// Handle one message. Failures are logged and stay within this message.
    pub async fn dispatch(&self, message: ChatMessage) {
        let context = Context { message, sink: self.sink.clone(), hand_builder: self.hand_builder.clone() };
        for (name, filter) in self.filters.iter() {
            if let Err(e) = filter(&context).await {
                warn!("Filter {} failed on message from {} in {}: {:?}", name, context.message.user, context.message.channel, e);
            }
        }
        let (name, arguments) = match self.parse_command(&context.message.text) {
            Some(command) => command,
            None => return
        };
        match self.commands.get(name.as_str()) {
            Some(command) => {
                debug!("{} in {} runs {} {:?}", context.message.user, context.message.channel, name, arguments);
                if let Err(e) = command(&context, &arguments[..]).await {
                    warn!("Command {} from {} in {} failed: {:?}", name, context.message.user, context.message.channel, e);
                }
            },
            None => trace!("No command named {}", name)
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::path::Path;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Dispatcher;
    use crate::karrthus::ChatMessage;
    use crate::karrthus::ChatSink;
    use crate::mtg::HandBuilder;
    use crate::mtg::testing::StubCards;
    use crate::mtg::testing::StubDecks;
    use crate::mtg::testing::scratch_configuration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Reply {
        Message(String, String),
        Upload(String, PathBuf, String)
    }

    /// Remembers everything sent back.
    #[derive(Default)]
    pub struct RecordingSink {
        pub replies: Mutex<Vec<Reply>>
    }

    impl RecordingSink {
        pub fn replies(&self) -> Vec<Reply> {
            self.replies.lock().clone()
        }
    }

    #[async_trait]
    impl ChatSink for RecordingSink {
        async fn send_message(&self, channel: &str, message: &str) -> anyhow::Result<()> {
            self.replies.lock().push(Reply::Message(channel.to_string(), message.to_string()));
            Ok(())
        }

        async fn upload_file(&self, channel: &str, file: &Path, message: &str) -> anyhow::Result<()> {
            self.replies.lock().push(Reply::Upload(channel.to_string(), file.to_path_buf(), message.to_string()));
            Ok(())
        }
    }

    pub fn stub_dispatcher(directory: &Path, decks: StubDecks, cards: StubCards) -> (Dispatcher, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let builder = HandBuilder::new(scratch_configuration(directory), Arc::new(decks), Arc::new(cards), StdRng::seed_from_u64(1));
        (Dispatcher::new("!", sink.clone(), Arc::new(builder)), sink)
    }

    #[test]
    fn test_parse_command() {
        let directory = tempfile::tempdir().unwrap();
        let (dispatcher, _) = stub_dispatcher(directory.path(), StubDecks::default(), StubCards::default());
        assert_eq!(dispatcher.parse_command("!hand 123  5"), Some(("hand".to_string(), vec!["123".to_string(), "5".to_string()])));
        assert_eq!(dispatcher.parse_command("!pulse"), Some(("pulse".to_string(), vec![])));
        assert_eq!(dispatcher.parse_command("hand 123"), None);
        assert_eq!(dispatcher.parse_command("!"), None);
    }

    #[tokio::test]
    async fn test_dispatch() {
        let directory = tempfile::tempdir().unwrap();
        let (mut dispatcher, sink) = stub_dispatcher(directory.path(), StubDecks::default(), StubCards::default());
        dispatcher.register_command("echo", |context, arguments| Box::pin(async move {
            context.reply(&arguments.join(" ")).await
        }));
        dispatcher.register_command("fail", |_, _| Box::pin(async move { Err(anyhow!("broken")) }));
        dispatcher.register_filter("shout", |context| Box::pin(async move {
            if context.message.text.ends_with("!!") { context.reply("calm down").await?; }
            Ok(())
        }));

        dispatcher.dispatch(ChatMessage::new("me", "1", "!echo a  b")).await;
        dispatcher.dispatch(ChatMessage::new("me", "2", "!fail")).await;
        dispatcher.dispatch(ChatMessage::new("me", "3", "!unknown")).await;
        dispatcher.dispatch(ChatMessage::new("me", "4", "hello!!")).await;
        assert_eq!(sink.replies(), vec![
            Reply::Message("1".to_string(), "a b".to_string()),
            Reply::Message("4".to_string(), "calm down".to_string())
        ]);
    }
}
