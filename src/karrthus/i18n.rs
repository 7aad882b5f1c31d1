use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::karrthus::plugins;

pub static LIBRARY: OnceCell<HashMap<String, String>> = OnceCell::new();

fn default_library() -> HashMap<String, String> {
    [
        ("hand_syntax",     "Syntax: !hand N n, where N is the decklist number of an MTGGoldfish deck, and n is {max_hand_size} or less."),
        ("hand_caption",    "A {hand_size} card hand from <{deck_page}{deck}> :"),
        ("deck_not_found",  "You requested a hand from {deck_page}{deck}, but that does not seem to lead to a decklist."),
        ("hand_failed",     "I could not build that hand. {reason}"),
        ("name_correction", "It's Karrthus."),
        ("pulse",           "1x Maelstrom Pulse")
    ].iter().map(|(word, context)| (format!("{{{}}}", word), context.to_string())).collect()
}

/// Load `i18n` configuration on top of the built-in English texts.
pub fn init() -> anyhow::Result<()> {
    info!("Loading i18n library...");
    let library_from_file = plugins::load_configuration::<HashMap<String, String>>("i18n")?;
    let mut library = default_library();
    for (word, context) in library_from_file.into_iter() {
        library.insert(format!("{{{}}}", word), context);
    }
    LIBRARY.set(library).map_err(|_| anyhow!("i18n library already set."))?;
    Ok(())
}

/// Replace every `{word}` of `template` from the library, then every
/// `{name}` from `arguments`.
pub fn render(template: &str, arguments: &[(&str, String)]) -> String {
    let library = LIBRARY.get_or_init(default_library);
    let mut answer_string = template.to_string();
    for (word, context) in library.iter() {
        answer_string = answer_string.replace(word, context);
    }
    for (name, value) in arguments.iter() {
        answer_string = answer_string.replace(&format!("{{{}}}", name), value);
    }
    answer_string
}
