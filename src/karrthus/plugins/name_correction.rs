// ============================================================
// name_correction
// ------------------------------------------------------------
//! Anyone who misspells the bot's name gets corrected.
// ============================================================

use crate::karrthus::Context;
use crate::karrthus::Dispatcher;
use crate::karrthus::i18n;

set_configuration! {
    /// Matched case-insensitively anywhere in a message.
    misspelling: String = "karthus".to_string()
}

pub fn init(dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    load_configuration()?;
    register_handlers(dispatcher);
    Ok(())
}

fn is_misspelled(text: &str) -> bool {
    let misspelling = get_configuration().misspelling.to_lowercase();
    !misspelling.is_empty() && text.to_lowercase().contains(&misspelling)
}

fn register_handlers(dispatcher: &mut Dispatcher) {
    dispatcher.register_filter("name_correction", |context| Box::pin(correct(context)));
}

async fn correct(context: &Context) -> anyhow::Result<()> {
    if !is_misspelled(&context.message.text) { return Ok(()); }
    context.reply(&i18n::render("{name_correction}", &[])).await?;
    info!("{} in {} spelled my name wrong and got corrected.", context.message.user, context.message.channel);
    Ok(())
}
