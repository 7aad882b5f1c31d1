// ============================================================
// pulse
// ------------------------------------------------------------
//! `!pulse`: the right number of Maelstrom Pulse.
// ============================================================

use crate::karrthus::Dispatcher;
use crate::karrthus::i18n;

pub fn init(dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    register_handlers(dispatcher);
    Ok(())
}

fn register_handlers(dispatcher: &mut Dispatcher) {
    dispatcher.register_command("pulse", |context, _| Box::pin(async move {
        context.reply(&i18n::render("{pulse}", &[])).await
    }));
}
