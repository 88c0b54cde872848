use std::sync::Arc;

use teloxide::prelude::*;

use forwarder::Router;

use crate::to_inbound;

/// Listen for messages and channel posts until the dispatcher stops
pub async fn start_relay_bot(bot: Bot, router: Arc<Router>) {
    log::debug!("starting relay bot");
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(relay_handler))
        .branch(Update::filter_channel_post().endpoint(relay_handler));
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|_update| async move { log::debug!("skipping unhandled update") })
        .error_handler(LoggingErrorHandler::with_custom_text("error in relay dispatcher"))
        .build()
        .dispatch()
        .await;
}

async fn relay_handler(msg: Message, router: Arc<Router>) -> ResponseResult<()> {
    let route = router.handle(to_inbound(&msg));
    log::debug!("message {} from chat {}: {route:?}", msg.id.0, msg.chat.id);
    Ok(())
}
