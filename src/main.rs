use std::sync::Arc;

use anyhow::Result;
use simplelog::LevelFilter;
use teloxide::prelude::*;
use tokio::{
    signal,
    sync::mpsc::{self, Sender},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;

use common::{config::Config as RelayConfig, spawn_with_token};
use forwarder::{AlbumAggregator, Forwarder, Router};
use tg::{start_relay_bot, TgChannel, TgPublisher};
use translator::Translator;

use crate::handlers::tg_logs::{start_tg_logs_job, LogMessage};
use crate::logger::TgLogger;

mod handlers;
mod logger;

const IS_PROD: bool = cfg!(feature = "prod");
const LOG_LEVEL: LevelFilter = if IS_PROD {
    LevelFilter::Error
} else {
    LevelFilter::Debug
};

#[tokio::main]
async fn main() -> Result<()> {
    let tg_logs_chan = mpsc::channel(100);
    init_logger(tg_logs_chan.0);

    if let Err(e) = dotenvy::dotenv() {
        log::debug!("no .env loaded: {e}");
    }
    // fail before connecting, never wait for input
    let config = RelayConfig::load()?;
    log::info!(
        tg = true;
        "relaying {} sources to {}, translating with {} to {}",
        config.sources.len(),
        config.destination,
        config.responder,
        config.target_lang
    );

    let bot = Bot::with_client(
        config.bot_token.clone(),
        teloxide::net::default_reqwest_settings()
            .timeout(config.timeouts.request())
            .build()?,
    );
    let router = Arc::new(build_router(&config, bot.clone()));

    let cancel_token = CancellationToken::new();
    let mut jobs = JoinSet::new();
    if let Some(log_chat_id) = config.log_chat_id {
        jobs.spawn(spawn_with_token(
            "tg logs",
            cancel_token.clone(),
            start_tg_logs_job(bot.clone(), ChatId(log_chat_id), tg_logs_chan.1),
        ));
    } else {
        log::warn!("log_chat_id is not set, skip starting tg logs job")
    }
    jobs.spawn(spawn_with_token(
        "relay bot",
        cancel_token.clone(),
        start_relay_bot(bot, router.clone()),
    ));

    jobs.spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to listen for SIGINT: {e}");
        }
        cancel_token.cancel();
    });

    while (jobs.join_next().await).is_some() {}

    let (albums, translations) = (router.pending_albums(), router.pending_translations());
    if albums > 0 || translations > 0 {
        log::warn!("stopped with {albums} albums and {translations} translations in flight");
    }
    Ok(())
}

fn build_router(config: &RelayConfig, bot: Bot) -> Router {
    let translator = Arc::new(Translator::new(
        Arc::new(TgChannel::new(bot.clone())),
        config.into(),
    ));
    let forwarder = Arc::new(Forwarder::new(
        translator.clone(),
        Arc::new(TgPublisher::new(bot)),
        config.into(),
    ));
    let albums = AlbumAggregator::new(forwarder.clone(), config.timeouts.album_debounce());
    Router::new(translator, forwarder, albums, &config.sources)
}

fn init_logger(sender: Sender<LogMessage>) {
    use simplelog::*;

    use logger::{Config as TgConfig, ConfigBuilder as TgConfigBuilder};

    let term_config = if IS_PROD {
        Config::default()
    } else {
        ConfigBuilder::new()
            .add_filter_ignore_str("h2")
            .add_filter_ignore_str("hyper")
            .add_filter_ignore_str("reqwest")
            .add_filter_ignore_str("rustls")
            .build()
    };

    let tg_config = if IS_PROD {
        TgConfig::default()
    } else {
        TgConfigBuilder::new()
            .add_ignore("ConnectionReset")
            .add_ignore("TerminatedByOtherGetUpdates")
            .build()
    };

    if let Err(e) = CombinedLogger::init(vec![
        TermLogger::new(
            LOG_LEVEL,
            term_config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        TgLogger::new(sender, tg_config),
    ]) {
        eprintln!("failed to init logger: {e}");
    }
}
