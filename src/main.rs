use anyhow::Result;
use serenity::{model::gateway::GatewayIntents, Client};
use songbird::SerenityInit;
use std::sync::Arc;
use tracing::{error, info};

mod audio;
mod bot;
mod config;
mod ui;

use crate::audio::{lavalink::LavalinkManager, player::AudioPlayer};
use crate::bot::RadioBot;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("radio_bot=debug".parse()?)
                .add_directive("serenity=info".parse()?)
                .add_directive("songbird=info".parse()?)
                .add_directive("lavalink_rs=info".parse()?),
        )
        .init();

    info!("📻 Iniciando Radio Bot v{}", env!("CARGO_PKG_VERSION"));

    // Cargar configuración
    let config = Config::load()?;

    // El health check solo comprueba que la configuración sea válida
    if std::env::args().any(|arg| arg == "--health-check") {
        println!("OK");
        return Ok(());
    }

    info!("⚙️ {}", config.summary());

    let player = Arc::new(AudioPlayer::new(config.max_queue_size));

    // Configurar intents mínimos necesarios
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let handler = RadioBot::new(config.clone(), Arc::clone(&player));

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .register_songbird()
        .await?;

    // Inicializar Lavalink
    info!("🎼 Inicializando Lavalink...");
    let user_id = client.http.get_current_user().await?.id;
    let lavalink = LavalinkManager::new(&config, user_id, player, client.http.clone()).await?;
    info!("✅ Lavalink inicializado exitosamente");

    {
        let mut data = client.data.write().await;
        data.insert::<LavalinkManager>(Arc::new(lavalink));
    }

    // Manejar shutdown graceful
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("⚠️ Señal de shutdown recibida, cerrando...");
                shard_manager.shutdown_all().await;
            }
            Err(e) => error!("Error al registrar Ctrl+C: {:?}", e),
        }
    });

    // Iniciar bot
    info!("🚀 Bot iniciado exitosamente");
    if let Err(why) = client.start().await {
        error!("Error al ejecutar cliente: {:?}", why);
    }

    Ok(())
}
