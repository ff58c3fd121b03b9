use std::path::Path;

use anyhow::{Context, Result};
use chess_arena::{ArenaSettings, RecordStore, Tournament};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 命令行参数：可选的设置文件路径
    let settings = match std::env::args().nth(1) {
        Some(path) => ArenaSettings::load_from(Path::new(&path)),
        None => ArenaSettings::load(),
    };

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("chess_arena={}", settings.log_level)
                    .parse()
                    .with_context(|| format!("Invalid log level: {}", settings.log_level))?,
            ),
        )
        .init();

    info!(
        "Chess arena: {} (white) vs {} (black), {} rounds, {} half-move cap",
        settings.white,
        settings.black,
        settings.effective_rounds(),
        settings.max_plies
    );

    let store = if settings.save_records {
        let store = RecordStore::from_settings(&settings)?;
        info!("Saving game records to {:?}", store.directory());
        Some(store)
    } else {
        None
    };

    let mut tournament = Tournament::from_settings(&settings);
    let champion = tournament.run(store.as_ref())?;

    for round in tournament.history() {
        info!(
            "Round {}: {} in {} half-moves, white took {} ({} pts), black took {} ({} pts), material {} / {}",
            round.round,
            round.outcome,
            round.plies,
            round.white_captures,
            round.white_captures.value,
            round.black_captures,
            round.black_captures.value,
            round.white_material,
            round.black_material
        );
    }
    info!("Final score: {}", tournament.scoreboard());
    info!("{}", champion);

    Ok(())
}
