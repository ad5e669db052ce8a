use game_catalog::utils::logs::init_logging;
use game_catalog::{DatabaseConfig, GameCatalog};

/// 打开（必要时创建并迁移）游戏目录数据库，以 JSON 输出所有游戏
#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> game_catalog::Result<()> {
    let config = DatabaseConfig::resolve()?;
    let catalog = GameCatalog::connect(&config).await?;
    catalog.init().await?;

    let games = catalog.get_all_games().await?;
    log::info!("共 {} 个游戏", games.len());

    let json = serde_json::to_string_pretty(&games)?;
    println!("{}", json);

    catalog.close().await
}
