use anyhow::Result;
use question_importer::utils::logging;
use question_importer::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（importer.toml + 环境变量）
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
