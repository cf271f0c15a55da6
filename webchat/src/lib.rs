pub mod commands;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use modules::{ChatModule, ConfigModule};
use shared::AppResult;

/// 覆盖数据目录的环境变量
pub const ENV_DATA_DIR: &str = "CRIEMOS_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".criemos";

fn data_dir() -> PathBuf {
    std::env::var(ENV_DATA_DIR)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn run() -> AppResult<()> {
    // 初始化日志，输出到 stderr，不干扰对话内容
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Criemos webchat starting...");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(data_dir()))
}

async fn serve(app_data_dir: PathBuf) -> AppResult<()> {
    tracing::info!("App data directory: {:?}", app_data_dir);

    // 初始化 Config 模块（使用文件存储）
    let config = ConfigModule::new_with_store(&app_data_dir)
        .load_effective()
        .await;

    // 初始化 Chat 模块（使用持久化存储）
    let chat_module = match ChatModule::new_with_persistence(&app_data_dir, &config).await {
        Ok(module) => {
            tracing::info!("Chat module initialized with persistent storage");
            module
        }
        Err(e) => {
            tracing::warn!(
                "Failed to initialize persistent storage: {}, falling back to memory",
                e
            );
            ChatModule::new(&config)?
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    commands::run_host(&chat_module, stdin, tokio::io::stdout()).await
}
