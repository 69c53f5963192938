//! CLI commands and handlers
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use super::{session, WatchService};
use crate::config::Config;
use crate::domain::catalog::ScanQuery;
use crate::infrastructure::delivery::ConsoleTransport;
use crate::infrastructure::fetch::HttpPageFetcher;
use crate::report::ScanReport;
use crate::shared::errors::AppError;

#[derive(Parser)]
#[command(name = "pricewatch")]
#[command(version, about = "Marketplace catalog scanner and price tracking bot")]
pub struct Cli {
    /// Path to config file (optional)
    #[arg(long)]
    pub config: Option<String>,

    /// Метка получателя для исходящих сообщений
    #[arg(long, default_value = "operator")]
    pub destination: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Однократное сканирование каталога
    Scan {
        /// Текст поискового запроса
        query: String,

        /// Количество страниц для обхода
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Минимальная цена
        #[arg(long, default_value_t = 0)]
        min_price: u64,

        /// Максимальная цена
        #[arg(long, default_value_t = u64::MAX)]
        max_price: u64,

        /// Минимальный рейтинг (0..=5)
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,

        /// Вывести отчёт сканирования в JSON
        #[arg(long)]
        json: bool,
    },

    /// Отслеживание цены конкретного товара
    Track {
        /// Ссылка на товар
        url: String,

        /// Интервал опроса в секундах (по умолчанию из конфигурации)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Интерактивный режим с текстовыми командами
    Repl,

    /// Show current bot status
    Status {
        /// Show detailed status information
        #[arg(short, long)]
        detailed: bool,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(
        command: Commands,
        mut config: Config,
        destination: String,
    ) -> Result<(), AppError> {
        if let Commands::Track {
            interval: Some(secs),
            ..
        } = &command
        {
            config.tracking.poll_interval_secs = *secs;
        }

        match command {
            Commands::Scan {
                query,
                pages,
                min_price,
                max_price,
                min_rating,
                json,
            } => {
                let query = ScanQuery::new(query, pages, min_price, max_price, min_rating)?;
                let service = Self::build_service(config)?;

                let result = service.run_search(&query, &destination).await?;

                if json {
                    let report = ScanReport::new(&query, &result);
                    let rendered = serde_json::to_string_pretty(&report)
                        .map_err(|e| AppError::Unknown(e.to_string()))?;
                    println!("{}", rendered);
                }
                Ok(())
            }

            Commands::Track { url, .. } => {
                let service = Self::build_service(config)?;
                let id = service.start_tracking(&url, &destination).await;
                info!("Press Ctrl-C to stop tracking {}", id);

                tokio::signal::ctrl_c()
                    .await
                    .map_err(|e| AppError::Unknown(e.to_string()))?;

                service.shutdown().await;
                Ok(())
            }

            Commands::Repl => {
                let service = Self::build_service(config)?;
                session::run_session(&service, &destination)
                    .await
                    .map_err(|e| AppError::Unknown(e.to_string()))
            }

            Commands::Status { detailed } => {
                info!("📊 Статус бота:");
                info!("   Версия: {}", env!("CARGO_PKG_VERSION"));
                info!("   Каталог: {}", config.catalog.search_url);
                if detailed {
                    info!("   Конфигурация:");
                    info!("     - Слотов на страницу: {}", config.catalog.max_slots);
                    info!(
                        "     - Интервал опроса: {} с",
                        config.tracking.poll_interval_secs
                    );
                    info!("     - Размер чанка доставки: {}", config.delivery.chunk_size);
                }
                Ok(())
            }
        }
    }

    fn build_service(config: Config) -> Result<WatchService, AppError> {
        let fetcher = HttpPageFetcher::new(&config.catalog, &config.selectors, &config.http)
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(WatchService::new(
            config,
            Arc::new(fetcher),
            Arc::new(ConsoleTransport),
        ))
    }
}
