//! Interactive operator session - the text command surface
//!
//! One line, one command:
//! - `<запрос> <страницы> <мин.цена> <макс.цена> <мин.рейтинг>` runs a scan
//! - a product URL starts price tracking
//! - `stop <id>` stops a subscription
//! - `graph <id>` delivers the price chart
//! - `help` prints usage
//!
//! Malformed input re-prompts with guidance; nothing here is fatal.

use anyhow::Result;
use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
use tracing::info;
use uuid::Uuid;

use super::WatchService;
use crate::domain::catalog::ScanQuery;
use crate::shared::errors::CommandError;
use crate::shared::types::Destination;

const USAGE: &str = "Введите название товара, количество страниц для поиска, минимальную цену, \
максимальную цену и минимальный рейтинг через пробел.\n\
Также доступно: ссылка на товар (отслеживание цены), stop <id>, graph <id>, help.";

/// One parsed operator command
#[derive(Debug)]
pub enum OperatorCommand {
    Search(ScanQuery),
    Track(String),
    Stop(Uuid),
    Graph(Uuid),
    Help,
}

/// Parse one input line into a command.
pub fn parse_command(line: &str) -> Result<OperatorCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::InvalidInput("пустая строка".into()));
    }

    if line.starts_with("http://") || line.starts_with("https://") {
        return Ok(OperatorCommand::Track(line.to_string()));
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens[0] {
        "help" => return Ok(OperatorCommand::Help),
        "stop" => return parse_id(&tokens).map(OperatorCommand::Stop),
        "graph" | "stats" => return parse_id(&tokens).map(OperatorCommand::Graph),
        _ => {}
    }

    // a search request: the last four tokens are numbers, everything
    // before them is the query text
    if tokens.len() < 5 {
        return Err(CommandError::InvalidInput(
            "недостаточно данных для поиска".into(),
        ));
    }

    let numeric = &tokens[tokens.len() - 4..];
    let query_text = tokens[..tokens.len() - 4].join(" ");

    let pages = numeric[0]
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidInput(format!("не число страниц: {:?}", numeric[0])))?;
    let min_price = numeric[1]
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidInput(format!("не цена: {:?}", numeric[1])))?;
    let max_price = numeric[2]
        .parse::<u64>()
        .map_err(|_| CommandError::InvalidInput(format!("не цена: {:?}", numeric[2])))?;
    let min_rating = numeric[3]
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidInput(format!("не рейтинг: {:?}", numeric[3])))?;

    let query = ScanQuery::new(query_text, pages, min_price, max_price, min_rating)?;
    Ok(OperatorCommand::Search(query))
}

fn parse_id(tokens: &[&str]) -> Result<Uuid, CommandError> {
    let raw = tokens
        .get(1)
        .ok_or_else(|| CommandError::InvalidInput("нужен идентификатор подписки".into()))?;
    Uuid::parse_str(raw)
        .map_err(|_| CommandError::InvalidInput(format!("не идентификатор: {:?}", raw)))
}

/// Read operator commands from stdin until EOF.
pub async fn run_session(service: &WatchService, destination: &Destination) -> Result<()> {
    info!("💬 Interactive session started");
    service.transport().send_text(destination, USAGE).await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());

    while let Some(line) = lines.next().await {
        let line = line?;
        dispatch(service, destination, &line).await;
    }

    info!("Session closed, stopping trackers");
    service.shutdown().await;
    Ok(())
}

async fn dispatch(service: &WatchService, destination: &Destination, line: &str) {
    match parse_command(line) {
        Ok(OperatorCommand::Search(query)) => {
            if let Err(e) = service.run_search(&query, destination).await {
                service
                    .transport()
                    .send_text(destination, &format!("Поиск не удался: {}", e))
                    .await;
            }
        }
        Ok(OperatorCommand::Track(url)) => {
            service.start_tracking(&url, destination).await;
        }
        Ok(OperatorCommand::Stop(id)) => {
            service.stop_tracking(id, destination).await;
        }
        Ok(OperatorCommand::Graph(id)) => {
            service.send_chart(id, destination).await;
        }
        Ok(OperatorCommand::Help) => {
            service.transport().send_text(destination, USAGE).await;
        }
        Err(e) => {
            // re-prompt, never crash
            service
                .transport()
                .send_text(destination, &format!("{}\n{}", e, USAGE))
                .await;
        }
    }
}
