use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{error, warn};

use crate::models::Transaction;
use crate::service::TransactionService;
use crate::upstream::UpstreamClient;

enum FeedItem {
    /// A CSV row, already typed.
    Record(Transaction),
    /// One raw JSON payload, validated by the service on submission.
    Payload {
        line: usize,
        body: String
    }
}

/// Streams transactions from a file into a `TransactionService`.
///
/// `.jsonl` files carry one JSON transaction per line. Anything else is read as CSV with
/// the header `id,account_id,amount,type,status[,description]`, where empty cells are
/// absent fields.
pub struct TransactionFeed {
    backpressure: usize
}

impl TransactionFeed {
    pub fn new() -> Self {
        Self {
            backpressure: 256
        }
    }

    /// Submits every readable entry and returns how many were queued.
    ///
    /// Unreadable files and malformed or rejected entries are logged and skipped.
    pub async fn run<U: UpstreamClient>(&self, path: &str, service: &TransactionService<U>) -> anyhow::Result<usize> {
        let (sender, mut receiver) = mpsc::channel::<FeedItem>(self.backpressure);
        let reader_handle = if is_json_lines(path) {
            self.spawn_json_lines_reader(path.to_string(), sender)
        } else {
            self.spawn_csv_reader(path.to_string(), sender)
        };

        let mut queued = 0;

        while let Some(item) = receiver.recv().await {
            let submitted = match item {
                FeedItem::Record(transaction) => {
                    let transaction_id = transaction.id.clone();
                    service.submit(transaction).await
                        .map_err(|error| warn!("Skipping transaction [{transaction_id}]: {error}"))
                },
                FeedItem::Payload { line, body } => {
                    service.submit_json(&body).await
                        .map_err(|error| warn!("Skipping line {line}: {error}"))
                }
            };

            if submitted.is_ok() {
                queued += 1;
            }
        }

        if let Err(error) = reader_handle.await {
            error!("Transaction ingestion failed: {error}");
        }

        Ok(queued)
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<FeedItem>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let Some(file) = open(&path) else {
                return;
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for result in reader.deserialize::<Transaction>() {
                match result {
                    Ok(transaction) => {
                        if sender.blocking_send(FeedItem::Record(transaction)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV deserialization error: {error}");
                    }
                }
            }
        })
    }

    fn spawn_json_lines_reader(&self, path: String, sender: mpsc::Sender<FeedItem>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let Some(file) = open(&path) else {
                return;
            };

            for (index, result) in BufReader::new(file).lines().enumerate() {
                let body = match result {
                    Ok(body) => body,
                    Err(error) => {
                        error!("Error reading {path} at line {}: {error}", index + 1);
                        break;
                    }
                };

                if body.trim().is_empty() {
                    continue;
                }

                if sender.blocking_send(FeedItem::Payload { line: index + 1, body }).is_err() {
                    break;
                }
            }
        })
    }
}

fn is_json_lines(path: &str) -> bool {
    Path::new(path).extension().is_some_and(|extension| extension.eq_ignore_ascii_case("jsonl"))
}

fn open(path: &str) -> Option<File> {
    match File::open(path) {
        Ok(file) => Some(file),
        Err(error) => {
            error!("Error opening input at path: {path} | {error}");
            None
        }
    }
}
