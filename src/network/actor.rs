//! Network actor - runs catalog fetches in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{
    check_health, create_client, fetch_chapters, fetch_manga, fetch_pages, fetch_search,
};

/// Network actor that executes fetch commands concurrently. Requests are not
/// cancelled when superseded; the app layer drops stale responses by id.
pub struct NetworkActor {
    client: reqwest::Client,
    base_url: String,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(base_url: String, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client: create_client(),
            base_url,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchSearch { id, query }) => {
                            let (client, base, tx) = self.handles();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, query = %query, "search request");
                                let result = fetch_search(&client, &base, id, &query).await;
                                let _ = tx.send(result);
                            });
                        }

                        Some(NetworkCommand::FetchManga { id, manga_id }) => {
                            let (client, base, tx) = self.handles();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, manga_id = %manga_id, "detail request");
                                let result = fetch_manga(&client, &base, id, &manga_id).await;
                                let _ = tx.send(result);
                            });
                        }

                        Some(NetworkCommand::FetchChapters { id, manga_id }) => {
                            let (client, base, tx) = self.handles();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, manga_id = %manga_id, "chapter list request");
                                let result = fetch_chapters(&client, &base, id, &manga_id).await;
                                let _ = tx.send(result);
                            });
                        }

                        Some(NetworkCommand::FetchPages { id, chapter_id }) => {
                            let (client, base, tx) = self.handles();
                            self.active_requests.spawn(async move {
                                tracing::info!(id, chapter_id = %chapter_id, "page list request");
                                let result = fetch_pages(&client, &base, id, &chapter_id).await;
                                let _ = tx.send(result);
                            });
                        }

                        Some(NetworkCommand::CheckHealth { id }) => {
                            let (client, base, tx) = self.handles();
                            self.active_requests.spawn(async move {
                                let result = check_health(&client, &base, id).await;
                                let _ = tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => break,

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }

    fn handles(
        &self,
    ) -> (
        reqwest::Client,
        String,
        mpsc::UnboundedSender<NetworkResponse>,
    ) {
        (
            self.client.clone(),
            self.base_url.clone(),
            self.response_tx.clone(),
        )
    }
}
