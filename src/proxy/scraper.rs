//! Poll-and-cache state machine
//!
//! One call to [`Scraper::run`] is one scheduler tick:
//!
//! | state            | action                                   |
//! |------------------|------------------------------------------|
//! | cooldown n > 0   | decrement, nothing else                  |
//! | no session       | login, then fetch loop                   |
//! | session          | fetch every endpoint in order            |
//!
//! A non-200 status skips that endpoint and keeps the session. A device
//! error marker, a malformed body or any transport/login failure drops the
//! session, aborts the remaining endpoints and starts a cooldown.

use async_trait::async_trait;
use crate::device::{Modem, Session};
use crate::proxy::errors::ScrapeError;
use crate::proxy::scheduler::Job;
use crate::proxy::store::SnapshotStore;
use crate::xml;

#[derive(Clone, Debug)]
pub struct ScraperConfig {
    /// endpoint paths, fetched in this order
    pub endpoints: Vec<String>,

    /// ticks to skip after a failed run
    pub cooldown_ticks: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Tick consumed by an active cooldown
    CoolingDown { remaining: u32 },
    Completed(RunSummary),
    Failed(ScrapeError),
}

pub struct Scraper<M: Modem> {
    modem: M,
    store: SnapshotStore,
    cfg: ScraperConfig,
    session: Option<Session>,
    cooldown: u32,
}

impl<M: Modem> Scraper<M> {
    pub fn new(modem: M, store: SnapshotStore, cfg: ScraperConfig) -> Self {
        Self {
            modem,
            store,
            cfg,
            session: None,
            cooldown: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Remaining ticks to skip
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub async fn run(&mut self) -> RunOutcome {
        let outcome = if self.cooldown > 0 {
            self.cooldown -= 1;
            tracing::debug!("Cooling down after error, {} ticks left", self.cooldown);
            RunOutcome::CoolingDown {
                remaining: self.cooldown,
            }
        } else {
            match self.scrape().await {
                Ok(summary) => RunOutcome::Completed(summary),
                Err(e) => {
                    tracing::error!("Error in scraper: {}", e);
                    self.session = None;
                    self.cooldown = self.cfg.cooldown_ticks;
                    RunOutcome::Failed(e)
                }
            }
        };

        self.store.log_contents();
        outcome
    }

    async fn scrape(&mut self) -> Result<RunSummary, ScrapeError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                tracing::debug!("Attempting to login");
                let session = self.modem.login().await.map_err(ScrapeError::Login)?;
                tracing::info!("Logged in to modem");
                session
            }
        };
        let session = self.session.insert(session);

        let mut summary = RunSummary::default();
        for endpoint in &self.cfg.endpoints {
            let response = self
                .modem
                .fetch(endpoint, session)
                .await
                .map_err(|source| ScrapeError::Transport {
                    endpoint: endpoint.clone(),
                    source,
                })?;

            if !response.is_ok() {
                tracing::debug!("{} returned status {}, skipping", endpoint, response.status);
                summary.skipped += 1;
                continue;
            }

            let doc = xml::parse(&response.body).map_err(|source| ScrapeError::Parse {
                endpoint: endpoint.clone(),
                source,
            })?;
            if let Some(error) = xml::check_error(doc.root()) {
                return Err(ScrapeError::Device {
                    endpoint: endpoint.clone(),
                    error,
                });
            }

            tracing::debug!("Stored {} ({} bytes)", endpoint, response.body.len());
            self.store.set(endpoint.clone(), response.body);
            summary.updated += 1;
        }

        Ok(summary)
    }
}

#[async_trait]
impl<M: Modem + 'static> Job for Scraper<M> {
    async fn tick(&mut self) {
        if let RunOutcome::Completed(summary) = self.run().await {
            tracing::debug!(
                "Scrape finished: {} updated, {} skipped, {} cached",
                summary.updated,
                summary.skipped,
                self.store.len()
            );
        }
    }
}
