use crate::barrier::CompletionBarrier;
use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use crate::extract::LinkExtractor;
use crate::fetch::FetchFn;
use crate::result::{PageRecord, SiteMap};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// How a crawl ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    /// Every dispatched task finished.
    Completed(SiteMap),
    /// An interrupt arrived first; the map holds whatever was aggregated so far.
    Interrupted { site_map: SiteMap, signal: String },
}

impl CrawlOutcome {
    pub fn site_map(&self) -> &SiteMap {
        match self {
            CrawlOutcome::Completed(site_map) => site_map,
            CrawlOutcome::Interrupted { site_map, .. } => site_map,
        }
    }

    pub fn into_site_map(self) -> SiteMap {
        match self {
            CrawlOutcome::Completed(site_map) => site_map,
            CrawlOutcome::Interrupted { site_map, .. } => site_map,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, CrawlOutcome::Interrupted { .. })
    }
}

/// Messages from dispatch tasks and the completion watcher to the aggregator.
#[derive(Debug)]
enum CrawlEvent {
    Page(PageRecord),
    Done,
    Failed(ScanError),
}

/// URLs already claimed by a dispatch task in this run.
#[derive(Debug, Clone, Default)]
struct SeenSet {
    urls: Arc<Mutex<HashSet<String>>>,
}

impl SeenSet {
    /// Marks `url` as seen; false if another task claimed it first.
    async fn claim(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().await;
        urls.insert(url.to_string())
    }

    async fn contains(&self, url: &str) -> bool {
        self.urls.lock().await.contains(url)
    }
}

/// Shared state cloned into every dispatch task.
#[derive(Clone)]
struct Dispatcher {
    max_depth: usize,
    extractor: Arc<LinkExtractor>,
    fetch: FetchFn,
    seen: SeenSet,
    events: mpsc::UnboundedSender<CrawlEvent>,
    barrier: CompletionBarrier,
}

impl Dispatcher {
    /// Registers a task with the barrier and runs it in the background.
    fn spawn(&self, depth: usize, url: String) {
        let guard = self.barrier.enter();
        let task = self.clone().process(depth, url);
        tokio::spawn(async move {
            let _guard = guard;
            task.await;
        });
    }

    fn process(self, depth: usize, url: String) -> BoxFuture<'static, ()> {
        async move {
            if depth > self.max_depth {
                return;
            }
            if url.is_empty() {
                let _ = self.events.send(CrawlEvent::Failed(ScanError::InvalidTarget));
                return;
            }
            if !self.seen.claim(&url).await {
                debug!("Already seen {}", url);
                return;
            }

            let body = match (self.fetch)(url.clone()).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Error while fetching url [{}]: {}", url, e);
                    return;
                }
            };
            let links = self.extractor.extract(&body);
            debug!("[depth {}] {} links on {}", depth, links.len(), url);

            if self
                .events
                .send(CrawlEvent::Page(PageRecord::new(url.clone(), links.clone())))
                .is_err()
            {
                // Aggregator already returned; nothing left to report to.
                return;
            }

            for link in links {
                if link == url || self.seen.contains(&link).await {
                    continue;
                }
                self.spawn(depth + 1, link);
            }
        }
        .boxed()
    }
}

/// Single consumer that owns the site map for the duration of a run.
struct Aggregator {
    site_map: SiteMap,
    events: mpsc::UnboundedReceiver<CrawlEvent>,
    progress_callback: Option<ProgressCallback>,
}

impl Aggregator {
    async fn run<I>(mut self, interrupt: I) -> Result<CrawlOutcome>
    where
        I: Future<Output = String>,
    {
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(CrawlEvent::Page(record)) => self.record(record),
                    Some(CrawlEvent::Done) | None => {
                        return Ok(CrawlOutcome::Completed(self.site_map));
                    }
                    Some(CrawlEvent::Failed(e)) => return Err(e),
                },
                signal = &mut interrupt => {
                    self.drain();
                    return Ok(CrawlOutcome::Interrupted {
                        site_map: self.site_map,
                        signal,
                    });
                }
            }
        }
    }

    fn record(&mut self, record: PageRecord) {
        let url = record.url.clone();
        if !self.site_map.insert(record) {
            debug!("Duplicate record for {} ignored", url);
            return;
        }
        if let Some(ref callback) = self.progress_callback {
            callback(self.site_map.len(), url);
        }
    }

    /// Takes records that are already queued without waiting for more.
    fn drain(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let CrawlEvent::Page(record) = event {
                self.record(record);
            }
        }
    }
}

pub struct Crawler {
    config: CrawlConfig,
    extractor: Arc<LinkExtractor>,
    fetch: FetchFn,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetch: FetchFn) -> Result<Self> {
        let extractor = Arc::new(LinkExtractor::new(&config)?);
        Ok(Self {
            config,
            extractor,
            fetch,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls from the base URL until every task finishes or `interrupt`
    /// resolves, whichever comes first. The interrupt future yields the name
    /// of the signal that stopped the run.
    ///
    /// Tasks still in flight when an interrupt wins keep running in the
    /// background; their results are discarded.
    pub async fn crawl<I>(&self, interrupt: I) -> Result<CrawlOutcome>
    where
        I: Future<Output = String>,
    {
        info!(
            "Starting crawl of {} to depth {}",
            self.config.base_url(),
            self.config.max_depth()
        );

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let barrier = CompletionBarrier::new();
        let dispatcher = Dispatcher {
            max_depth: self.config.max_depth(),
            extractor: self.extractor.clone(),
            fetch: self.fetch.clone(),
            seen: SeenSet::default(),
            events: events_tx.clone(),
            barrier: barrier.clone(),
        };

        dispatcher.spawn(0, self.config.base_url().to_string());
        drop(dispatcher);

        // Records are queued before their task leaves the barrier, so Done
        // always lands behind the last record on this channel.
        tokio::spawn(async move {
            barrier.wait().await;
            let _ = events_tx.send(CrawlEvent::Done);
        });

        let aggregator = Aggregator {
            site_map: SiteMap::new(),
            events: events_rx,
            progress_callback: self.progress_callback.clone(),
        };
        let outcome = aggregator.run(interrupt).await?;

        match &outcome {
            CrawlOutcome::Completed(site_map) => {
                info!("Crawl complete. Recorded {} pages", site_map.len())
            }
            CrawlOutcome::Interrupted { site_map, signal } => {
                info!(
                    "Crawl interrupted by {}. Recorded {} pages",
                    signal,
                    site_map.len()
                )
            }
        }

        Ok(outcome)
    }
}
