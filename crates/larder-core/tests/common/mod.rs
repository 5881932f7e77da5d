#![allow(dead_code)]

use async_trait::async_trait;
use larder_core::fetch::FetchResult;
use larder_core::{
    ChannelFrontend, CredentialGate, EnrichmentCoordinator, FetchError, Frontend, FrontendSignal,
    ImageFetcher, ImageRef, ItemStore, ItemView, MemoryCredentialStore, Service, Suggestion,
    SuggestionFetcher,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

enum Reply<T> {
    Now(FetchResult<T>),
    Later(oneshot::Receiver<FetchResult<T>>),
}

/// Fetcher double: records every call and answers from a queue of scripted
/// replies, falling back to a fixed result once the queue is empty.
pub struct Fake<T> {
    calls: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<Reply<T>>>,
    fallback: FetchResult<T>,
}

impl<T: Clone + Send + 'static> Fake<T> {
    pub fn returning(fallback: FetchResult<T>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            fallback,
        }
    }

    /// Queue a reply that is held back until the returned sender fires.
    pub fn deferred(&self) -> oneshot::Sender<FetchResult<T>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn queue(&self, reply: FetchResult<T>) {
        self.replies.lock().unwrap().push_back(Reply::Now(reply));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn reply(&self, item_name: &str) -> FetchResult<T> {
        self.calls.lock().unwrap().push(item_name.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Now(result)) => result,
            Some(Reply::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("reply dropped".into()))),
            None => self.fallback.clone(),
        }
    }
}

#[async_trait]
impl SuggestionFetcher for Fake<Option<Suggestion>> {
    async fn fetch_suggestion(
        &self,
        item_name: &str,
        _credential: &str,
    ) -> FetchResult<Option<Suggestion>> {
        self.reply(item_name).await
    }
}

#[async_trait]
impl ImageFetcher for Fake<Option<ImageRef>> {
    async fn fetch_image(&self, item_name: &str, _credential: &str) -> FetchResult<Option<ImageRef>> {
        self.reply(item_name).await
    }
}

pub struct Harness {
    pub coordinator: Arc<EnrichmentCoordinator>,
    pub store: Arc<ItemStore>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub suggestions: Arc<Fake<Option<Suggestion>>>,
    pub images: Arc<Fake<Option<ImageRef>>>,
    pub signals: mpsc::UnboundedReceiver<FrontendSignal>,
}

impl Harness {
    pub fn new(credentials: MemoryCredentialStore) -> Self {
        let (frontend, signals) = ChannelFrontend::new();
        let frontend: Arc<dyn Frontend> = Arc::new(frontend);
        let credentials = Arc::new(credentials);
        let store = Arc::new(ItemStore::new());
        let suggestions = Arc::new(Fake::returning(Ok(None)));
        let images = Arc::new(Fake::returning(Ok(None)));

        let coordinator = Arc::new(EnrichmentCoordinator::new(
            Arc::clone(&store),
            CredentialGate::new(credentials.clone(), Arc::clone(&frontend)),
            suggestions.clone(),
            images.clone(),
            frontend,
        ));

        Self {
            coordinator,
            store,
            credentials,
            suggestions,
            images,
            signals,
        }
    }

    pub fn with_both_keys() -> Self {
        Self::new(
            MemoryCredentialStore::new()
                .with(Service::Suggestion, "sk-test")
                .with(Service::Image, "px-test"),
        )
    }

    /// Drain every signal raised so far.
    pub fn drain_signals(&mut self) -> Vec<FrontendSignal> {
        let mut out = Vec::new();
        while let Ok(signal) = self.signals.try_recv() {
            out.push(signal);
        }
        out
    }
}

pub fn suggestion(alternative: &str, reason: &str) -> Suggestion {
    Suggestion {
        alternative: alternative.to_string(),
        reason: reason.to_string(),
    }
}

/// Wait until the store satisfies `done`, or panic after about a second.
pub async fn wait_until<F>(store: &ItemStore, mut done: F)
where
    F: FnMut(&[ItemView]) -> bool,
{
    for _ in 0..1000 {
        if done(&store.snapshot().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("store never reached the expected state: {:#?}", store.snapshot().await);
}
