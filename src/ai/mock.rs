use super::client::{ChatChannel, LanguageModel};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted language model for tests. Replies are consumed in order, shared
/// between single-shot calls and channel sends; every prompt is recorded so
/// tests can assert on what was actually asked. Clones share the script, so
/// a test can keep a handle after boxing the original.
#[derive(Clone)]
pub struct MockModel {
    inner: Arc<MockInner>,
}

struct MockInner {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    temperatures: Mutex<Vec<f32>>,
    channels_opened: AtomicUsize,
}

impl MockModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self::with_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Scripts a mix of successes and failures.
    pub fn with_results(replies: Vec<Result<String, String>>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                channels_opened: AtomicUsize::new(0),
            }),
        }
    }

    /// Every prompt seen so far, single-shot and channel alike, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.inner.prompts.lock().unwrap().clone()
    }

    /// Temperatures passed to single-shot `generate` calls, in call order.
    pub fn temperatures(&self) -> Vec<f32> {
        self.inner.temperatures.lock().unwrap().clone()
    }

    pub fn channels_opened(&self) -> usize {
        self.inner.channels_opened.load(Ordering::SeqCst)
    }
}

impl MockInner {
    fn next_reply(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(message.into()),
            None => Err("mock model ran out of scripted replies".into()),
        }
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.inner.temperatures.lock().unwrap().push(temperature);
        self.inner.next_reply(prompt)
    }

    fn start_chat(&self) -> Box<dyn ChatChannel> {
        self.inner.channels_opened.fetch_add(1, Ordering::SeqCst);
        Box::new(MockChannel {
            inner: Arc::clone(&self.inner),
        })
    }
}

struct MockChannel {
    inner: Arc<MockInner>,
}

#[async_trait]
impl ChatChannel for MockChannel {
    async fn send(
        &mut self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.inner.next_reply(prompt)
    }
}
