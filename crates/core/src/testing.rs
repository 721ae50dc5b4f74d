//! Scripted collection source for cache and engine tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;

use crate::{CollectionSource, Error, Item};

pub(crate) fn item(id: &str, name: &str, category: &str) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        category: category.to_string(),
        description: None,
        fields: Map::new(),
    }
}

pub(crate) fn catalog() -> Vec<Item> {
    vec![item("1", "Red Shoe", "Footwear"), item("2", "Blue Hat", "Apparel")]
}

/// Replays queued outcomes in order, sleeping `delay` before each.
pub(crate) struct ScriptedSource {
    delay: Duration,
    script: Mutex<VecDeque<Result<Vec<Item>, Error>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay, script: Mutex::new(VecDeque::new()), calls: AtomicUsize::new(0) }
    }

    pub(crate) fn then_ok(self, items: Vec<Item>) -> Self {
        self.script.lock().unwrap().push_back(Ok(items));
        self
    }

    pub(crate) fn then_err(self, err: Error) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_items(&self) -> Result<Vec<Item>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        tokio::time::sleep(self.delay).await;
        next.unwrap_or_else(|| Err(Error::Network("script exhausted".into())))
    }
}
