use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;

use super::{SubscriberRegistry, Topic};

/// A continuously re-evaluated read.
///
/// The handle evaluates its query once up front, then again on every change
/// event published to its topics, pushing a result only when it differs from
/// the last one delivered. Dropping the handle cancels the subscription.
pub struct LiveQuery<T> {
    rx: UnboundedReceiver<T>,
    task: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub(crate) fn spawn<F, Fut>(registry: SubscriberRegistry, topics: Vec<Topic>, eval: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send,
    {
        let (tx, rx) = unbounded_channel();
        let task = tokio::spawn(async move {
            // Subscribe before the first evaluation so no write can land
            // between the snapshot and the event feed.
            let mut events = registry.subscribe(topics).await;
            let mut last = eval().await;
            if tx.send(last.clone()).is_err() {
                return;
            }
            while events.recv().await.is_some() {
                let next = eval().await;
                if next != last {
                    if tx.send(next.clone()).is_err() {
                        break;
                    }
                    last = next;
                }
            }
        });
        Self { rx, task }
    }
}

impl<T> LiveQuery<T> {
    /// Next pushed result; `None` once the subscription has ended.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> Stream for LiveQuery<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
