//! Single-producer, single-consumer handoff channels.
//!
//! With a buffer of zero the channel is a rendezvous point: `send` returns
//! only once the receiver has taken the value. A positive buffer gives a
//! bounded FIFO of that capacity instead.

use futures::stream::{self, BoxStream, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Why a [`Sender::send`] did not deliver its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// This sender was already closed. Sending after `close` is a contract
    /// violation on the producer's side.
    #[error("channel closed by its sender")]
    Closed,

    /// The receiver was dropped, so nobody will ever take the value.
    #[error("receiver disconnected")]
    Disconnected,
}

struct Envelope<T> {
    value: T,
    /// Present in rendezvous mode; fired when the receiver takes the value.
    delivered: Option<oneshot::Sender<()>>,
}

/// Producer half of a channel.
pub struct Sender<T> {
    inner: Option<mpsc::Sender<Envelope<T>>>,
    rendezvous: bool,
}

/// Consumer half of a channel.
pub struct Receiver<T> {
    inner: mpsc::Receiver<Envelope<T>>,
}

/// Create a channel. `buffer == 0` gives a rendezvous channel.
pub fn channel<T>(buffer: usize) -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (
        Sender {
            inner: Some(tx),
            rendezvous: buffer == 0,
        },
        Receiver { inner: rx },
    )
}

impl<T> Sender<T> {
    /// Hand `value` to the receiver.
    ///
    /// In rendezvous mode this waits until the receiver has taken the value;
    /// otherwise it waits only for buffer room.
    pub async fn send(&self, value: T) -> Result<(), SendError> {
        let tx = self.inner.as_ref().ok_or(SendError::Closed)?;

        if !self.rendezvous {
            let envelope = Envelope {
                value,
                delivered: None,
            };
            return tx.send(envelope).await.map_err(|_| SendError::Disconnected);
        }

        let (delivered_tx, delivered_rx) = oneshot::channel();
        let envelope = Envelope {
            value,
            delivered: Some(delivered_tx),
        };
        tx.send(envelope)
            .await
            .map_err(|_| SendError::Disconnected)?;

        // The receiver dropping the queued envelope also drops `delivered_tx`.
        delivered_rx.await.map_err(|_| SendError::Disconnected)
    }

    /// Signal that no further values will be sent. Idempotent.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether the receiver has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.inner.as_ref().map_or(false, |tx| tx.is_closed())
    }
}

impl<T> Receiver<T> {
    /// Wait for the next value. `None` once the sender is closed or dropped
    /// and nothing is left to deliver.
    pub async fn recv(&mut self) -> Option<T> {
        let envelope = self.inner.recv().await?;
        if let Some(delivered) = envelope.delivered {
            // The sender may have given up waiting; the value still counts.
            let _ = delivered.send(());
        }
        Some(envelope.value)
    }
}

impl<T: Send + 'static> Receiver<T> {
    /// Consume the receiver as a stream that ends when the channel closes.
    pub fn into_stream(self) -> BoxStream<'static, T> {
        stream::unfold(self, |mut rx| async move {
            let value = rx.recv().await?;
            Some((value, rx))
        })
        .boxed()
    }
}
