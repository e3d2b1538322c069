//! The exchange capability: a pair of stream transforms used to sync with
//! a peer.
//!
//! The engine never inspects values. It builds the inbound stream, hands it
//! to a transform, and forwards whatever the transform produces.

use std::sync::Arc;

use futures::stream::BoxStream;

use crate::error::BoxError;

/// Stream handed to a transform: values produced by the remote side. Ends
/// when the remote side has finished.
pub type Inbound<T> = BoxStream<'static, T>;

/// Stream produced by a transform. An `Err` item fails the whole sync.
pub type Outbound<T> = BoxStream<'static, Result<T, BoxError>>;

/// A replica endpoint that can sync with a peer.
///
/// `I` is what `send` consumes and `receive` produces; `O` is the reverse.
/// Connecting `a.send` to `b.receive` therefore carries `O` values from `a`
/// to `b` and `I` values back.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait Exchange<I, O>: Send + Sync {
    /// Transform the peer's `I` stream into the `O` stream sent to it.
    fn send(&self, input: Inbound<I>) -> Outbound<O>;

    /// Transform the peer's `O` stream into the `I` stream sent back.
    fn receive(&self, input: Inbound<O>) -> Outbound<I>;
}

impl<I, O, E> Exchange<I, O> for Arc<E>
where
    E: Exchange<I, O> + ?Sized,
{
    fn send(&self, input: Inbound<I>) -> Outbound<O> {
        (**self).send(input)
    }

    fn receive(&self, input: Inbound<O>) -> Outbound<I> {
        (**self).receive(input)
    }
}
