use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use futures::stream::FusedStream;
use pin_project_lite::pin_project;

pin_project! {
    /// Ends a stream of results right after its first `Err`
    ///
    /// The failing item is still yielded. Nothing upstream is polled
    /// afterwards; pending work inside it is dropped with the stream.
    #[must_use = "streams do nothing unless polled"]
    pub struct StopAfterError<St> {
        #[pin]
        inner: St,
        done: bool,
    }
}

impl<St> StopAfterError<St> {
    pub fn new(inner: St) -> Self {
        Self { inner, done: false }
    }
}

impl<St, O, E> Stream for StopAfterError<St>
where
    St: Stream<Item = Result<O, E>>,
{
    type Item = Result<O, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.inner.poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Some(Ok(item))),
            Some(Err(error)) => {
                *this.done = true;
                Poll::Ready(Some(Err(error)))
            }
            None => {
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.inner.size_hint().1)
        }
    }
}

impl<St, O, E> FusedStream for StopAfterError<St>
where
    St: Stream<Item = Result<O, E>>,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
