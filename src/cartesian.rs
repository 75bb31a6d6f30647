//! Pairing two single-pass lazy sequences in a stable, lazy order.
//!
//! This is a pure sequence combinator with no knowledge of text matching;
//! the range matcher uses it to combine its start and end boundary streams.

use std::pin::pin;

use async_stream::stream;
use futures_util::{Stream, StreamExt};

/// The lazy cartesian product of two fallible streams.
///
/// For each element of `a` in production order, yields it paired with every
/// element of `b` in production order before advancing:
///
/// ```
/// use futures_util::{TryStreamExt, stream};
/// use textanchor::cartesian::cartesian;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let a = stream::iter([Ok::<_, ()>(1), Ok(2)]);
/// let b = stream::iter([Ok::<_, ()>('x'), Ok('y')]);
/// let pairs: Vec<_> = cartesian(a, b).try_collect().await.unwrap();
/// assert_eq!(pairs, [(1, 'x'), (1, 'y'), (2, 'x'), (2, 'y')]);
/// # });
/// ```
///
/// Both inputs are single-pass, so `b` is buffered as it is first consumed
/// and replayed from the buffer on every later outer iteration; the
/// underlying producer of `b` is polled element by element, interleaved
/// with demand, and never restarted. A failure on `a` ends the output at
/// that point. A failure on `b` is buffered like an element and replayed
/// at the same position of every outer iteration that reaches it, ending
/// that iteration.
///
/// Termination follows `a`: if `a` is infinite the product is the
/// lazy-forever sequence of its pairs, and if `b` is infinite the first
/// outer iteration simply never completes; each poll still yields the
/// next pair, nothing blocks.
pub fn cartesian<A, B, T, U, E>(a: A, b: B) -> impl Stream<Item = Result<(T, U), E>>
where
    A: Stream<Item = Result<T, E>>,
    B: Stream<Item = Result<U, E>>,
    T: Clone,
    U: Clone,
    E: Clone,
{
    stream! {
        let mut a = pin!(a);
        let mut b = pin!(b);
        let mut replay: Vec<U> = Vec::new();
        let mut buffered_failure: Option<E> = None;
        let mut b_exhausted = false;

        while let Some(outer) = a.next().await {
            let left = match outer {
                Ok(left) => left,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            let mut index = 0;
            loop {
                if index < replay.len() {
                    yield Ok((left.clone(), replay[index].clone()));
                    index += 1;
                    continue;
                }
                if !b_exhausted {
                    match b.next().await {
                        Some(Ok(right)) => {
                            replay.push(right);
                            continue;
                        }
                        Some(Err(err)) => {
                            buffered_failure = Some(err);
                            b_exhausted = true;
                        }
                        None => b_exhausted = true,
                    }
                }
                if let Some(err) = &buffered_failure {
                    yield Err(err.clone());
                }
                break;
            }
        }
    }
}
