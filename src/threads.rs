use std::iter::zip;
use std::sync::mpsc;
use std::thread;

use log::trace;

/// Splits a value into `n` independently solvable parts.
///
/// Solver states split by row groups, so every part stays a well-formed
/// state and parallel runs produce the same raster as serial ones.
pub trait Split: Sized {
    fn split_to_vec(self, n: usize) -> Vec<Self>;
}

/// Reassembles parts produced by [`Split`], in dispatch order.
pub trait Join: Sized {
    fn join_vec(parts: Vec<Self>) -> Self;
}

impl<T: Clone> Split for Vec<T> {
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        let size = self.len() / n;
        let size_xtra = self.len() % n;
        let mut parts = Vec::with_capacity(n);
        let mut start = 0;
        for i in 0..n {
            let end = start + size + usize::from(i < size_xtra);
            parts.push(self[start..end].to_vec());
            start = end;
        }
        parts
    }
}

impl<T: Clone> Join for Vec<T> {
    fn join_vec(parts: Vec<Self>) -> Self {
        let mut joined = vec![];
        for part in parts {
            joined.extend(part);
        }
        joined
    }
}

/// Evenly partitions `start..end` into exactly `n` contiguous ranges.
pub struct RangeSplitter {
    start: usize,
    i: usize,
    n: usize,
    chunk: usize,
    xtra: usize,
}

impl RangeSplitter {
    pub fn split(start: usize, end: usize, n: usize) -> Self {
        assert!(n > 0, "no parts");
        let len = end - start;
        Self {
            start,
            i: 0,
            n,
            chunk: len / n,
            xtra: len % n,
        }
    }
}

impl Iterator for RangeSplitter {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.i == self.n {
            return None;
        }
        let size = self.chunk + usize::from(self.i < self.xtra);
        let range = (self.start, self.start + size);
        self.start += size;
        self.i += 1;
        Some(range)
    }
}

struct Part<T> {
    n: usize,
    payload: T,
}

struct Worker<I> {
    tx: mpsc::Sender<Part<I>>,
}

impl<I> Worker<I>
where
    I: Send + 'static,
{
    fn spawn<O, W>(mut work: W, out_tx: mpsc::Sender<Part<O>>) -> Self
    where
        O: Send + 'static,
        W: FnMut(I) -> O + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Part<I>>();
        thread::spawn(move || loop {
            let part: Part<I> = match rx.recv() {
                Ok(p) => p,
                Err(_) => return,
            };
            let payload = work(part.payload);
            if out_tx
                .send(Part {
                    n: part.n,
                    payload,
                })
                .is_err()
            {
                return;
            }
        });
        Self { tx }
    }
}

pub trait Call<I, O> {
    fn call(&self, input: I) -> O;
}

/// Pool of worker threads, each running one clone of a solve closure.
///
/// Inputs split into one part per worker; outputs rejoin in part order, so
/// pooled and unpooled runs of the same solver give identical results.
pub struct WorkerPool<I, O> {
    workers: Vec<Worker<I>>,
    rx: mpsc::Receiver<Part<O>>,
}

impl<I, O> WorkerPool<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn with<F, W>(n: usize, factory: F) -> Self
    where
        F: Fn() -> W,
        W: FnMut(I) -> O + Send + 'static,
    {
        assert!(n > 0, "no workers");
        let (out_tx, rx) = mpsc::channel();
        let workers = (0..n)
            .map(|_| Worker::spawn(factory(), out_tx.clone()))
            .collect();
        Self { workers, rx }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl<I, O> Call<I, O> for WorkerPool<I, O>
where
    I: Split + Send + 'static,
    O: Join + Send + 'static,
{
    fn call(&self, input: I) -> O {
        let n = self.size();
        let parts = input.split_to_vec(n);
        trace!("dispatching {} parts", parts.len());
        for (worker, (i, payload)) in zip(&self.workers, parts.into_iter().enumerate()) {
            worker.tx.send(Part { n: i, payload }).unwrap();
        }
        let mut outputs: Vec<Option<O>> = (0..n).map(|_| None).collect();
        for _ in 0..n {
            let part = self.rx.recv().unwrap();
            outputs[part.n] = Some(part.payload);
        }
        let outputs = outputs
            .into_iter()
            .map(|o| o.expect("missing part"))
            .collect();
        O::join_vec(outputs)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(length: usize, n: usize) {
        let v: Vec<usize> = (0..length).collect();
        let parts = v.clone().split_to_vec(n);
        assert_eq!(parts.len(), n);
        assert_eq!(Vec::join_vec(parts), v);
    }

    #[test]
    fn test_vec_split_join_roundtrip() {
        roundtrip(1, 1);
        roundtrip(0, 2);
        roundtrip(5, 8);
        roundtrip(8, 5);
        roundtrip(100, 1);
        roundtrip(55, 47);
    }

    #[test]
    fn test_range_splitter_covers_range() {
        let ranges: Vec<(usize, usize)> = RangeSplitter::split(0, 10, 3).collect();
        assert_eq!(ranges, vec![(0, 4), (4, 7), (7, 10)]);

        let emptyish: Vec<(usize, usize)> = RangeSplitter::split(0, 1, 4).collect();
        assert_eq!(emptyish.len(), 4);
        assert_eq!(emptyish[0], (0, 1));
        assert_eq!(emptyish[3], (1, 1));
    }

    #[test]
    fn test_worker_pool_preserves_order() {
        let pool: WorkerPool<Vec<i64>, Vec<i64>> =
            WorkerPool::with(4, || |part: Vec<i64>| part.iter().map(|x| x * x).collect());
        let input: Vec<i64> = (0..100).collect();
        let expected: Vec<i64> = input.iter().map(|x| x * x).collect();
        assert_eq!(pool.call(input.clone()), expected);
        // the pool is reusable
        assert_eq!(pool.call(input), expected);
    }
}
