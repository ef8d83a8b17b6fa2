//! Collective reductions across ranks.
//!
//! A [`Communicator`] couples every rank's local state into one value.
//! Each call is a blocking collective: every rank must make the same
//! calls in the same order. A rank that skips a reduction under some
//! local condition leaves its peers waiting forever.
//!
//! Two implementations are provided:
//!
//! - [`SerialComm`]: a single rank; reductions are the identity.
//! - [`ThreadComm`]: N ranks inside one process, one OS thread per rank,
//!   exchanging values over point-to-point channels.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::CommError;

/// Blocking all-reduce operations over a fixed set of ranks.
///
/// # Contract
///
/// - Every method is a synchronisation point for all ranks.
/// - The returned value is bit-identical on every rank.
/// - Results do not depend on the order in which ranks arrive.
pub trait Communicator: Send {
    /// Index of this rank, in `0..nprocs()`.
    fn rank(&self) -> usize;

    /// Number of participating ranks.
    fn nprocs(&self) -> usize;

    /// Maximum of `value` over all ranks.
    fn max(&self, value: f64) -> f64;

    /// Sum of `value` over all ranks, combined in rank order.
    fn sum(&self, value: f64) -> f64;
}

/// Communicator for a run on a single rank.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn nprocs(&self) -> usize {
        1
    }

    fn max(&self, value: f64) -> f64 {
        value
    }

    fn sum(&self, value: f64) -> f64 {
        value
    }
}

/// In-process communicator with one endpoint per rank.
///
/// Every ordered pair of ranks gets its own channel, so values from
/// successive collectives can never be matched to the wrong call: each
/// receive reads the next value a specific peer sent.
///
/// # Panics
///
/// Reductions panic if a peer endpoint has been dropped mid-run. A rank
/// disappearing during a collective is fatal for the whole job.
#[derive(Debug)]
pub struct ThreadComm {
    rank: usize,
    nprocs: usize,
    /// `outgoing[dst]`; `None` at our own rank.
    outgoing: Vec<Option<Sender<f64>>>,
    /// `incoming[src]`; `None` at our own rank.
    incoming: Vec<Option<Receiver<f64>>>,
}

impl ThreadComm {
    /// Create `nprocs` connected endpoints, indexed by rank.
    ///
    /// Move each endpoint to the thread that plays that rank.
    pub fn create(nprocs: usize) -> Result<Vec<ThreadComm>, CommError> {
        if nprocs == 0 {
            return Err(CommError::InvalidRankCount { nprocs });
        }

        let mut outgoing: Vec<Vec<Option<Sender<f64>>>> = (0..nprocs)
            .map(|_| (0..nprocs).map(|_| None).collect())
            .collect();
        let mut incoming: Vec<Vec<Option<Receiver<f64>>>> = (0..nprocs)
            .map(|_| (0..nprocs).map(|_| None).collect())
            .collect();

        for src in 0..nprocs {
            for dst in 0..nprocs {
                if src != dst {
                    let (tx, rx) = unbounded();
                    outgoing[src][dst] = Some(tx);
                    incoming[dst][src] = Some(rx);
                }
            }
        }

        Ok(outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| ThreadComm {
                rank,
                nprocs,
                outgoing,
                incoming,
            })
            .collect())
    }

    /// Send `value` to every peer and collect one value per rank, in rank order.
    fn allgather(&self, value: f64) -> Vec<f64> {
        for (dst, tx) in self.outgoing.iter().enumerate() {
            if let Some(tx) = tx {
                if tx.send(value).is_err() {
                    panic!("rank {} left during a collective (send from rank {})", dst, self.rank);
                }
            }
        }

        let mut values = Vec::with_capacity(self.nprocs);
        for (src, rx) in self.incoming.iter().enumerate() {
            match rx {
                None => values.push(value),
                Some(rx) => match rx.recv() {
                    Ok(v) => values.push(v),
                    Err(_) => panic!(
                        "rank {} left during a collective (receive on rank {})",
                        src, self.rank
                    ),
                },
            }
        }
        values
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn nprocs(&self) -> usize {
        self.nprocs
    }

    fn max(&self, value: f64) -> f64 {
        self.allgather(value)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn sum(&self, value: f64) -> f64 {
        self.allgather(value).into_iter().fold(0.0, |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn run_ranks<F>(nprocs: usize, f: F) -> Vec<(f64, f64)>
    where
        F: Fn(&ThreadComm) -> (f64, f64) + Send + Sync + Copy + 'static,
    {
        let comms = ThreadComm::create(nprocs).unwrap();
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| thread::spawn(move || f(&comm)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn serial_reductions_are_identity() {
        let comm = SerialComm;
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.nprocs(), 1);
        assert_eq!(comm.max(3.5), 3.5);
        assert_eq!(comm.sum(-2.0), -2.0);
    }

    #[test]
    fn zero_ranks_rejected() {
        match ThreadComm::create(0) {
            Err(CommError::InvalidRankCount { nprocs: 0 }) => {}
            other => panic!("expected InvalidRankCount, got {other:?}"),
        }
    }

    #[test]
    fn single_thread_rank_behaves_like_serial() {
        let comm = ThreadComm::create(1).unwrap().pop().unwrap();
        assert_eq!(comm.max(7.0), 7.0);
        assert_eq!(comm.sum(7.0), 7.0);
    }

    #[test]
    fn max_agrees_on_every_rank() {
        let results = run_ranks(4, |comm| {
            let local = (comm.rank() as f64 - 1.5).powi(2);
            (comm.max(local), 0.0)
        });
        for (max, _) in results {
            assert_eq!(max, 2.25);
        }
    }

    #[test]
    fn sum_is_bit_identical_on_every_rank() {
        let results = run_ranks(5, |comm| {
            let local = 0.1 * (comm.rank() as f64 + 1.0);
            (comm.sum(local), 0.0)
        });
        let first = results[0].0;
        assert!((first - 1.5).abs() < 1e-12);
        for (sum, _) in &results {
            assert_eq!(sum.to_bits(), first.to_bits());
        }
    }

    #[test]
    fn successive_collectives_do_not_mix() {
        // Rank 0 races ahead through two collectives; values must still pair up per call.
        let results = run_ranks(3, |comm| {
            let a = comm.max(comm.rank() as f64);
            let b = comm.sum(10.0 * comm.rank() as f64);
            (a, b)
        });
        for (a, b) in results {
            assert_eq!(a, 2.0);
            assert_eq!(b, 30.0);
        }
    }
}
