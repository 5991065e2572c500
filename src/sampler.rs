//! Two pinned threads, one channel, `iterations` timed rounds.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::affinity;
use crate::channel::{ChannelWidth, Line, PaddedLine, PingPong};
use crate::error::{Role, SampleError};
use crate::CoreId;

/// Half round-trip times in nanoseconds, in round order.
pub type SampleSet = Vec<u64>;

/// Measure `iterations` rounds from `src` to `dst` over a cache-padded channel.
pub fn sample(
    src: CoreId,
    dst: CoreId,
    width: ChannelWidth,
    iterations: u64,
) -> Result<SampleSet, SampleError> {
    sample_with::<PaddedLine>(src, dst, width, iterations)
}

/// [`sample`] over an arbitrary [`Line`] type.
///
/// The sender thread pins itself to `src`, spawns the listener (which pins
/// itself to `dst`), runs every round and joins the listener before handing
/// back its samples. Both threads exit when this returns; nothing is pooled,
/// so no pinning outlives the measurement.
pub fn sample_with<L: Line + 'static>(
    src: CoreId,
    dst: CoreId,
    width: ChannelWidth,
    iterations: u64,
) -> Result<SampleSet, SampleError> {
    let channel = Arc::new(PingPong::<L>::new(width));

    let sender = thread::Builder::new()
        .name(format!("sender-{src}"))
        .spawn(move || -> Result<SampleSet, SampleError> {
            affinity::pin_or_exit(src);

            let listener = {
                let channel = Arc::clone(&channel);
                thread::Builder::new()
                    .name(format!("listener-{dst}"))
                    .spawn(move || {
                        affinity::pin_or_exit(dst);
                        listen_rounds(&channel, iterations);
                    })
                    .map_err(|source| SampleError::Spawn {
                        role: Role::Listener,
                        source,
                    })?
            };

            let samples = send_rounds(&channel, iterations);

            listener.join().map_err(|_| SampleError::Panicked {
                role: Role::Listener,
            })?;
            Ok(samples)
        })
        .map_err(|source| SampleError::Spawn {
            role: Role::Sender,
            source,
        })?;

    let samples = sender.join().map_err(|_| SampleError::Panicked {
        role: Role::Sender,
    })??;

    debug!(src, dst, %width, rounds = samples.len(), "sampling finished");
    Ok(samples)
}

/// Sender half: signal sequence numbers `1..=iterations` and time each round.
pub fn send_rounds<L: Line>(channel: &PingPong<L>, iterations: u64) -> SampleSet {
    // Only a reservation; a count beyond usize grows the vector as it goes.
    let mut samples = Vec::with_capacity(usize::try_from(iterations).unwrap_or(0));

    for seq in 1..=iterations {
        let start = Instant::now();

        channel.signal(seq);
        channel.wait_ack();

        let rtt_ns = start.elapsed().as_nanos() as u64;
        samples.push(rtt_ns / 2);
    }

    samples
}

/// Listener half: acknowledge sequence numbers `1..=iterations` in order.
pub fn listen_rounds<L: Line>(channel: &PingPong<L>, iterations: u64) {
    for seq in 1..=iterations {
        channel.wait_signal(seq);
        channel.acknowledge();
    }
}
