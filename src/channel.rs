//! Shared-memory hand-off between a sender and a listener thread.
//!
//! One round of the protocol, for sequence number `seq`:
//!
//! 1. sender publishes `seq` on the first line (and the second, for [`ChannelWidth::Dual`])
//! 2. listener spins until the first line (then the second) reads `seq`
//! 3. listener publishes [`IDLE`] on the first line
//! 4. sender spins until the first line reads [`IDLE`]
//!
//! Publishes are release stores and observations are acquire loads, so the
//! timestamps the sender takes around a round cannot be reordered into it.
//! Nothing here times out: a lost signal spins forever.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Value of the first line while no signal is outstanding.
pub const IDLE: u64 = 0;

/// Number of cache lines touched per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelWidth {
    Single,
    Dual,
}

impl ChannelWidth {
    /// Sweep order.
    pub const ALL: [ChannelWidth; 2] = [ChannelWidth::Single, ChannelWidth::Dual];

    pub fn lines(self) -> u8 {
        match self {
            ChannelWidth::Single => 1,
            ChannelWidth::Dual => 2,
        }
    }
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines())
    }
}

/// A single shared cell of the channel.
pub trait Line: Default + Send + Sync {
    /// Store `value` with release ordering.
    fn publish(&self, value: u64);

    /// Load the current value with acquire ordering.
    fn observe(&self) -> u64;
}

/// Production cell: an atomic alone on its cache line.
pub type PaddedLine = CachePadded<AtomicU64>;

impl Line for CachePadded<AtomicU64> {
    #[inline(always)]
    fn publish(&self, value: u64) {
        self.store(value, Ordering::Release);
    }

    #[inline(always)]
    fn observe(&self) -> u64 {
        self.load(Ordering::Acquire)
    }
}

pub struct PingPong<L = PaddedLine> {
    first: L,
    second: L,
    width: ChannelWidth,
}

impl<L: Line> PingPong<L> {
    pub fn new(width: ChannelWidth) -> Self {
        Self {
            first: L::default(),
            second: L::default(),
            width,
        }
    }

    pub fn first(&self) -> &L {
        &self.first
    }

    pub fn second(&self) -> &L {
        &self.second
    }

    /// Step 1, sender side.
    #[inline(always)]
    pub fn signal(&self, seq: u64) {
        debug_assert_ne!(seq, IDLE);
        self.first.publish(seq);
        if self.width == ChannelWidth::Dual {
            self.second.publish(seq);
        }
    }

    /// Step 2, listener side.
    #[inline(always)]
    pub fn wait_signal(&self, seq: u64) {
        // Plain spins: a pause hint would land inside the measured round.
        while self.first.observe() != seq {}
        if self.width == ChannelWidth::Dual {
            while self.second.observe() != seq {}
        }
    }

    /// Step 3, listener side.
    #[inline(always)]
    pub fn acknowledge(&self) {
        self.first.publish(IDLE);
    }

    /// Step 4, sender side.
    #[inline(always)]
    pub fn wait_ack(&self) {
        while self.first.observe() != IDLE {}
    }
}

impl<L: Line> fmt::Debug for PingPong<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingPong")
            .field("width", &self.width)
            .field("first", &self.first.observe())
            .field("second", &self.second.observe())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Cell that counts observations and records every published value.
    #[derive(Default)]
    pub(crate) struct CountingLine {
        value: AtomicU64,
        pub(crate) reads: AtomicUsize,
        pub(crate) writes: Mutex<Vec<u64>>,
    }

    impl Line for CountingLine {
        fn publish(&self, value: u64) {
            self.writes.lock().unwrap().push(value);
            self.value.store(value, Ordering::Release);
        }

        fn observe(&self) -> u64 {
            self.reads.fetch_add(1, Ordering::Relaxed);
            self.value.load(Ordering::Acquire)
        }
    }

    fn run_rounds(channel: &PingPong<CountingLine>, rounds: u64) {
        thread::scope(|s| {
            s.spawn(|| {
                for seq in 1..=rounds {
                    channel.wait_signal(seq);
                    channel.acknowledge();
                }
            });
            for seq in 1..=rounds {
                channel.signal(seq);
                channel.wait_ack();
            }
        });
    }

    #[test]
    fn width_renders_as_line_count() {
        assert_eq!(ChannelWidth::Single.to_string(), "1");
        assert_eq!(ChannelWidth::Dual.to_string(), "2");
        assert_eq!(ChannelWidth::ALL, [ChannelWidth::Single, ChannelWidth::Dual]);
    }

    #[test]
    fn lines_start_idle() {
        let channel = PingPong::<PaddedLine>::new(ChannelWidth::Dual);
        assert_eq!(channel.first().observe(), IDLE);
        assert_eq!(channel.second().observe(), IDLE);
    }

    #[test]
    fn single_width_never_touches_second_line() {
        let channel = PingPong::<CountingLine>::new(ChannelWidth::Single);
        run_rounds(&channel, 200);

        assert_eq!(channel.second().reads.load(Ordering::Relaxed), 0);
        assert!(channel.second().writes.lock().unwrap().is_empty());
        assert!(channel.first().reads.load(Ordering::Relaxed) >= 400);
    }

    #[test]
    fn dual_width_reads_second_line_every_round() {
        let channel = PingPong::<CountingLine>::new(ChannelWidth::Dual);
        run_rounds(&channel, 200);

        assert!(channel.second().reads.load(Ordering::Relaxed) >= 200);
        let writes = channel.second().writes.lock().unwrap();
        assert_eq!(*writes, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn first_line_alternates_sequence_and_ack() {
        let channel = PingPong::<CountingLine>::new(ChannelWidth::Single);
        run_rounds(&channel, 50);

        let writes = channel.first().writes.lock().unwrap();
        let expected: Vec<u64> = (1..=50).flat_map(|seq| [seq, IDLE]).collect();
        assert_eq!(*writes, expected);
    }

    #[test]
    fn dual_round_waits_for_both_lines() {
        let channel = PingPong::<PaddedLine>::new(ChannelWidth::Dual);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                channel.wait_signal(1);
                done.store(true, Ordering::Release);
            });

            channel.first().publish(1);
            thread::sleep(Duration::from_millis(50));
            assert!(!done.load(Ordering::Acquire));

            channel.second().publish(1);
        });

        assert!(done.load(Ordering::Acquire));
    }

    #[test]
    fn stale_ack_does_not_satisfy_next_signal() {
        let channel = PingPong::<PaddedLine>::new(ChannelWidth::Single);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                channel.wait_signal(2);
                done.store(true, Ordering::Release);
            });

            channel.signal(1);
            thread::sleep(Duration::from_millis(50));
            assert!(!done.load(Ordering::Acquire));

            channel.signal(2);
        });

        assert!(done.load(Ordering::Acquire));
    }
}
