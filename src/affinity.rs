//! Thread-to-core binding.
//!
//! An unpinned measurement thread can migrate mid-run and report the latency
//! of whatever pair the scheduler happened to pick, so a failed bind is
//! treated as fatal by [`pin_or_exit`].

use std::process;

use tracing::debug;

use crate::error::AffinityError;
use crate::CoreId;

/// Width of the kernel cpu mask we hand to `sched_setaffinity` (glibc's `cpu_set_t`).
pub const MAX_CORES: usize = 1024;

/// Restrict the calling thread to `core`.
#[cfg(target_os = "linux")]
pub fn bind(core: CoreId) -> Result<(), AffinityError> {
    use std::io;
    use syscalls::{syscall, Sysno};

    const WORD_BITS: usize = u64::BITS as usize;

    if core >= MAX_CORES {
        return Err(AffinityError::OutOfRange {
            core,
            limit: MAX_CORES,
        });
    }

    let mut mask = [0u64; MAX_CORES / WORD_BITS];
    mask[core / WORD_BITS] |= 1 << (core % WORD_BITS);

    // pid 0 is the calling thread, not the whole process.
    let res = unsafe {
        syscall!(
            Sysno::sched_setaffinity,
            0,
            std::mem::size_of_val(&mask),
            mask.as_ptr()
        )
    };

    res.map(|_| ()).map_err(|errno| AffinityError::Os {
        core,
        source: io::Error::from_raw_os_error(errno.into_raw()),
    })
}

/// Restrict the calling thread to `core`.
#[cfg(not(target_os = "linux"))]
pub fn bind(core: CoreId) -> Result<(), AffinityError> {
    if core_affinity::set_for_current(core_affinity::CoreId { id: core }) {
        Ok(())
    } else {
        Err(AffinityError::Rejected { core })
    }
}

/// Bind the calling thread to `core`, or report the failure on stderr and
/// terminate the process with status 1.
pub fn pin_or_exit(core: CoreId) {
    if let Err(err) = bind(core) {
        eprintln!("{err}");
        process::exit(1);
    }
    debug!(
        core,
        thread = std::thread::current().name().unwrap_or("<unnamed>"),
        "thread pinned"
    );
}

/// Logical cores this process may run on, ascending. Empty if unknown.
///
/// These are real cpu ids: under `taskset -c 2,3` this is `[2, 3]`.
pub fn core_ids() -> Vec<CoreId> {
    let mut ids: Vec<CoreId> = core_affinity::get_core_ids()
        .unwrap_or_default()
        .into_iter()
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
