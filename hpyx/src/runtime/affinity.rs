//! Pinning worker threads to CPU cores.

use crate::config::BindPolicy;

use std::thread;

/// Applies `policy` to the calling worker thread.
///
/// Returns `false` when pinning was requested but could not be applied.
pub(crate) fn bind_current(policy: BindPolicy, worker_id: usize) -> bool {
    match policy {
        BindPolicy::None => true,
        BindPolicy::Compact => {
            let cores = thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);

            pin_to_core(worker_id % cores)
        }
    }
}

#[cfg(target_os = "linux")]
fn pin_to_core(core: usize) -> bool {
    // Safety: `cpu_set_t` is plain data; zeroed is the empty set, and the
    // libc macros only index into it.
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);

        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
    }
}

#[cfg(windows)]
fn pin_to_core(core: usize) -> bool {
    use windows_sys::Win32::System::Threading::{GetCurrentThread, SetThreadAffinityMask};

    if core >= usize::BITS as usize {
        return false;
    }

    // Safety: the pseudo handle from `GetCurrentThread` is always valid for
    // the calling thread.
    unsafe { SetThreadAffinityMask(GetCurrentThread(), 1usize << core) != 0 }
}

#[cfg(not(any(target_os = "linux", windows)))]
fn pin_to_core(_core: usize) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_policy_always_succeeds() {
        assert!(bind_current(BindPolicy::None, 7));
    }
}
