//! Timing Primitives
//!
//! A [`Timer`] brackets the whole repeat loop of one step. It reports
//! wall-clock nanoseconds from `std::time::Instant` and, where the CPU
//! exposes one to user space, the raw tick counter delta (RDTSCP on x86_64,
//! CNTVCT_EL0 on AArch64).

use std::time::Instant;

/// Whether [`Elapsed::ticks`] carries a hardware counter reading.
/// Without one, ticks are always 0.
pub const HAS_CYCLE_COUNTER: bool = cfg!(any(target_arch = "x86_64", target_arch = "aarch64"));

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn ticks() -> u64 {
    let mut core_id = 0u32;
    // SAFETY: RDTSCP only reads the time-stamp counter and IA32_TSC_AUX.
    unsafe { std::arch::x86_64::__rdtscp(&mut core_id) }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn ticks() -> u64 {
    let value: u64;
    // SAFETY: the virtual count register is readable at EL0 and the read
    // touches no memory.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) value, options(nostack, nomem));
    }
    value
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn ticks() -> u64 {
    0
}

/// Time spent between [`Timer::start`] and [`Timer::stop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Wall-clock nanoseconds, saturating at `u64::MAX`
    pub nanos: u64,
    /// Hardware counter delta (0 without [`HAS_CYCLE_COUNTER`])
    pub ticks: u64,
}

/// Stopwatch for one measured region
#[derive(Debug)]
pub struct Timer {
    wall: Instant,
    ticks: u64,
}

impl Timer {
    /// Start measuring
    #[inline(always)]
    pub fn start() -> Self {
        let ticks = ticks();
        Self {
            wall: Instant::now(),
            ticks,
        }
    }

    /// Read the time since [`Timer::start`]. The timer keeps running.
    #[inline(always)]
    pub fn stop(&self) -> Elapsed {
        let wall = self.wall.elapsed();
        Elapsed {
            nanos: u64::try_from(wall.as_nanos()).unwrap_or(u64::MAX),
            ticks: ticks().saturating_sub(self.ticks),
        }
    }
}

/// Bind the calling thread to core `cpu` so a sweep is not migrated
/// between cores while it measures.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> std::io::Result<()> {
    let set = single_cpu_set(cpu)?;
    // SAFETY: `set` is a fully initialized cpu_set_t and pid 0 names the
    // calling thread.
    let rc = unsafe { libc::sched_setaffinity(0, std::mem::size_of_val(&set), &set) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(target_os = "linux")]
fn single_cpu_set(cpu: usize) -> std::io::Result<libc::cpu_set_t> {
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cpu {cpu} out of range"),
        ));
    }
    // SAFETY: cpu_set_t is a plain bit array, all zeroes is the empty set,
    // and `cpu` was checked against CPU_SETSIZE.
    unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(cpu, &mut set);
        Ok(set)
    }
}

/// Pinning is Linux-only; elsewhere the sweep runs wherever the OS puts it.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timer_covers_sleep() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();

        assert!(elapsed.nanos >= 5_000_000);
        if !HAS_CYCLE_COUNTER {
            assert_eq!(elapsed.ticks, 0);
        }
    }

    #[test]
    fn test_ticks_do_not_go_backwards() {
        if HAS_CYCLE_COUNTER {
            let a = ticks();
            let b = ticks();
            assert!(b >= a);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_cpu_out_of_range_rejected() {
        let err = pin_to_cpu(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
