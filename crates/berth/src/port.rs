//! Random free-port allocation for test servers.
//!
//! Ports are drawn uniformly from a dedicated range and probed with a TCP
//! connect to localhost: a candidate is accepted once the connect attempt
//! fails (nothing is listening there). This is a liveness probe, not a
//! reservation - there is an inherent race window between probing and the
//! caller's actual bind. With a 10,000-port range that race is acceptable
//! for test environments; it would not be for production.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::ops::Range;
use std::time::Duration;

/// The closed-open port range test servers allocate from.
pub const PORT_RANGE: Range<u16> = 50_000..60_000;

/// How long a probe waits for a connection before declaring the port free.
const PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Allocates collision-free TCP ports from [`PORT_RANGE`].
///
/// The randomness source is owned by the allocator and can be seeded, so
/// tests of allocation behavior are deterministic. The allocator keeps no
/// other state; every call probes the live system.
///
/// # Example
///
/// ```ignore
/// let mut allocator = PortAllocator::new();
/// let port = allocator.allocate();
/// assert!((50_000..60_000).contains(&port));
/// ```
#[derive(Debug)]
pub struct PortAllocator {
    rng: StdRng,
}

impl PortAllocator {
    /// Creates an allocator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates an allocator with a fixed seed.
    ///
    /// Two allocators with the same seed draw the same candidate sequence,
    /// which makes retry behavior reproducible in tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns a random port from [`PORT_RANGE`] that nothing is listening on.
    ///
    /// Loops until a probe succeeds; the range is assumed to be sparsely
    /// occupied, so no retry bound is enforced. A fully saturated range
    /// would make this spin - a known limitation.
    pub fn allocate(&mut self) -> u16 {
        loop {
            let port = self.rng.random_range(PORT_RANGE);
            if probe_is_free(port) {
                return port;
            }
        }
    }
}

impl Default for PortAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if nothing accepts TCP connections on `localhost:port`.
fn probe_is_free(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_err()
}
