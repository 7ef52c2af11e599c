//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements | Connects to                        |
//! |--------------|------------|------------------------------------|
//! | `hardware`   | LinePort   | any embedded-hal 1.0 digital pins  |
//! | `linux_gpio` | (factory)  | Linux sysfs GPIO                   |
//! | `http`       | RemotePort | order API over HTTPS               |
//! | `log_sink`   | EventSink  | `log` facade                       |
//! | `time`       | ClockPort  | OS monotonic clock                 |

pub mod hardware;
pub mod http;
#[cfg(feature = "linux-gpio")]
pub mod linux_gpio;
pub mod log_sink;
pub mod time;
mod wire;
