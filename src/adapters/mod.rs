//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements        | Connects to               |
//! |------------|-------------------|---------------------------|
//! | `hardware` | SensorDriverPort  | APDS9960 register driver  |
//! |            | DriverFactory     | embedded-hal / Linux I2C  |
//! | `log_sink` | log::Log          | stderr                    |
//! | `time`     | ClockPort         | `std::time::Instant`      |

pub mod hardware;
pub mod log_sink;
pub mod time;
