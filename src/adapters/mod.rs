//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to                  |
//! |------------|-------------|------------------------------|
//! | `hardware` | SensorPort  | Command GPIO, ADC1           |
//! |            | MotorPort   | H-bridge (LEDC + 2 GPIO)     |
//! | `log_sink` | EventSink   | Serial log output            |
//! | `time`     | (clock)     | ESP32 high-resolution timer  |

pub mod hardware;
pub mod log_sink;
pub mod time;
