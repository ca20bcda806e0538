pub mod relay;

pub use relay::{ListenerConfig, RelayConfig};
