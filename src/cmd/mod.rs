//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module    | Commands handled      |
//! |-----------|-----------------------|
//! | `env`     | `EnvInit`             |
//! | `cleanup` | `Cleanup`, `Status`   |
//! | `serve`   | `Serve`               |

pub mod cleanup;
pub mod env;
pub mod serve;

pub use cleanup::{cmd_cleanup, cmd_status};
pub use env::cmd_env_init;
pub use serve::cmd_serve;
