pub mod oracle_config;
pub mod position;
pub mod vault;
pub mod vault_period;
pub mod vault_proto_config;

pub use oracle_config::*;
pub use position::*;
pub use vault::*;
pub use vault_period::*;
pub use vault_proto_config::*;
