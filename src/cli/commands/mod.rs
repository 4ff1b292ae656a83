pub mod load;
pub mod publish;
pub mod rebind;

pub use load::{LoadTablesCommands, handle_load_tables_command};
pub use publish::{PublishCommands, handle_publish_command};
pub use rebind::{RebindCommands, handle_rebind_command};
