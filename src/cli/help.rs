//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "tree", "delete_key").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::Expand { .. } => "expand",
        Commands::Values { .. } => "values",
        Commands::Exists { .. } => "exists",
        Commands::CreateKey { .. } => "create_key",
        Commands::SetValue { .. } => "set_value",
        Commands::DeleteKey { .. } => "delete_key",
        Commands::DeleteValue { .. } => "delete_value",
        Commands::Export { .. } => "export",
        Commands::Import { .. } => "import",
    }
}

/// Whether the command can change the store.
pub fn is_mutation(command: &Commands) -> bool {
    matches!(
        command,
        Commands::CreateKey { .. }
            | Commands::SetValue { .. }
            | Commands::DeleteKey { .. }
            | Commands::DeleteValue { .. }
            | Commands::Import { .. }
    )
}
