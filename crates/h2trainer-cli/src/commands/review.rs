//! The `h2trainer review` command.

use std::path::PathBuf;

use anyhow::Result;

use h2trainer_core::session::SessionResult;

use super::quiz::print_result;

pub fn execute(results_path: PathBuf) -> Result<()> {
    let result = SessionResult::load_json(&results_path)?;
    println!(
        "Trainee: {} | Completed: {}",
        if result.user_name.is_empty() { "(unnamed)" } else { result.user_name.as_str() },
        result.completed_at.format("%Y-%m-%d %H:%M UTC")
    );
    print_result(&result, &mut std::io::stdout().lock())
}
