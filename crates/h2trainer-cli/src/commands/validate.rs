//! The `h2trainer validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use h2trainer_core::bank::{validate_bank, QuestionBank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = QuestionBank::load_path(&bank_path)
        .with_context(|| format!("failed to load question bank {}", bank_path.display()))?;

    let categories: Vec<String> = bank.categories().into_iter().collect();
    println!(
        "Question bank: {} ({} questions)",
        bank_path.display(),
        bank.len()
    );
    println!("Categories: {}", categories.join(", "));

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
