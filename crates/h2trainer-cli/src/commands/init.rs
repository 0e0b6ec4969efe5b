//! The `h2trainer init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create h2trainer.toml
    if std::path::Path::new(crate::config::CONFIG_FILE).exists() {
        println!("h2trainer.toml already exists, skipping.");
    } else {
        std::fs::write(crate::config::CONFIG_FILE, SAMPLE_CONFIG)?;
        println!("Created h2trainer.toml");
    }

    // Create sample question bank
    std::fs::create_dir_all("question-banks")?;
    let bank_path = std::path::Path::new("question-banks/hydrogen-safety.json");
    if bank_path.exists() {
        println!("question-banks/hydrogen-safety.json already exists, skipping.");
    } else {
        std::fs::write(bank_path, SAMPLE_BANK)?;
        println!("Created question-banks/hydrogen-safety.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: h2trainer validate --bank question-banks/hydrogen-safety.json");
    println!("  2. Run: h2trainer quiz --format html --certificate certificate.html");
    println!("  3. Run: h2trainer simulate --live");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# h2trainer configuration

question_bank = "question-banks/hydrogen-safety.json"
question_count = 10
shuffle = true
pass_threshold_percent = 70
output_dir = "./h2trainer-results"
issuer = "Hydrogen Safety Trainer"
# verify_url_base = "https://example.org/verify?id="

[simulation]
leak_rate = 0.8
vent_strength = 0.6
buoyancy = 0.45
diffusion = 0.2
tick_interval_ms = 40
"#;

const SAMPLE_BANK: &str = include_str!("../../../../question-banks/hydrogen-safety.json");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use h2trainer_core::bank::{validate_bank, QuestionBank};

    #[test]
    fn sample_config_parses() {
        let config: TrainerConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.pass_threshold().percent(), 70);
        assert_eq!(config.simulation.tick_interval_ms, 40);
    }

    #[test]
    fn sample_bank_is_clean() {
        let bank = QuestionBank::from_json_str(SAMPLE_BANK).unwrap();
        assert_eq!(bank.len(), 10);
        assert!(validate_bank(&bank).is_empty());
    }
}
