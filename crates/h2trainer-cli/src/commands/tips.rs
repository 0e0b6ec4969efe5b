//! The `h2trainer tips` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("Hydrogen safety tips:\n");
    println!("{}", h2trainer_core::tips::render_tips());
    Ok(())
}
