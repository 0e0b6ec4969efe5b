//! Hydrogen safety tips shown alongside the quiz.

pub const SAFETY_TIPS: &[&str] = &[
    "Hydrogen is colorless and odorless. Install H2 detectors near the ceiling and around storage and valves.",
    "Provide effective ventilation at the top of enclosures to prevent accumulation.",
    "Keep ignition sources away from hydrogen zones; use EX-rated equipment where required.",
    "Ensure pressure relief devices (PRDs) and burst discs are properly installed and oriented.",
    "Use approved cylinders, periodic inspection and recertification, and correct regulator types.",
    "Clearly label gas lines and storage; keep Safety Data Sheets (SDS) accessible.",
    "Train operators for emergency response: E-stop, isolation valves, safe evacuation.",
    "Bond and ground systems to prevent static discharge during maintenance.",
    "Verify leak tightness after maintenance; perform leak tests regularly.",
    "Maintain adequate clearance distances and follow applicable standards and codes.",
];

/// Tips as a bulleted block.
pub fn render_tips() -> String {
    SAFETY_TIPS
        .iter()
        .map(|tip| format!("• {tip}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_bullet_per_tip() {
        let text = render_tips();
        assert_eq!(text.lines().count(), SAFETY_TIPS.len());
        assert!(text.lines().all(|l| l.starts_with("• ")));
    }
}
