//! Completion certificate.
//!
//! A single printable HTML page. Only passed sessions get one.

use std::path::Path;

use anyhow::{bail, Context, Result};

use h2trainer_core::session::SessionResult;

use crate::{ensure_parent, html_escape};

pub const DEFAULT_ISSUER: &str = "Hydrogen Safety Trainer";

#[derive(Debug, Clone)]
pub struct CertificateOptions {
    /// Organisation named under the title.
    pub issuer: String,
    /// When set, the certificate links to `{base}{certificate id}`.
    pub verify_url_base: Option<String>,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            verify_url_base: None,
        }
    }
}

/// Verification link for `result`, if a base URL was given.
pub fn verify_url(result: &SessionResult, options: &CertificateOptions) -> Option<String> {
    options
        .verify_url_base
        .as_deref()
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .map(|base| format!("{base}{}", result.certificate_id()))
}

/// Render the certificate. Fails if the session did not pass.
pub fn generate_certificate_html(result: &SessionResult, options: &CertificateOptions) -> Result<String> {
    if !result.passed {
        bail!(
            "minimum {}% required for a certificate (scored {}%)",
            result.threshold_percent,
            result.percent
        );
    }

    let name = if result.user_name.trim().is_empty() {
        "Participant"
    } else {
        result.user_name.trim()
    };
    let issuer = if options.issuer.trim().is_empty() {
        DEFAULT_ISSUER
    } else {
        options.issuer.trim()
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>Certificate: {}</title>\n", html_escape(name)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n</head>\n<body>\n<main class=\"certificate\">\n");

    html.push_str("<h1>CERTIFICATE OF COMPLETION</h1>\n");
    html.push_str(&format!("<p class=\"issuer\">{}</p>\n", html_escape(issuer)));
    html.push_str(&format!(
        "<p class=\"number\">Certificate No: {}</p>\n",
        result.certificate_id()
    ));
    html.push_str(&format!(
        "<p class=\"score\">Score: {}/{} ({}%)</p>\n",
        result.score, result.total, result.percent
    ));
    html.push_str(&format!(
        "<p class=\"date\">Date: {}</p>\n",
        result.completed_at.format("%Y-%m-%d %H:%M")
    ));
    html.push_str(&format!("<p class=\"recipient\">{}</p>\n", html_escape(name)));

    if let Some(url) = verify_url(result, options) {
        let url = html_escape(&url);
        html.push_str(&format!(
            "<p class=\"verify\">Verify: <a href=\"{url}\">{url}</a></p>\n"
        ));
    }

    html.push_str("<div class=\"signature\"><span>Director</span></div>\n");
    html.push_str(
        "<footer>For educational purposes only. Not a substitute for code compliance or professional training.</footer>\n",
    );
    html.push_str("</main>\n</body>\n</html>");
    Ok(html)
}

/// Write the certificate to a file. Fails without writing if the session
/// did not pass.
pub fn write_certificate(result: &SessionResult, options: &CertificateOptions, path: &Path) -> Result<()> {
    let html = generate_certificate_html(result, options)?;
    ensure_parent(path)?;
    std::fs::write(path, html)
        .with_context(|| format!("failed to write certificate to {}", path.display()))?;
    tracing::info!("certificate {} written to {}", result.certificate_id(), path.display());
    Ok(())
}

const CSS: &str = r#"
@page { size: A4; margin: 1cm; }
body { font-family: Helvetica, Arial, sans-serif; margin: 0; padding: 1cm; color: #111; }
.certificate { border: 4px solid #111; outline: 1px solid #111; outline-offset: -0.4cm; padding: 3cm 2cm; text-align: center; min-height: 24cm; position: relative; }
h1 { font-size: 28pt; margin: 2cm 0 0.5cm; }
.issuer { font-size: 13pt; }
.number { font-size: 11pt; }
.score { font-size: 12pt; }
.date { font-size: 11pt; font-style: italic; }
.recipient { font-size: 20pt; font-weight: bold; margin-top: 1.5cm; }
.verify { font-size: 8pt; position: absolute; right: 1cm; bottom: 1cm; }
.signature { margin: 3cm auto 0; width: 10cm; border-top: 1px solid #111; padding-top: 0.3cm; font-size: 10pt; }
footer { font-size: 8.5pt; margin-top: 0.7cm; }
"#;
