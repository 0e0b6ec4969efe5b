//! The `h2trainer quiz` command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use comfy_table::{Cell, Table};

use h2trainer_core::bank::QuestionBank;
use h2trainer_core::engine::{QuizEngine, SessionConfig};
use h2trainer_core::grading::{parse_count, PassThreshold};
use h2trainer_core::session::{SessionContext, SessionResult};
use h2trainer_report::certificate::{write_certificate, CertificateOptions};
use h2trainer_report::html::write_html_report;

use crate::config::load_config_from;
use crate::QuizArgs;

pub fn execute(args: QuizArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let bank_path = args
        .bank
        .clone()
        .or_else(|| config.question_bank.clone())
        .context("no question bank given: pass --bank or set question_bank in h2trainer.toml")?;
    let bank = QuestionBank::load_path(&bank_path)
        .with_context(|| format!("failed to load question bank {}", bank_path.display()))?;
    anyhow::ensure!(!bank.is_empty(), "question bank {} is empty", bank_path.display());

    let session_config = SessionConfig {
        count: args
            .count
            .as_deref()
            .map(parse_count)
            .unwrap_or(config.question_count.max(1)),
        category: args
            .category
            .clone()
            .filter(|c| !c.trim().is_empty() && !c.eq_ignore_ascii_case("all")),
        shuffle: config.shuffle && !args.no_shuffle,
    };
    let threshold = args
        .threshold
        .as_deref()
        .map(PassThreshold::parse_percent)
        .unwrap_or_else(|| config.pass_threshold());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let user_name = match &args.name {
        Some(name) => name.clone(),
        None => {
            write!(out, "Your name (for the certificate): ")?;
            out.flush()?;
            read_trimmed_line(&mut input)?.unwrap_or_default()
        }
    };

    let mut engine = QuizEngine::new(bank);
    let mut ctx = SessionContext::new(user_name, threshold, session_config);
    ctx.start(&mut engine);
    if engine.total() == 0 {
        let available: Vec<String> = engine.bank().categories().into_iter().collect();
        bail!(
            "no questions in category {:?}. Available: {}",
            ctx.config.category.as_deref().unwrap_or_default(),
            available.join(", ")
        );
    }

    let result = run_session(&mut engine, &mut ctx, &mut input, &mut out)?;
    print_result(&result, &mut out)?;

    let output_dir = args.output.clone().unwrap_or(config.output_dir.clone());
    if let Some(format) = &args.format {
        export(&result, format, &output_dir, &mut out)?;
    }

    if let Some(path) = &args.certificate {
        if result.passed {
            let options = CertificateOptions {
                issuer: args.issuer.clone().unwrap_or(config.issuer.clone()),
                verify_url_base: args.verify_url.clone().or(config.verify_url_base.clone()),
            };
            write_certificate(&result, &options, path)?;
            writeln!(out, "Certificate saved: {}", path.display())?;
        } else {
            writeln!(
                out,
                "Certificate not issued: minimum {}% required. Please retake the quiz.",
                result.threshold_percent
            )?;
        }
    }

    Ok(())
}

/// Ask every question of the prepared session and grade it.
pub fn run_session<R: BufRead, W: Write>(
    engine: &mut QuizEngine,
    ctx: &mut SessionContext,
    input: &mut R,
    out: &mut W,
) -> Result<SessionResult> {
    let total = engine.total();

    while let Some(question) = engine.current().cloned() {
        writeln!(
            out,
            "\nQuestion {}/{}  [{}]",
            engine.index() + 1,
            total,
            question.category
        )?;
        writeln!(out, "{}", question.question)?;
        for (i, choice) in question.choices.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, choice)?;
        }

        let chosen = read_choice(input, out, question.choices.len())?;
        let outcome = engine.check_and_record(chosen);
        if outcome.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Incorrect. Correct answer: {}", question.correct_text())?;
        }
        if !outcome.rationale.is_empty() {
            writeln!(out, "Why: {}", outcome.rationale)?;
        }
        writeln!(
            out,
            "Progress: {}/{} answered, {} correct",
            engine.history().len(),
            total,
            engine.score()
        )?;

        if !engine.advance() {
            break;
        }
    }

    Ok(ctx.finish(engine))
}

/// Prompt until a number in `1..=choices` is entered. Returns the
/// zero-based index.
fn read_choice<R: BufRead, W: Write>(input: &mut R, out: &mut W, choices: usize) -> Result<usize> {
    loop {
        write!(out, "Your answer (1-{choices}): ")?;
        out.flush()?;
        let Some(line) = read_trimmed_line(input)? else {
            bail!("input ended before the quiz was finished");
        };
        match line.parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => return Ok(n - 1),
            _ => writeln!(out, "Please enter a number between 1 and {choices}.")?,
        }
    }
}

/// `None` at end of input.
fn read_trimmed_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Status line, summary, recommendations and the per-category table.
pub fn print_result<W: Write>(result: &SessionResult, out: &mut W) -> Result<()> {
    writeln!(out, "\n{}\n", result.status_line())?;
    writeln!(out, "{}", result.summary())?;

    let recommendations = result.recommendations.render();
    if !recommendations.is_empty() {
        writeln!(out, "{recommendations}")?;
    }

    let breakdown = result.category_breakdown();
    if !breakdown.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Correct", "Answered", "Score"]);
        for c in &breakdown {
            table.add_row(vec![
                Cell::new(&c.category),
                Cell::new(c.correct),
                Cell::new(c.answered),
                Cell::new(format!(
                    "{}%",
                    h2trainer_core::engine::percent(c.correct, c.answered)
                )),
            ]);
        }
        writeln!(out, "\n{table}")?;
    }
    Ok(())
}

fn export<W: Write>(result: &SessionResult, format: &str, output: &Path, out: &mut W) -> Result<()> {
    let timestamp = result.completed_at.format("%Y-%m-%dT%H%M%S");
    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("results-{timestamp}.json"));
                result.save_json(&path)?;
                writeln!(out, "Results saved to: {}", path.display())?;
            }
            "html" => {
                let path = output.join(format!("results-{timestamp}.html"));
                write_html_report(result, &path)?;
                writeln!(out, "HTML report: {}", path.display())?;
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }
    Ok(())
}
