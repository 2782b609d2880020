//! Momentum CLI.
//!
//! Thin command-line front end over the decision core: scan messages for
//! signals, suggest coaching modes, validate candidate replies, parse
//! check-ins, build daily plans, and walk through calibration interactively.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;

use momentum::calibration::questions::{
    current_question, detect_fast_lane, parse_tone_choice,
};
use momentum::calibration::{machine, CalibrationState, GoalsAndActions, UserState};
use momentum::coaching::mode::{infer_next_mode_with, record_message, SubstanceThreshold};
use momentum::coaching::moves::{apply_move, choose_coaching_move, detect_move_signals, Clarity};
use momentum::coaching::validator::ResponseValidator;
use momentum::coaching::{CoachMode, CoachPolicyState, CoachingMove};
use momentum::config::Config;
use momentum::daily::plan::{format_for_direct_mode_with, generate_daily_plan};
use momentum::daily::readiness::{check_readiness_gate, parse_check_in, ReadinessGate};
use momentum::daily::{BusinessPlan, CheckInResponse, PipelineOpportunity, PriorityContext};
use momentum::logging;
use momentum::signals::Signals;

/// Momentum: decision core for a sales coaching assistant.
#[derive(Parser)]
#[command(name = "momentum", version, about)]
struct Cli {
    /// Path to config.toml (defaults to ~/.momentum/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a message for coaching signals and pick a move.
    Signals {
        /// User message.
        text: String,
    },
    /// Suggest the next coaching mode for a user message.
    Mode {
        /// Mode the conversation is in.
        #[arg(long, default_value = "CLARIFY")]
        from: CoachMode,
        /// The user confirmed the last reflection.
        #[arg(long)]
        confirmed: bool,
        /// User message.
        text: String,
    },
    /// Validate a candidate reply for a mode. Exits 1 when invalid.
    Validate {
        /// Mode the reply was generated in.
        #[arg(long, default_value = "CLARIFY")]
        mode: CoachMode,
        /// Candidate reply.
        text: String,
    },
    /// Parse a check-in and run the readiness gate.
    CheckIn {
        /// Check-in message.
        text: String,
        /// The user already made a missed-day choice.
        #[arg(long)]
        missed_day: bool,
    },
    /// Build a daily plan from a JSON request.
    Plan {
        /// JSON file with goals, plan, pipeline, and priority context.
        #[arg(long)]
        input: PathBuf,
        /// Render as DIRECT-mode prose instead of JSON.
        #[arg(long)]
        direct: bool,
        /// Limit supporting actions to one.
        #[arg(long)]
        reduced_load: bool,
    },
    /// Run calibration interactively over stdin.
    Calibrate {
        /// Write the final calibration state as JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Input for the `plan` command.
#[derive(Debug, Deserialize)]
struct PlanRequest {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    goals_and_actions: Option<GoalsAndActions>,
    #[serde(default)]
    business_plan: Option<BusinessPlan>,
    #[serde(default)]
    pipeline: Vec<PipelineOpportunity>,
    #[serde(default)]
    priority_context: PriorityContext,
    #[serde(default)]
    reduced_load: bool,
}

#[derive(Serialize)]
struct SignalsReport {
    signals: Signals,
    clarity: Clarity,
    coaching_move: CoachingMove,
}

#[derive(Serialize)]
struct ModeReport {
    current_mode: CoachMode,
    next_mode: CoachMode,
    missed_day_pending: bool,
    coaching_move: CoachingMove,
}

#[derive(Serialize)]
struct CheckInReport {
    check_in: CheckInResponse,
    readiness: ReadinessGate,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let _guard = match &config.logging.logs_dir {
        Some(dir) => Some(logging::init_production(dir, &config.logging.level)?),
        None => {
            logging::init_cli(&config.logging.level);
            None
        }
    };

    match cli.command {
        Command::Signals { text } => {
            let (signals, clarity) = detect_move_signals(&text);
            let report = SignalsReport {
                signals,
                clarity,
                coaching_move: choose_coaching_move(&signals, clarity),
            };
            print_json(&report)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Mode {
            from,
            confirmed,
            text,
        } => {
            print_json(&suggest_mode(from, confirmed, &text, &config.coaching.threshold()))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { mode, text } => {
            let result = config.validator.build().validate(&text, mode);
            print_json(&result)?;
            Ok(if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::CheckIn { text, missed_day } => {
            let check_in = parse_check_in(&text);
            let readiness = check_readiness_gate(Some(&check_in), missed_day);
            print_json(&CheckInReport {
                check_in,
                readiness,
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Plan {
            input,
            direct,
            reduced_load,
        } => {
            let validator = config.validator.build();
            run_plan(
                &input,
                direct.then_some(&validator),
                reduced_load || config.daily.reduced_load,
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Calibrate { out } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let state = run_calibration(stdin.lock(), stdout.lock())?;
            if let Some(path) = out {
                let json = serde_json::to_string_pretty(&state)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "calibration state written");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run one message through the missed-day check, move selection, and
/// mode inference from a fresh policy state in `from`.
fn suggest_mode(
    from: CoachMode,
    confirmed: bool,
    text: &str,
    threshold: &SubstanceThreshold,
) -> ModeReport {
    let state = CoachPolicyState {
        current_mode: from,
        ..CoachPolicyState::new()
    };
    let state = apply_move(&record_message(&state, text), text);
    ModeReport {
        current_mode: from,
        next_mode: infer_next_mode_with(&state, text, confirmed, threshold),
        missed_day_pending: state.missed_day_pending,
        coaching_move: state.current_move,
    }
}

/// Build a plan; `direct` carries the validator used to clean DIRECT prose.
fn run_plan(input: &Path, direct: Option<&ResponseValidator>, reduced_load: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request: PlanRequest = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse plan request {}", input.display()))?;

    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let plan = generate_daily_plan(
        date,
        request.goals_and_actions.as_ref(),
        request.business_plan.as_ref(),
        &request.pipeline,
        &request.priority_context,
        request.reduced_load || reduced_load,
    );

    if let Some(validator) = direct {
        println!("{}", format_for_direct_mode_with(&plan, validator));
    } else {
        print_json(&plan)?;
    }
    Ok(())
}

/// Drive the calibration lifecycle from line-oriented input.
///
/// Blank answers skip a question; a fast-lane phrase switches to the short
/// question set. At the draft stage, "edit" reopens calibration and
/// anything affirmative confirms.
fn run_calibration(mut input: impl BufRead, mut output: impl Write) -> Result<CalibrationState> {
    let mut state = machine::start(&CalibrationState::new(), Utc::now());

    writeln!(
        output,
        "Pick a tone: 1) direct executive  2) coach concise  3) neutral minimal"
    )?;
    let tone_line = read_line(&mut input)?.unwrap_or_default();
    if let Some(tone) = parse_tone_choice(&tone_line) {
        state = machine::set_tone(&state, tone);
    }

    loop {
        while let Some(question) = current_question(&state) {
            writeln!(output, "[{}%] {}", machine::progress(&state), question.prompt)?;
            let Some(line) = read_line(&mut input)? else {
                writeln!(output, "Input ended; calibration paused.")?;
                return Ok(state);
            };
            if detect_fast_lane(&line) {
                state = machine::trigger_fast_lane(&state);
                writeln!(output, "Switching to the short version.")?;
            } else if line.trim().is_empty() {
                state = machine::skip_question(&state);
            } else {
                state = machine::record_answer(&state, question.id, &line);
            }
        }

        state = machine::generate_draft(&state, Utc::now());
        if let Some(draft) = &state.goals_and_actions {
            writeln!(output, "Draft goals and actions:")?;
            writeln!(output, "{}", serde_json::to_string_pretty(draft)?)?;
        }
        writeln!(output, "Type \"yes\" to confirm or \"edit\" to change answers.")?;

        let reply = read_line(&mut input)?.unwrap_or_default();
        if reply.trim().eq_ignore_ascii_case("edit") {
            state = machine::edit(&state);
            state = revise_answers(state, &mut input, &mut output)?;
            continue;
        }
        if momentum::signals::is_affirmation(&reply) {
            state = machine::confirm(&state, Utc::now());
            state = machine::activate(&state);
        }
        break;
    }

    if state.user_state == UserState::ActionsActive {
        writeln!(output, "Calibration complete. Daily actions are unlocked.")?;
    } else {
        writeln!(output, "Draft saved without confirmation.")?;
    }
    Ok(state)
}

/// Re-ask each answered question; blank keeps the current answer.
fn revise_answers(
    mut state: CalibrationState,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<CalibrationState> {
    let answered: Vec<(String, String)> = state
        .answers
        .iter()
        .map(|(id, answer)| (id.clone(), answer.clone()))
        .collect();
    for (id, answer) in answered {
        writeln!(output, "{id} [{answer}]:")?;
        let line = read_line(input)?.unwrap_or_default();
        if !line.trim().is_empty() {
            state = machine::revise_answer(&state, &id, &line);
        }
    }
    Ok(state)
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}
