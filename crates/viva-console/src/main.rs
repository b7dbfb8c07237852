//! Viva console: rehearse a technical interview from your terminal.
//!
//! Usage:
//!   cargo run -p viva-console -- --start [--type live_coding] [--tone adversarial]
//!
//! Starts a session against the backend (VIVA_API_URL or --api), prints and
//! speaks interviewer replies, and accepts your answers line by line.
//! `--workspace FILE` attaches the file's current contents to every answer,
//! the way the live-coding view shares its editor.

use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use viva_session::{
    HttpTransport, InterviewSettings, ProblemSource, SessionAnalysis, SessionController,
    SettingsPatch,
};
use viva_voice::{PlaceholderRemoteAudio, PlaceholderSynth, SpeechOutput, SpeechSink};

fn print_usage() {
    eprintln!("Viva — voice interview rehearsal");
    eprintln!("  --start             Start a session with the settings below");
    eprintln!("  --api URL           Backend base URL (default VIVA_API_URL or http://127.0.0.1:8000)");
    eprintln!("  --type T            system_design | live_coding | ml_theory | coaching");
    eprintln!("  --tone T            friendly | neutral | adversarial");
    eprintln!("  --verbosity V       low | medium | high");
    eprintln!("  --problem TEXT      Rehearse TEXT instead of a random problem");
    eprintln!("  --problem-url URL   Pull the problem from URL");
    eprintln!("  --workspace FILE    Attach FILE's contents to every answer");
    eprintln!("  --mute              Text only, no audio");
    eprintln!();
    eprintln!("In the session: type answers, or /save /analyze /end /quit /help.");
    eprintln!("Build with --features native-synth for spoken fallback replies.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut start = false;
    let mut api_url: Option<String> = None;
    let mut workspace: Option<String> = None;
    let mut mute = false;
    let mut patch = SettingsPatch::default();

    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--start" => start = true,
            "--api" => api_url = args.next(),
            "--type" => {
                if let Some(v) = args.next() {
                    patch.interview_type = Some(v.parse()?);
                }
            }
            "--tone" => {
                if let Some(v) = args.next() {
                    patch.tone = Some(v.parse()?);
                }
            }
            "--verbosity" => {
                if let Some(v) = args.next() {
                    patch.verbosity = Some(v.parse()?);
                }
            }
            "--problem" => {
                if let Some(text) = args.next() {
                    patch.problem_source = Some(ProblemSource::Description);
                    patch.problem_description = Some(text);
                }
            }
            "--problem-url" => {
                if let Some(url) = args.next() {
                    patch.problem_source = Some(ProblemSource::Url);
                    patch.problem_url = Some(url);
                }
            }
            "--workspace" => workspace = args.next(),
            "--mute" => mute = true,
            _ => {}
        }
    }

    if !start {
        print_usage();
        return Ok(());
    }

    let transport = match api_url {
        Some(url) => HttpTransport::new(url)?,
        None => HttpTransport::from_env()?,
    };
    info!("using backend at {}", transport.base_url());

    let speech: Arc<dyn SpeechSink> = if mute {
        Arc::new(SpeechOutput::new(
            Arc::new(PlaceholderRemoteAudio),
            Arc::new(PlaceholderSynth::new()),
        ))
    } else {
        Arc::new(SpeechOutput::best_available())
    };

    let mut settings = InterviewSettings::default();
    settings.apply(patch);
    let mut ctl = SessionController::new(Arc::new(transport), speech, settings);

    if let Some(path) = workspace {
        info!("attaching workspace file {path} to every answer");
        ctl.set_context_provider(Arc::new(move || {
            std::fs::read_to_string(&path)
                .ok()
                .map(|code| format!("Current contents of {path}:\n{code}"))
        }));
    }

    if let Err(e) = ctl.start_session().await {
        eprintln!("could not start the interview: {e}");
        return Err(e.into());
    }
    print_last_reply(&ctl);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/help" => {
                println!("answers are sent verbatim; /save /analyze /end /quit /help");
            }
            "/save" => match ctl.save_session().await {
                Ok(ack) => println!("saved {} at {}", ack.session_id, ack.saved_at),
                Err(_) => print_error(&ctl),
            },
            "/analyze" => match ctl.analyze_session().await {
                Ok(analysis) => print_analysis(&analysis),
                Err(_) => print_error(&ctl),
            },
            "/end" => {
                ctl.end_session().await;
                println!("session ended, transcript cleared. /quit to leave.");
            }
            "/quit" => {
                ctl.end_session().await;
                break;
            }
            answer => {
                if ctl.send_response(answer, None).await.is_ok() {
                    print_last_reply(&ctl);
                    if ctl.is_complete() {
                        println!("(the interviewer considers the interview wrapped up — /analyze for feedback)");
                    }
                } else {
                    print_error(&ctl);
                }
            }
        }
    }

    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_last_reply(ctl: &SessionController) {
    if let Some(msg) = ctl.transcript().last() {
        println!("[{}] {}", msg.role.label(), msg.content);
    }
}

fn print_error(ctl: &SessionController) {
    if let Some(err) = ctl.last_error() {
        eprintln!("! {err}");
    }
}

fn print_analysis(analysis: &SessionAnalysis) {
    println!("score: {}/10", analysis.overall_score);
    if !analysis.strengths.is_empty() {
        println!("strengths:");
        for s in &analysis.strengths {
            println!("  - {s}");
        }
    }
    if !analysis.areas_for_improvement.is_empty() {
        println!("areas for improvement:");
        for a in &analysis.areas_for_improvement {
            println!("  - {a}");
        }
    }
    if !analysis.detailed_feedback.is_empty() {
        println!("{}", analysis.detailed_feedback);
    }
    if !analysis.recommendations.is_empty() {
        println!("recommendations:");
        for r in &analysis.recommendations {
            println!("  - {r}");
        }
    }
}
