//! cmdbind interactive console.
//!
//! Reads one command per line from stdin and resolves it against the demo
//! registry. Type `help` to list commands and `exit` to quit. Pass a TOML
//! config path as an argument (or via `CMDBIND_CONFIG`), and `--json` to
//! print each outcome as JSON.

mod demo;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use cmdbind_engine::{CommandRegistry, EngineConfig, Outcome, Sender};
use demo::Wallet;

/// The local operator. Holds every permission.
struct ConsoleSender;

impl Sender for ConsoleSender {
    fn name(&self) -> &str {
        "console"
    }

    fn send_message(&self, msg: &str) {
        println!("{msg}");
    }
}

fn report(sender: &dyn Sender, outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    match (&outcome.message, outcome.success) {
        (Some(msg), true) => sender.success(msg),
        (Some(msg), false) => sender.fail(msg),
        (None, false) => sender.fail(&format!("failed with code {}", outcome.code)),
        (None, true) => {},
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut json = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            config_path = Some(arg);
        }
    }
    let config = match config_path.or_else(|| std::env::var("CMDBIND_CONFIG").ok()) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => EngineConfig::default(),
    };

    let mut registry = CommandRegistry::with_config(config);
    demo::register_demo(&mut registry, Arc::new(Wallet::default()))?;
    log::info!("cmdbind console ready ({} commands)", registry.len());

    let sender: Arc<dyn Sender> = Arc::new(ConsoleSender);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }
        match registry.execute(Arc::clone(&sender), line) {
            Ok(outcome) => report(sender.as_ref(), &outcome, json)?,
            Err(e) => {
                log::debug!("'{line}' failed: {e:?}");
                sender.fail(&e.to_string());
                if let cmdbind_engine::CmdError::UnknownCommand { alias } = &e {
                    let hints = registry.completions(alias);
                    if !hints.is_empty() {
                        sender.send_message(&format!("Did you mean: {}", hints.join(", ")));
                    }
                }
            },
        }
    }
    log::info!("Bye");
    Ok(())
}
