//! NonoTalk terminal client - composition root.
//!
//! 1. Resolve CLI args and load configuration from TOML
//! 2. Build the HTTP gateway and sign in
//! 3. Bootstrap the chat screen onto the main conversation
//! 4. Read commands from stdin until `/quit` or end of input

mod cli;
mod commands;
mod console_voice;

use std::io::Write as _;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use nonotalk_chat::{
    render_text, BootstrapOutcome, ChatController, ChatError, SendOutcome, SessionAuth,
    UploadOutcome, VoiceOutcome, VoiceProvider,
};
use nonotalk_client::{ChatBackend, HttpBackend};
use nonotalk_core::config::NonotalkConfig;

use cli::CliArgs;
use commands::Command;
use console_voice::ConsoleVoice;

type StdinLines = Lines<BufReader<Stdin>>;

enum Flow {
    Continue,
    Quit,
}

/// Print `label` and read one line, or `None` at end of input.
async fn prompt(lines: &mut StdinLines, label: &str) -> std::io::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

fn report_send(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Skipped => {}
        SendOutcome::Sent(exchange) => {
            println!("👱‍♀️ {}", exchange.reply.content);
        }
        SendOutcome::Crisis { .. } => {
            println!("Ton message nous inquiète. Regarde le message d'urgence ci-dessous.");
        }
        SendOutcome::QuotaExceeded => {
            println!("Tu n'as plus d'échanges disponibles.");
        }
    }
}

/// Run one parsed command against the controller.
async fn dispatch(
    controller: &mut ChatController,
    voice: &ConsoleVoice,
    command: Command,
) -> Result<Flow, ChatError> {
    match command {
        Command::Empty => {}
        Command::Help => println!("{}", commands::HELP),
        Command::Say(text) => {
            let outcome = controller.send_message(&text).await?;
            report_send(&outcome);
        }
        Command::Image(path) => {
            if let UploadOutcome::Uploaded(exchange) = controller.upload_image_file(&path).await? {
                tracing::debug!(reply_id = exchange.reply.id, "Image shared");
            }
        }
        Command::Voice => match controller.toggle_recording().await? {
            VoiceOutcome::Started => {
                println!("🎙️ Je t'écoute... tape ce que tu dis puis valide.");
            }
            VoiceOutcome::Stopped { reply } => {
                if reply == SendOutcome::Skipped {
                    println!("Je n'ai rien entendu.");
                }
            }
        },
        Command::Ack => {
            if controller.acknowledge_crisis().await? {
                println!("Merci. Prends soin de toi 💜");
            }
        }
        Command::Dismiss => controller.dismiss_quota_warning(),
        Command::Invite(email) => {
            let receipt = controller.invite_friend(&email).await?;
            match receipt.message {
                Some(message) => println!("{}", message),
                None => println!("Invitation envoyée à {}", receipt.invitation.email),
            }
        }
        Command::History => controller.toggle_sidebar(),
        Command::Stop => controller.stop_audio(),
        Command::Logout => {
            controller.logout().await?;
            println!("À bientôt !");
            return Ok(Flow::Quit);
        }
        Command::Quit => {
            voice.stop_audio();
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Continue)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config, loaded before tracing so its log level applies.
    let config_file = args.resolve_config_path();
    let (mut config, config_error) = if config_file.exists() {
        match NonotalkConfig::load(&config_file) {
            Ok(config) => (config, None),
            Err(e) => (NonotalkConfig::default(), Some(e)),
        }
    } else {
        (NonotalkConfig::default(), None)
    };

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting NonoTalk v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        Some(e) => tracing::warn!(path = %config_file.display(), error = %e, "Failed to load config, using defaults"),
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
    }

    // Gateway.
    config.backend.base_url = args.resolve_base_url(&config.backend.base_url);
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(&config.backend)?);
    tracing::info!(base_url = %config.backend.base_url, "Backend configured");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Sign in.
    let username = match args.username.clone() {
        Some(u) => u,
        None => match prompt(&mut lines, "Nom d'utilisateur : ").await? {
            Some(u) => u,
            None => return Ok(()),
        },
    };
    let pin = match args.pin.clone() {
        Some(p) => p,
        None => match prompt(&mut lines, "Code PIN : ").await? {
            Some(p) => p,
            None => return Ok(()),
        },
    };
    let auth = Arc::new(SessionAuth::new(Arc::clone(&backend)));
    auth.login(&username, &pin).await?;

    // Chat screen.
    let voice = Arc::new(ConsoleVoice::new());
    let mut controller = ChatController::new(
        &config,
        Arc::clone(&backend),
        auth.clone(),
        voice.clone(),
    );
    match controller.bootstrap().await? {
        BootstrapOutcome::Selected(c) => {
            tracing::info!(conversation_id = c.id, "Resuming conversation")
        }
        BootstrapOutcome::Created(c) => {
            tracing::info!(conversation_id = c.id, "Started a new conversation")
        }
    }
    println!("{}", render_text(&controller.view()));
    println!("(tape /help pour la liste des commandes)");

    while let Some(line) = lines.next_line().await? {
        // While recording, a plain line is what was "heard".
        if voice.is_recording() && !line.trim_start().starts_with('/') {
            voice.capture(&line)?;
            if let Err(e) = dispatch(&mut controller, &voice, Command::Voice).await {
                eprintln!("Erreur : {}", e);
            }
            println!("{}", render_text(&controller.view()));
            continue;
        }

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let redraw = !matches!(command, Command::Empty | Command::Help);

        match dispatch(&mut controller, &voice, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("Erreur : {}", e),
        }
        if redraw {
            println!("{}", render_text(&controller.view()));
        }
    }

    tracing::info!("NonoTalk stopped");
    Ok(())
}
