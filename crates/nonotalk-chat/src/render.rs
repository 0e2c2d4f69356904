//! View model for the chat screen.
//!
//! [`render`] turns the view state into a [`ChatView`] with all text already
//! resolved. It has no side effects; a front end only has to lay it out.
//! [`render_text`] is the plain-terminal layout used by the binary.

use std::fmt::Write as _;

use nonotalk_core::config::{Hotline, NonotalkConfig};
use nonotalk_core::{Message, User};

use crate::state::ChatState;

const APP_TITLE: &str = "NonoTalk";
const SIDEBAR_TITLE: &str = "Historique de conversation";
const EMPTY_HISTORY: &str = "Aucun message pour le moment";
const GREETING: &str = "Je suis ton compagnon bienveillant, parle-moi librement 💜";
const RECORDING_INDICATOR: &str = "🎙️ Enregistrement en cours...";
const CRISIS_TITLE: &str = "Message d'urgence";
const QUOTA_TITLE: &str = "Quota bientôt épuisé";
const QUOTA_DESCRIPTION: &str = "Il ne te reste que quelques échanges. Invite un ami \
     à rejoindre NonoTalk : vous gagnerez tous les deux des échanges supplémentaires.";
const USER_FALLBACK: &str = "Vous";

/// Static inputs to rendering, taken from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub companion_name: String,
    pub sidebar_history_limit: usize,
    pub hotlines: Vec<Hotline>,
}

impl RenderContext {
    pub fn from_config(config: &NonotalkConfig) -> Self {
        Self {
            companion_name: config.companion.name.clone(),
            sidebar_history_limit: config.companion.sidebar_history_limit,
            hotlines: config.crisis.hotlines.clone(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::from_config(&NonotalkConfig::default())
    }
}

// =============================================================================
// View model
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub header: HeaderView,
    pub sidebar: SidebarView,
    pub companion: CompanionView,
    pub controls: ControlsView,
    pub crisis_dialog: Option<CrisisDialog>,
    pub quota_dialog: Option<QuotaDialog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub title: String,
    pub subtitle: String,
    pub username: Option<String>,
    pub quota_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub open: bool,
    pub title: String,
    pub entries: Vec<HistoryEntry>,
    /// Shown instead of the entries when there are none.
    pub empty_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub author: String,
    pub content: String,
    /// `HH:MM`, empty when the message has no timestamp.
    pub time: String,
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionView {
    pub greeting: String,
    pub talking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub input_enabled: bool,
    pub attach_enabled: bool,
    pub record_enabled: bool,
    pub recording_indicator: Option<String>,
    pub stop_audio_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisDialog {
    pub title: String,
    pub message: String,
    pub hotlines: Vec<Hotline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaDialog {
    pub title: String,
    pub description: String,
}

// =============================================================================
// Rendering
// =============================================================================

/// Build the view for `state`.
pub fn render(
    state: &ChatState,
    ctx: &RenderContext,
    user: Option<&User>,
    recording: bool,
    playing: bool,
) -> ChatView {
    let user_label = format!(
        "🙋‍♂️ {}",
        user.map(|u| u.username.as_str()).unwrap_or(USER_FALLBACK)
    );
    let companion_label = format!("👱‍♀️ {}", ctx.companion_name);

    let messages = state.messages();
    let start = messages.len().saturating_sub(ctx.sidebar_history_limit);
    let entries: Vec<HistoryEntry> = messages[start..]
        .iter()
        .map(|m| history_entry(m, &user_label, &companion_label))
        .collect();
    let empty_state = entries.is_empty().then(|| EMPTY_HISTORY.to_string());

    let enabled = state.controls_enabled();

    ChatView {
        header: HeaderView {
            title: APP_TITLE.to_string(),
            subtitle: format!("Chat avec {}", ctx.companion_name),
            username: user.map(|u| u.username.clone()),
            quota_line: format!(
                "{} échanges restants",
                user.map(|u| u.quota_remaining).unwrap_or(0)
            ),
        },
        sidebar: SidebarView {
            open: state.sidebar_open(),
            title: SIDEBAR_TITLE.to_string(),
            entries,
            empty_state,
        },
        companion: CompanionView {
            greeting: GREETING.to_string(),
            talking: playing,
        },
        controls: ControlsView {
            input_enabled: enabled,
            attach_enabled: enabled,
            record_enabled: enabled,
            recording_indicator: recording.then(|| RECORDING_INDICATOR.to_string()),
            stop_audio_visible: playing,
        },
        crisis_dialog: state.crisis_alert().map(|message| CrisisDialog {
            title: CRISIS_TITLE.to_string(),
            message: message.to_string(),
            hotlines: ctx.hotlines.clone(),
        }),
        quota_dialog: state.quota_warning().then(|| QuotaDialog {
            title: QUOTA_TITLE.to_string(),
            description: QUOTA_DESCRIPTION.to_string(),
        }),
    }
}

fn history_entry(message: &Message, user_label: &str, companion_label: &str) -> HistoryEntry {
    HistoryEntry {
        author: if message.is_user {
            user_label.to_string()
        } else {
            companion_label.to_string()
        },
        content: message.content.clone(),
        time: message
            .timestamp
            .map(|ts| ts.format("%H:%M").to_string())
            .unwrap_or_default(),
        has_image: message.has_image(),
    }
}

/// Lay the view out as plain text.
pub fn render_text(view: &ChatView) -> String {
    let mut out = String::new();
    let header = &view.header;

    let _ = write!(out, "== {} · {} ==", header.title, header.subtitle);
    if let Some(ref username) = header.username {
        let _ = write!(out, "  [{}]", username);
    }
    let _ = writeln!(out, "  {}", header.quota_line);

    if view.sidebar.open {
        let _ = writeln!(out, "\n-- {} --", view.sidebar.title);
        match view.sidebar.empty_state {
            Some(ref empty) => {
                let _ = writeln!(out, "{}", empty);
            }
            None => {
                for entry in &view.sidebar.entries {
                    let image = if entry.has_image { " 🖼️" } else { "" };
                    let _ = writeln!(
                        out,
                        "[{:>5}] {}{}: {}",
                        entry.time, entry.author, image, entry.content
                    );
                }
            }
        }
    }

    let mood = if view.companion.talking { "💬" } else { "🙂" };
    let _ = writeln!(out, "\n{} {}", mood, view.companion.greeting);

    let controls = &view.controls;
    if let Some(ref indicator) = controls.recording_indicator {
        let _ = writeln!(out, "{}", indicator);
    }
    if controls.stop_audio_visible {
        let _ = writeln!(out, "(/stop pour couper le son)");
    }
    if !controls.input_enabled {
        let _ = writeln!(out, "(patiente...)");
    }

    if let Some(ref dialog) = view.crisis_dialog {
        let _ = writeln!(out, "\n!! {} !!", dialog.title);
        let _ = writeln!(out, "{}", dialog.message);
        for hotline in &dialog.hotlines {
            let _ = writeln!(out, "  {} ({})", hotline.label, hotline.tel_uri());
        }
        let _ = writeln!(out, "(/ack pour confirmer)");
    }

    if let Some(ref dialog) = view.quota_dialog {
        let _ = writeln!(out, "\n** {} **", dialog.title);
        let _ = writeln!(out, "{}", dialog.description);
        let _ = writeln!(out, "(/invite <email> ou /dismiss)");
    }

    out
}

// =============================================================================
// Tests
// =============================================================================
