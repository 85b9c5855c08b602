//! Ringside CLI - place and watch AI phone calls
//!
//! Thin client for the Ringside API: starts calls, inspects their state,
//! and keeps reusable personas as presets in the local config.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

use api::{CallSummary, PersonaBody, RingsideClient};
use config::{Config, Preset};

#[derive(Parser)]
#[command(name = "ringside")]
#[command(about = "Ringside CLI - place and watch AI phone calls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Persona fields accepted on the command line
#[derive(clap::Args, Default)]
struct PersonaArgs {
    /// Persona display name
    #[arg(long)]
    name: Option<String>,
    /// Persona description
    #[arg(long)]
    description: Option<String>,
    /// Voice id at the provider
    #[arg(long = "voice")]
    voice_id: Option<String>,
    /// Opening line spoken when the callee answers
    #[arg(long)]
    first_message: Option<String>,
}

impl From<PersonaArgs> for Preset {
    fn from(args: PersonaArgs) -> Self {
        Preset {
            name: args.name,
            description: args.description,
            voice_id: args.voice_id,
            first_message: args.first_message,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Store server URL and API key
    Login {
        /// API key (will prompt if not provided, empty for open servers)
        #[arg(short, long)]
        key: Option<String>,
        /// Server base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Place an outbound call
    Call {
        /// Destination number in E.164 form, e.g. +15551234567
        phone: String,
        /// Preset to start from (defaults to the default preset)
        #[arg(short, long)]
        persona: Option<String>,
        #[command(flatten)]
        overrides: PersonaArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List all calls
    List,

    /// Show a call with its transcript
    Show {
        /// Call ID
        id: String,
    },

    /// Ask the provider for the current status of a call
    Refresh {
        /// Call ID
        id: String,
    },

    /// Replace the persona of a live call
    PersonaUpdate {
        /// Call ID
        id: String,
        /// New display name
        #[arg(long)]
        name: String,
        /// New description
        #[arg(long)]
        description: String,
    },

    /// Manage persona presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum PresetAction {
    /// Add or replace a preset
    Add {
        /// Preset key (e.g., "survey", "reminder")
        key: String,
        #[command(flatten)]
        persona: PersonaArgs,
    },
    /// List all presets
    List,
    /// Remove a preset
    Remove {
        /// Preset key to remove
        key: String,
    },
    /// Set default preset
    SetDefault {
        /// Preset key to use when `call` gets no --persona
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, base_url } => cmd_login(key, base_url).await,
        Commands::Call {
            phone,
            persona,
            overrides,
            yes,
        } => cmd_call(phone, persona, overrides, yes).await,
        Commands::List => cmd_list().await,
        Commands::Show { id } => cmd_show(id).await,
        Commands::Refresh { id } => cmd_refresh(id).await,
        Commands::PersonaUpdate {
            id,
            name,
            description,
        } => cmd_persona_update(id, name, description).await,
        Commands::Preset { action } => cmd_preset(action),
        Commands::Config => cmd_config(),
    }
}

fn client(config: &Config) -> RingsideClient {
    RingsideClient::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key (empty if the server has none)")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read API key")?,
    };
    let api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());

    let client = RingsideClient::new(&config.base_url, api_key.as_deref());
    print!("Testing connection to {}... ", config.base_url);

    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Ringside API at {}", config.base_url);
        }
    }

    client
        .check_key()
        .await
        .context("Server rejected the API key")?;

    config.api_key = api_key;
    config.save()?;

    println!("{} Settings saved to {:?}", "✓".green(), Config::config_path()?);

    if config.presets.is_empty() {
        println!("\n{}", "Tip: Save a persona so calls need only a number:".yellow());
        println!("  ringside preset add survey --name Jamie --description \"a friendly survey taker\"");
        println!("  ringside preset set-default survey");
    }

    Ok(())
}

async fn cmd_call(
    phone: String,
    preset: Option<String>,
    overrides: PersonaArgs,
    yes: bool,
) -> Result<()> {
    let config = Config::load()?;

    let base = config.preset(preset.as_deref())?.cloned().unwrap_or_default();
    let persona = base.merged_with(&Preset::from(overrides));

    let name = persona.name.as_deref().unwrap_or("AI Assistant");
    println!("{}", "About to call:".bold());
    println!("  Number:  {}", phone.cyan());
    println!("  Persona: {}", name);
    if let Some(description) = &persona.description {
        println!("           {}", description.dimmed());
    }

    if !yes {
        let go = Confirm::new()
            .with_prompt("Place this call?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !go {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let call_id = client(&config)
        .create_call(&phone, &PersonaBody::from(persona))
        .await?;

    println!("{} Call started: {}", "✓".green(), call_id.cyan());
    println!("  Follow it with: ringside show {}", call_id);

    Ok(())
}

async fn cmd_list() -> Result<()> {
    let config = Config::load()?;
    let calls = client(&config).list_calls().await?;

    if calls.is_empty() {
        println!("No calls yet.");
        return Ok(());
    }

    println!("{}", "Calls:".bold());
    for call in calls {
        println!(
            "  {} {} {} {}",
            call.id.cyan(),
            status_label(&call.status),
            call.phone_number,
            call.persona.name.as_deref().unwrap_or("-").dimmed()
        );
    }

    Ok(())
}

async fn cmd_show(id: String) -> Result<()> {
    let config = Config::load()?;
    let call = client(&config).get_call(&id).await?;

    print_call(&call);

    println!("\n{}", "Transcript:".bold());
    if call.transcript.is_empty() {
        println!("  {}", "(nothing said yet)".dimmed());
    }
    for segment in &call.transcript {
        println!(
            "  {} {}: {}",
            segment.timestamp.dimmed(),
            segment.speaker.yellow(),
            segment.text
        );
    }

    Ok(())
}

async fn cmd_refresh(id: String) -> Result<()> {
    let config = Config::load()?;
    let refreshed = client(&config).refresh_call(&id).await?;

    println!(
        "Provider reports {} ({})",
        refreshed.provider_status.cyan(),
        if refreshed.updated {
            "status updated".green()
        } else {
            "no change".dimmed()
        }
    );
    print_call(&refreshed.call);

    Ok(())
}

async fn cmd_persona_update(id: String, name: String, description: String) -> Result<()> {
    let config = Config::load()?;
    let persona = PersonaBody {
        name: Some(name),
        description: Some(description),
        ..PersonaBody::default()
    };

    let call = client(&config).update_persona(&id, &persona).await?;

    println!("{} Persona updated", "✓".green());
    print_call(&call);

    Ok(())
}

fn cmd_preset(action: PresetAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        PresetAction::Add { key, persona } => {
            let preset = Preset::from(persona);
            if preset.name.is_none() {
                let name: String = Input::new()
                    .with_prompt("Persona name")
                    .interact_text()
                    .context("Failed to read persona name")?;
                config.add_preset(key.clone(), Preset { name: Some(name), ..preset });
            } else {
                config.add_preset(key.clone(), preset);
            }
            config.save()?;
            println!("{} Preset '{}' saved", "✓".green(), key);
        }

        PresetAction::List => {
            if config.presets.is_empty() {
                println!("No presets configured.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  ringside preset add <key> --name <NAME> --description <TEXT>");
                return Ok(());
            }

            println!("{}", "Presets:".bold());
            for (key, preset) in &config.presets {
                let is_default = config.default_preset.as_ref() == Some(key);
                let default_marker = if is_default {
                    " (default)".green().to_string()
                } else {
                    String::new()
                };
                println!(
                    "  {} {} {}{}",
                    key.cyan(),
                    preset.name.as_deref().unwrap_or("-"),
                    truncate_string(preset.description.as_deref().unwrap_or(""), 40).dimmed(),
                    default_marker
                );
            }
        }

        PresetAction::Remove { key } => {
            if config.remove_preset(&key) {
                config.save()?;
                println!("{} Preset '{}' removed", "✓".green(), key);
            } else {
                bail!("Preset '{}' not found", key);
            }
        }

        PresetAction::SetDefault { key } => {
            if config.set_default_preset(key.clone()) {
                config.save()?;
                println!("{} Default preset set to '{}'", "✓".green(), key);
            } else {
                bail!("Preset '{}' not found", key);
            }
        }
    }

    Ok(())
}

fn print_call(call: &CallSummary) {
    println!("{} {}", "Call".bold(), call.id.cyan());
    println!("  Status:  {}", status_label(&call.status));
    if let Some(reason) = &call.ended_reason {
        println!("  Ended:   {}", reason);
    }
    println!("  Number:  {}", call.phone_number);
    println!(
        "  Persona: {}",
        call.persona.name.as_deref().unwrap_or("-")
    );
    if let Some(description) = &call.persona.description {
        println!("           {}", truncate_string(description, 60).dimmed());
    }
    if let Some(listen) = &call.listen_url {
        println!("  Listen:  {}", listen.dimmed());
    }
    println!("  Created: {}", call.created_at);
}

fn status_label(status: &str) -> colored::ColoredString {
    match status {
        "initiated" => status.yellow(),
        "in-progress" => status.green(),
        "completed" => status.dimmed(),
        _ => status.normal(),
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Default Preset: {}",
        config.default_preset.as_deref().unwrap_or("None").cyan()
    );
    println!("  Presets: {}", config.presets.len());

    Ok(())
}
