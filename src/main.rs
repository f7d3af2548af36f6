use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
mod auth;
use passcrypt::{Algorithm, CipherSettings, Storage, decrypt, default_settings_storage, encrypt};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

/// One-off overrides of the saved settings.
#[derive(Debug, clap::Args)]
struct OverrideArgs {
    /// Cipher to use instead of the configured one (e.g. aes-256-gcm)
    #[arg(long, short = 'a')]
    algorithm: Option<Algorithm>,

    /// PBKDF2 iteration count instead of the configured one
    #[arg(long, short = 'i')]
    iterations: Option<u32>,
}

impl OverrideArgs {
    fn apply(&self, mut settings: CipherSettings) -> CipherSettings {
        if let Some(algorithm) = self.algorithm {
            settings = settings.with_algorithm(algorithm);
        }
        if let Some(iterations) = self.iterations {
            settings = settings.with_iterations(iterations);
        }
        settings
    }
}

#[derive(Debug, clap::Args)]
struct SetArgs {
    /// Cipher (aes-128-cbc, aes-192-cbc, aes-256-cbc, aes-128-gcm, aes-192-gcm, aes-256-gcm).
    /// Resets key and IV lengths to the cipher's requirements.
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// PBKDF2 iteration count (default: 100000)
    #[arg(long)]
    iterations: Option<u32>,

    /// Salt length in bytes (default: 32)
    #[arg(long)]
    salt_length: Option<usize>,

    /// Key length in bytes; must match the cipher
    #[arg(long)]
    key_length: Option<usize>,

    /// IV length in bytes; must match the cipher
    #[arg(long)]
    iv_length: Option<usize>,
}

impl SetArgs {
    fn apply(&self, settings: CipherSettings) -> CipherSettings {
        let mut settings = match self.algorithm {
            Some(algorithm) => settings.with_algorithm(algorithm),
            None => settings,
        };
        if let Some(iterations) = self.iterations {
            settings.iterations = iterations;
        }
        if let Some(salt_length) = self.salt_length {
            settings.salt_length = salt_length;
        }
        if let Some(key_length) = self.key_length {
            settings.key_length = key_length;
        }
        if let Some(iv_length) = self.iv_length {
            settings.iv_length = iv_length;
        }
        settings
    }
}

fn resolve_storage(path: Option<PathBuf>) -> Result<Storage> {
    match path {
        Some(p) => Ok(Storage::new(p)),
        None => default_settings_storage(),
    }
}

#[derive(Debug, Parser)]
#[command(name = "passcrypt")]
#[command(
    version,
    about = "Password-based AES encryption of text into portable hex tokens."
)]
struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, value_name = "PATH", env = "PASSCRYPT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts text and prints the token (reads stdin if TEXT is omitted)
    Encrypt {
        text: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Decrypts a token and prints the text (reads stdin if TOKEN is omitted)
    Decrypt {
        token: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Shows or changes the saved cipher settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Prints the effective settings
    Show,

    /// Updates saved settings
    #[command(arg_required_else_help = true)]
    Set(SetArgs),

    /// Restores default settings
    Reset,
}

fn init_logging(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Removes a single trailing `\n` or `\r\n`, leaving any further line endings.
fn strip_line_ending(s: &mut String) {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
}

/// Argument value, or all of stdin minus one trailing line ending.
fn read_payload(arg: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(value) = arg {
        return Ok(Zeroizing::new(value));
    }

    let mut buf = Zeroizing::new(String::new());
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read input from stdin")?;
    strip_line_ending(&mut buf);
    Ok(buf)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let storage = resolve_storage(args.config.clone())?;

    match args.command {
        Commands::Encrypt { text, overrides } => {
            let settings = overrides.apply(CipherSettings::load(&storage)?);
            let stdin_is_payload = text.is_none();
            let password = auth::read_password(stdin_is_payload, true)?;
            let plaintext = read_payload(text)?;

            let token = encrypt(password.as_bytes(), plaintext.as_bytes(), &settings)?;
            println!("{token}");
        }
        Commands::Decrypt { token, overrides } => {
            let settings = overrides.apply(CipherSettings::load(&storage)?);
            let stdin_is_payload = token.is_none();
            let password = auth::read_password(stdin_is_payload, false)?;
            let token = read_payload(token)?;

            let plaintext = decrypt(password.as_bytes(), token.trim(), &settings)?;
            let text = std::str::from_utf8(&plaintext)
                .context("decrypted data is not valid UTF-8")?;
            println!("{text}");
        }
        Commands::Config(ConfigCommand::Show) => {
            let settings = CipherSettings::load(&storage)?;
            println!("# {}", storage.path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::Config(ConfigCommand::Set(set)) => {
            let settings = set.apply(CipherSettings::load(&storage)?);
            settings.save(&storage)?;
            println!("settings saved to {}", storage.path().display());
        }
        Commands::Config(ConfigCommand::Reset) => {
            CipherSettings::default().save(&storage)?;
            println!("settings reset to defaults");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_line_ending_removes_exactly_one() {
        let cases = [
            ("a\n", "a"),
            ("a\r\n", "a"),
            ("a\n\n", "a\n"),
            ("line\r\n\n\n", "line\r\n\n"),
            ("a\r", "a\r"),
            ("a", "a"),
        ];
        for (input, expected) in cases {
            let mut s = input.to_string();
            strip_line_ending(&mut s);
            assert_eq!(s, expected, "{input:?}");
        }
    }
}
