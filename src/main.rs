use anyhow::{Context, Result, bail};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use forgeseal::{
    EncryptionConfig, EncryptionService, KdfParams, PasswordCodec, PasswordKdf, ScryptParams,
    config::DEFAULT_ALGORITHM, into_utf8,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum KdfChoice {
    #[default]
    Scrypt,
    #[value(name = "argon2id")]
    Argon2id,
}

#[derive(Debug, clap::Args)]
struct KdfArgs {
    /// Key derivation for seal/unseal
    #[arg(long = "password-kdf", global = true, value_enum, default_value_t)]
    choice: KdfChoice,

    /// scrypt cost as log2(N) for seal/unseal (default: 15)
    #[arg(long = "scrypt-log-n", global = true)]
    log_n: Option<u8>,

    #[command(flatten)]
    argon2: Argon2Args,
}

impl KdfArgs {
    fn to_password_kdf(&self) -> Result<PasswordKdf> {
        Ok(match self.choice {
            KdfChoice::Scrypt => {
                let default = ScryptParams::default();
                ScryptParams::new(
                    self.log_n.unwrap_or(default.log_n()),
                    default.r(),
                    default.p(),
                )?
                .into()
            }
            KdfChoice::Argon2id => self.argon2.to_kdf_params()?.into(),
        })
    }
}

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB for seal/unseal (default: 32768)
    #[arg(long = "argon-mem", global = true)]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations for seal/unseal (default: 2)
    #[arg(long = "argon-time", global = true)]
    time_cost: Option<u32>,

    /// Argon2 parallelism for seal/unseal (default: 1)
    #[arg(long = "argon-parallelism", global = true)]
    parallelism: Option<u32>,
}

impl Argon2Args {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        Ok(KdfParams::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
        )?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "forgeseal")]
#[command(
    version,
    about = "Encrypt data at rest, hash passwords and mint tokens for a git forge."
)]
struct Cli {
    /// Secret the master key is derived from
    #[arg(long, global = true, env = "FORGESEAL_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Algorithm label recorded with the service (informational)
    #[arg(long, global = true, env = "FORGESEAL_ALGORITHM")]
    algorithm: Option<String>,

    /// JSON file with {"key": ..., "algorithm": ...}; flags take precedence
    #[arg(long, global = true, value_name = "PATH", env = "FORGESEAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    kdf: KdfArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts text under the master key, prints base64
    #[command(arg_required_else_help = true)]
    Encrypt { plaintext: String },

    /// Decrypts base64 produced by `encrypt`
    #[command(arg_required_else_help = true)]
    Decrypt { ciphertext: String },

    /// Encrypts text under a password, prints base64
    #[command(arg_required_else_help = true)]
    Seal { plaintext: String },

    /// Decrypts base64 produced by `seal`
    #[command(arg_required_else_help = true)]
    Unseal { ciphertext: String },

    /// Hashes a password into a storable record
    Hash,

    /// Checks a password against a stored record
    #[command(arg_required_else_help = true)]
    Verify { record: String },

    /// Prints a random URL-safe token
    Token {
        /// Number of random bytes
        #[arg(short, long, default_value_t = 32)]
        length: usize,
    },
}

impl Cli {
    fn resolve_config(&self) -> Result<EncryptionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                EncryptionConfig::from_json(&json)?
            }
            None => EncryptionConfig::new(""),
        };

        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        if let Some(algorithm) = &self.algorithm {
            config.algorithm = algorithm.clone();
        }
        if config.key.is_empty() {
            bail!("encryption key is required (--key, FORGESEAL_KEY or --config)");
        }
        if config.algorithm.is_empty() {
            config.algorithm = DEFAULT_ALGORITHM.to_string();
        }

        Ok(config)
    }

    fn service(&self) -> Result<EncryptionService> {
        let config = self.resolve_config()?;
        let kdf = self.kdf.to_password_kdf()?;
        Ok(EncryptionService::with_kdf(&config, kdf)?)
    }

    fn password_codec(&self) -> Result<PasswordCodec> {
        Ok(PasswordCodec::new(self.kdf.to_password_kdf()?))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    match &args.command {
        Commands::Encrypt { plaintext } => {
            let svc = args.service()?;
            println!("{}", svc.encrypt_string(plaintext)?);
        }
        Commands::Decrypt { ciphertext } => {
            let svc = args.service()?;
            let plaintext = svc.decrypt_string(ciphertext)?;
            println!("{}", plaintext.as_str());
        }
        Commands::Seal { plaintext } => {
            let codec = args.password_codec()?;
            let password = auth::read_new_password()?;
            let envelope = codec.encrypt(plaintext.as_bytes(), &password)?;
            println!("{}", STANDARD.encode(envelope));
        }
        Commands::Unseal { ciphertext } => {
            let codec = args.password_codec()?;
            let envelope = STANDARD
                .decode(ciphertext)
                .context("ciphertext is not valid base64")?;
            let password = auth::read_password()?;
            let plaintext = into_utf8(codec.decrypt(&envelope, &password)?)?;
            println!("{}", plaintext.as_str());
        }
        Commands::Hash => {
            let password = auth::read_new_password()?;
            println!("{}", forgeseal::hash_password(&password)?);
        }
        Commands::Verify { record } => {
            let password = auth::read_password()?;
            if !forgeseal::verify_password(&password, record) {
                bail!("password does not match");
            }
            println!("password matches");
        }
        Commands::Token { length } => {
            println!("{}", forgeseal::generate_token(*length)?);
        }
    }

    Ok(())
}
