#![forbid(unsafe_code)]
//! Offline key and memo utilities for DECENT accounts

use clap::{Parser, Subcommand};
use colored::*;
use decent_sdk::config::load_config;
use decent_sdk::crypt::{self, decrypt_with_checksum, encrypt_with_checksum, ElGamalPrivate};
use decent_sdk::crypto::{PrivateKey, PublicKey};
use decent_sdk::logging;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a fresh key pair
    Generate,
    /// Derives a key pair from a brain key
    BrainKey {
        /// The brain key words
        words: String,
        /// Derivation sequence number
        #[arg(long, default_value_t = 0)]
        sequence: u32,
    },
    /// Prints the public key of a WIF private key
    Public {
        wif: String,
    },
    /// Derives the ElGamal key pair of a WIF private key
    Elgamal {
        wif: String,
    },
    /// RIPEMD-160 hash of a string
    Hash {
        text: String,
    },
    /// Encrypts a memo from a private key to a public key
    Encrypt {
        message: String,
        /// Sender WIF private key
        #[arg(long)]
        wif: String,
        /// Recipient public key
        #[arg(long)]
        to: String,
        #[arg(long)]
        nonce: Option<String>,
    },
    /// Decrypts a hex memo with a private key and the other party's public key
    Decrypt {
        ciphertext: String,
        #[arg(long)]
        wif: String,
        /// The other party's public key
        #[arg(long)]
        from: String,
        #[arg(long)]
        nonce: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config()?;
    logging::init(&config.logging)?;
    let prefix = config.network.address_prefix.as_str();

    match cli.command {
        Commands::Generate => {
            let key = PrivateKey::generate();
            print_key_pair(&key, prefix);
            println!(
                "{} {}",
                "ElGamal public:".bright_cyan(),
                ElGamalPrivate::derive(&key).public()
            );
        }
        Commands::BrainKey { words, sequence } => {
            let key = PrivateKey::from_brain_key(&words, sequence)?;
            print_key_pair(&key, prefix);
        }
        Commands::Public { wif } => {
            let key = PrivateKey::from_wif(&wif)?;
            println!("{}", key.to_public().to_string_with_prefix(prefix));
        }
        Commands::Elgamal { wif } => {
            let private = ElGamalPrivate::from_wif(&wif)?;
            println!("{} {}", "ElGamal private:".bright_cyan(), private);
            println!("{} {}", "ElGamal public:".bright_cyan(), private.public());
        }
        Commands::Hash { text } => {
            println!("{}", crypt::hash(text));
        }
        Commands::Encrypt {
            message,
            wif,
            to,
            nonce,
        } => {
            let sender = PrivateKey::from_wif(&wif)?;
            let recipient = PublicKey::from_string_with_prefix(&to, prefix)?;
            let encrypted =
                encrypt_with_checksum(message, &sender, &recipient, nonce.as_deref())?;
            println!("{}", hex::encode(encrypted));
        }
        Commands::Decrypt {
            ciphertext,
            wif,
            from,
            nonce,
        } => {
            let key = PrivateKey::from_wif(&wif)?;
            let counterparty = PublicKey::from_string_with_prefix(&from, prefix)?;
            let bytes = hex::decode(ciphertext.trim())?;
            let plaintext = decrypt_with_checksum(&bytes, &key, &counterparty, nonce.as_deref())?;
            match String::from_utf8(plaintext) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{}", hex::encode(e.into_bytes()).bright_yellow()),
            }
        }
    }

    Ok(())
}

fn print_key_pair(key: &PrivateKey, prefix: &str) {
    println!("{} {}", "Private (WIF):".bright_cyan(), key.string_key());
    println!(
        "{} {}",
        "Public key:".bright_cyan(),
        key.to_public().to_string_with_prefix(prefix).bright_green()
    );
}
