// bcrypt command-line front end.
//
// bcrypt is a password hashing function designed by Niels Provos and David
// Mazières, based on the Blowfish cipher, and presented in 1999 at the
// Usenix Security Symposium.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use bcrypt_core::{gen_salt, hashpw, password, verify, BcryptHasher};
use cli::{Cli, Command};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Read password securely (without displaying it)
fn read_password(prompt: &str, normalize: bool) -> Result<Zeroizing<Vec<u8>>> {
    let password =
        Zeroizing::new(rpassword::prompt_password(prompt).context("failed to read password")?);

    if normalize {
        Ok(password::normalize(&password))
    } else {
        Ok(Zeroizing::new(password.as_bytes().to_vec()))
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Hash {
            cost,
            variant,
            normalize,
        } => {
            let hasher = BcryptHasher::new(cost)?.with_variant(variant);
            let password = read_password("Enter password to hash: ", normalize)?;
            let hashed = hasher.hash(&password)?;
            println!("{hashed}");
        }
        Command::Verify { hash, normalize } => {
            let password = read_password("Enter password to verify: ", normalize)?;
            let is_valid = verify(&password, &hash).context("cannot verify against this hash")?;
            println!("{}", if is_valid { "success" } else { "failed" });
            if !is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Salt { cost } => {
            println!("{}", gen_salt(cost)?);
        }
        Command::Hashpw { setting, normalize } => {
            let password = read_password("Enter password: ", normalize)?;
            println!("{}", hashpw(&password, &setting)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
