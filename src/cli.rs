use clap::{Parser, Subcommand};

use bcrypt_core::{Variant, DEFAULT_COST};

#[derive(Parser, Debug)]
#[command(
    name = "bcrypt",
    version,
    about = "Hash and verify passwords with bcrypt",
    long_about = "Hash and verify passwords with bcrypt. Passwords are always read from the terminal without echo."
)]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hash a password with a fresh random salt
    Hash {
        /// Work factor, 4 to 31
        #[arg(short, long, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
        cost: u32,

        /// Variant letter written into the hash
        #[arg(long, env = "BCRYPT_VARIANT", default_value = "2b")]
        variant: Variant,

        /// Apply Unicode NFKC normalisation to the password first
        #[arg(long)]
        normalize: bool,
    },

    /// Check a password against a stored hash
    Verify {
        /// The stored 60-character hash
        hash: String,

        /// Apply Unicode NFKC normalisation to the password first
        #[arg(long)]
        normalize: bool,
    },

    /// Print a random `$2b$NN$<salt>` setting
    Salt {
        /// Work factor, 4 to 31
        #[arg(short, long, env = "BCRYPT_COST", default_value_t = DEFAULT_COST)]
        cost: u32,
    },

    /// Hash a password under an existing setting or hash
    Hashpw {
        /// A 29-character setting or a 60-character hash
        setting: String,

        /// Apply Unicode NFKC normalisation to the password first
        #[arg(long)]
        normalize: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_hash_options() {
        let cli = Cli::parse_from(["bcrypt", "hash", "--cost", "5", "--variant", "2y"]);
        match cli.command {
            Command::Hash {
                cost,
                variant,
                normalize,
            } => {
                assert_eq!(cost, 5);
                assert_eq!(variant, Variant::TwoY);
                assert!(!normalize);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["bcrypt", "hash", "--variant", "2z"]).is_err());
    }
}
