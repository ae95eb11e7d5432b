use cipherstack::cli::{
    decrypt_file, describe_modes, encrypt_file, keygen_to_file, EncryptOptions, KeygenOptions,
};
use cipherstack::pipeline::ChainRun;
use cipherstack::policy::SecurityMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("CIPHERSTACK_VERSION");
const BUILD: &str = env!("CIPHERSTACK_BUILD");
const PROFILE: &str = env!("CIPHERSTACK_PROFILE");
const GIT_HASH: &str = env!("CIPHERSTACK_GIT_HASH");

/// Combined version string (compile-time concatenation not possible, so we build at runtime)
fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING
        .get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "cipherstack")]
#[command(author, about = "Mode-driven multi-layer cipher pipeline", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a text file through the mode's cipher chain
    #[command(alias = "e")]
    Encrypt {
        /// Security mode selecting the chain and key strengths
        #[arg(long, default_value = "balanced", value_parser = parse_mode)]
        mode: SecurityMode,

        /// Key bundle file (reused if it exists, created/updated otherwise)
        #[arg(long, required = true)]
        keys: PathBuf,

        /// Input plaintext file
        input: PathBuf,

        /// Output ciphertext file
        output: PathBuf,
    },

    /// Decrypt a ciphertext file with a key bundle
    #[command(alias = "d")]
    Decrypt {
        /// Key bundle file written during encryption
        #[arg(long, required = true)]
        keys: PathBuf,

        /// Input ciphertext file
        input: PathBuf,

        /// Output plaintext file
        output: PathBuf,
    },

    /// Generate a key bundle for a mode's whole chain
    #[command(alias = "k")]
    Keygen {
        /// Security mode the keys are generated for
        #[arg(long, default_value = "balanced", value_parser = parse_mode)]
        mode: SecurityMode,

        /// Key bundle file to write
        #[arg(long, required = true)]
        keys: PathBuf,
    },

    /// Show each mode's chain and strength parameters
    #[command(alias = "m")]
    Modes,
}

fn parse_mode(s: &str) -> Result<SecurityMode, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn print_run(run: &ChainRun) {
    for (layer, sample) in run.layers.iter().zip(run.samples.iter()) {
        println!(
            "layer {}: {:<9} {:>8.3} ms  {:>10.0} B/s",
            layer.order,
            layer.algorithm.name(),
            sample.seconds * 1000.0,
            sample.throughput
        );
    }
    let metrics = run.metrics();
    println!(
        "total {:.3} ms, peak memory delta {} B, mean throughput {:.0} B/s",
        metrics.total_seconds * 1000.0,
        metrics.peak_memory_delta,
        metrics.mean_throughput
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --version flag
    if cli.version {
        println!("cipherstack {}", get_version());
        return ExitCode::SUCCESS;
    }

    // Require a command if not showing version
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // Show help when no command provided
            use clap::CommandFactory;
            Cli::command().print_help().unwrap();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Encrypt {
            mode,
            keys,
            input,
            output,
        } => {
            let options = EncryptOptions { mode };
            match encrypt_file(&input, &output, &keys, &options) {
                Ok(run) => {
                    println!(
                        "Encrypted {} through {} layers to {}",
                        input.display(),
                        run.layers.len(),
                        output.display()
                    );
                    print_run(&run);
                    println!("Keys written to {}; losing them loses the plaintext", keys.display());
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Commands::Decrypt {
            keys,
            input,
            output,
        } => match decrypt_file(&input, &output, &keys) {
            Ok(run) => {
                println!(
                    "Decrypted {} through {} layers to {}",
                    input.display(),
                    run.layers.len(),
                    output.display()
                );
                print_run(&run);
                Ok(())
            }
            Err(e) => Err(e),
        },

        Commands::Keygen { mode, keys } => {
            let options = KeygenOptions { mode };
            match keygen_to_file(&keys, &options) {
                Ok(bundle) => {
                    println!(
                        "Generated {} keys for {} mode into {}",
                        bundle.keys.len(),
                        bundle.mode,
                        keys.display()
                    );
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Commands::Modes => {
            print!("{}", describe_modes());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
