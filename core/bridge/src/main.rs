mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::process;
use adapter::{resolve_file_config, resolve_settings};
use cli::{parse_args, print_completion, ParseOutcome};
use common::adapter::StdEnvResolver;
use common::error::Error;
use ports::inbound::RunBridge;
use wiring::wire_bridge;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("bridge: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    if config.help {
        print_help();
        return Ok(0);
    }
    let env = StdEnvResolver;
    let file = resolve_file_config(config.config_path.as_deref(), &env)?;
    let settings = resolve_settings(&config, file)?;
    let mut app = wire_bridge(&settings, &env)?;
    app.run()
}

fn print_usage() {
    eprintln!("Usage: bridge [options]");
}

fn print_help() {
    println!("Usage: bridge [options]");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -c, --config <path>           Config file (JSON). Default: $PIXIE_HOME/config.json or ~/.config/pixie/config.json");
    println!("  -d, --device <path>           Serial device the host is attached to. Default: /dev/ttyUSB0");
    println!("  -b, --baud <rate>             Serial baud rate (9600, 19200, 38400, 57600, 115200, 230400). Default: 115200");
    println!("  --stdio                       Read queries from stdin and write answers to stdout instead of a serial device");
    println!("  -m, --model <model>           Model name. Default: gpt-3.5-turbo");
    println!("  --echo                        Answer with the echo transport (no network, no API key)");
    println!("  --history <n>                 Number of messages kept as conversation context. Default: 20");
    println!("  --dwell-ms <ms>               How long the short answer stays on screen. Default: 5000");
    println!("  --error-reply                 Write 'ERROR <kind>' on the serial line when a turn fails");
    println!("  -v, --verbose                 Emit per-turn debug logs to stderr");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  OPENAI_API_KEY  Bearer credential for the chat completions endpoint (name configurable via api_key_env)");
    println!("  PIXIE_HOME      Config directory. If unset, $XDG_CONFIG_HOME/pixie (e.g. ~/.config/pixie) is used.");
    println!();
    println!("Description:");
    println!("  Each line received on the serial link is sent as a query, together with recent");
    println!("  conversation history. The short answer is shown on the screen and the long");
    println!("  answer is written back as one line. Failed turns write nothing unless --error-reply is set.");
}
