use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{DevicePath, ModelName};
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: turn ごとのデバッグログを stderr に出す
    pub verbose: bool,
    /// --echo: API を呼ばず Echo トランスポートで応答する
    pub echo: bool,
    /// --stdio: シリアルデバイスの代わりに stdin / stdout を使う
    pub stdio: bool,
    /// --error-reply: 失敗したターンで "ERROR <kind>" を 1 行返す
    pub error_reply: bool,
    pub config_path: Option<PathBuf>,
    pub device: Option<DevicePath>,
    pub baud: Option<u32>,
    pub model: Option<ModelName>,
    pub history: Option<usize>,
    pub dwell_ms: Option<u64>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("bridge")
        .about("Forward serial query lines to a chat completions API and answer on the same line")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit per-turn debug logs to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("echo")
                .long("echo")
                .help("Answer with the echo transport (no network, no API key)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("stdio")
                .long("stdio")
                .help("Read queries from stdin and write answers to stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("error-reply")
                .long("error-reply")
                .help("Write 'ERROR <kind>' on the serial line when a turn fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .value_name("path")
                .help("Config file (default: $PIXIE_HOME/config.json or ~/.config/pixie/config.json)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("device")
                .short('d')
                .long("device")
                .value_name("path")
                .help("Serial device (e.g. /dev/ttyUSB0)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("baud")
                .short('b')
                .long("baud")
                .value_name("rate")
                .help("Serial baud rate (default: 115200)")
                .value_parser(value_parser!(u32))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Specify model name (e.g. gpt-3.5-turbo, gpt-4o-mini)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("history")
                .long("history")
                .value_name("n")
                .help("Number of history messages kept for context (default: 20)")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("dwell-ms")
                .long("dwell-ms")
                .value_name("ms")
                .help("How long the short answer stays on screen (default: 5000)")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        echo: matches.get_flag("echo"),
        stdio: matches.get_flag("stdio"),
        error_reply: matches.get_flag("error-reply"),
        config_path: matches.get_one::<PathBuf>("config").cloned(),
        device: matches
            .get_one::<PathBuf>("device")
            .map(|p| DevicePath::new(p.clone())),
        baud: matches.get_one::<u32>("baud").copied(),
        model: matches
            .get_one::<String>("model")
            .map(|s| ModelName::new(s.clone())),
        history: matches.get_one::<usize>("history").copied(),
        dwell_ms: matches.get_one::<u64>("dwell-ms").copied(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_outcome(build_clap_command().try_get_matches())
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<ParseOutcome, Error> {
    parse_outcome(build_clap_command().try_get_matches_from(args))
}

fn parse_outcome(matches: Result<clap::ArgMatches, clap::Error>) -> Result<ParseOutcome, Error> {
    let matches = matches.map_err(|e| Error::invalid_argument(e.to_string()))?;
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "bridge", &mut std::io::stdout());
}
