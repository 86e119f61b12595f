//! pixie-send: ホスト側からシリアル線へ 1 行の問い合わせを書き、回答行を待って表示する

use anyhow::{bail, Context, Result};
use common::adapter::{SerialLineChannel, DEFAULT_BAUD};
use common::domain::DevicePath;
use common::ports::outbound::{LineChannel, LineEvent};
use std::process;
use std::time::{Duration, Instant};

const DEFAULT_DEVICE: &str = "/dev/serial0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const EXIT_USAGE: i32 = 64;
const EXIT_TIMEOUT: i32 = 124;

#[derive(Debug, PartialEq)]
struct Args {
    device: String,
    baud: u32,
    timeout: Duration,
    query: String,
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(Some(a)) => a,
        Ok(None) => {
            print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("pixie-send: {}", e);
            print_usage();
            process::exit(EXIT_USAGE);
        }
    };
    let exit_code = match run(&args) {
        Ok(Some(answer)) => {
            println!("{}", answer);
            0
        }
        Ok(None) => {
            eprintln!(
                "pixie-send: no answer within {}s",
                args.timeout.as_secs()
            );
            EXIT_TIMEOUT
        }
        Err(e) => {
            eprintln!("pixie-send: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn print_usage() {
    eprintln!("Usage: pixie-send [-d device] [-b baud] [-t timeout_secs] <query...>");
}

/// 引数を解釈する（-h なら None）
fn parse_args(argv: &[String]) -> Result<Option<Args>> {
    let mut device = DEFAULT_DEVICE.to_string();
    let mut baud = DEFAULT_BAUD;
    let mut timeout = DEFAULT_TIMEOUT;
    let mut words: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < argv.len() {
        let arg = argv[i].as_str();
        match arg {
            "-h" | "--help" => return Ok(None),
            "-d" | "--device" | "-b" | "--baud" | "-t" | "--timeout" => {
                let value = argv
                    .get(i + 1)
                    .with_context(|| format!("option {} requires an argument", arg))?;
                match arg {
                    "-d" | "--device" => device = value.clone(),
                    "-b" | "--baud" => {
                        baud = value
                            .parse()
                            .with_context(|| format!("invalid baud rate: {}", value))?
                    }
                    _ => {
                        let secs: u64 = value
                            .parse()
                            .with_context(|| format!("invalid timeout: {}", value))?;
                        if secs == 0 {
                            bail!("timeout must be at least 1 second");
                        }
                        timeout = Duration::from_secs(secs);
                    }
                }
                i += 2;
            }
            "--" => {
                words.extend(argv[i + 1..].iter().map(String::as_str));
                break;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => bail!("unknown option: {}", arg),
            _ => {
                words.push(arg);
                i += 1;
            }
        }
    }

    let query = words.join(" ");
    if query.trim().is_empty() {
        bail!("query is required");
    }
    Ok(Some(Args {
        device,
        baud,
        timeout,
        query,
    }))
}

/// 問い合わせを書いて回答行を待つ（期限切れなら None）
fn run(args: &Args) -> Result<Option<String>> {
    let device = DevicePath::new(&args.device);
    let mut channel = SerialLineChannel::open(&device, args.baud)
        .with_context(|| format!("cannot use {}", device))?;
    channel
        .write_line(args.query.trim())
        .context("failed to send query")?;
    wait_for_answer(&mut channel, args.timeout)
}

fn wait_for_answer(channel: &mut dyn LineChannel, timeout: Duration) -> Result<Option<String>> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        match channel.read_line()? {
            LineEvent::Line(line) if line.trim().is_empty() => continue,
            LineEvent::Line(line) => return Ok(Some(line)),
            LineEvent::Idle => continue,
            LineEvent::Closed => bail!("serial link closed before an answer arrived"),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::Error;
    use std::collections::VecDeque;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Scripted(VecDeque<LineEvent>);

    impl LineChannel for Scripted {
        fn read_line(&mut self) -> std::result::Result<LineEvent, Error> {
            Ok(self.0.pop_front().unwrap_or(LineEvent::Idle))
        }

        fn write_line(&mut self, _line: &str) -> std::result::Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = parse_args(&argv(&["what", "time", "is", "it"])).unwrap().unwrap();
        assert_eq!(args.device, "/dev/serial0");
        assert_eq!(args.baud, 115_200);
        assert_eq!(args.timeout, Duration::from_secs(30));
        assert_eq!(args.query, "what time is it");
    }

    #[test]
    fn test_parse_options() {
        let args = parse_args(&argv(&["-d", "/dev/ttyACM0", "-b", "9600", "-t", "5", "--", "-x", "y"]))
            .unwrap()
            .unwrap();
        assert_eq!(args.device, "/dev/ttyACM0");
        assert_eq!(args.baud, 9600);
        assert_eq!(args.timeout, Duration::from_secs(5));
        assert_eq!(args.query, "-x y");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&argv(&[])).is_err());
        assert!(parse_args(&argv(&["-d"])).is_err());
        assert!(parse_args(&argv(&["-t", "0", "q"])).is_err());
        assert!(parse_args(&argv(&["--bogus", "q"])).is_err());
        assert_eq!(parse_args(&argv(&["-h"])).unwrap(), None);
    }

    #[test]
    fn test_wait_skips_idle_and_blank_lines() {
        let mut ch = Scripted(
            vec![
                LineEvent::Idle,
                LineEvent::Line(String::new()),
                LineEvent::Line("the answer".to_string()),
            ]
            .into(),
        );
        let answer = wait_for_answer(&mut ch, Duration::from_secs(5)).unwrap();
        assert_eq!(answer.as_deref(), Some("the answer"));
    }

    #[test]
    fn test_wait_times_out() {
        let mut ch = Scripted(VecDeque::new());
        let answer = wait_for_answer(&mut ch, Duration::from_millis(20)).unwrap();
        assert_eq!(answer, None);
    }

    #[test]
    fn test_wait_closed_is_error() {
        let mut ch = Scripted(vec![LineEvent::Closed].into());
        assert!(wait_for_answer(&mut ch, Duration::from_secs(1)).is_err());
    }
}
