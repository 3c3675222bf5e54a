//! Headless terminal runner
//!
//! Pipes escape sequences from stdin (or a file) through the emulator and
//! prints the resulting snapshot, for golden testing and debugging.
//!
//! ```bash
//! printf 'Hello \x1b[31mred\x1b[0m' | anko-headless --text
//! anko-headless --input capture.bin --cols 120 --rows 40 --output snap.json
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anko_term::Terminal;

struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    text: bool,
    cols: usize,
    rows: usize,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            text: false,
            cols: 80,
            rows: 24,
            help: false,
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => args.help = true,
            "-t" | "--text" => args.text = true,
            "-i" | "--input" => {
                i += 1;
                let path = argv.get(i).ok_or("--input requires a path")?;
                args.input = Some(PathBuf::from(path));
            }
            "-o" | "--output" => {
                i += 1;
                let path = argv.get(i).ok_or("--output requires a path")?;
                args.output = Some(PathBuf::from(path));
            }
            "-c" | "--cols" => {
                i += 1;
                let value = argv.get(i).ok_or("--cols requires a number")?;
                args.cols = value.parse().map_err(|_| format!("bad --cols: {}", value))?;
            }
            "-r" | "--rows" => {
                i += 1;
                let value = argv.get(i).ok_or("--rows requires a number")?;
                args.rows = value.parse().map_err(|_| format!("bad --rows: {}", value))?;
            }
            other => return Err(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(args)
}

const HELP: &str = r#"anko-headless - run the terminal emulator without a GUI

USAGE:
    anko-headless [OPTIONS]

OPTIONS:
    -h, --help            Show this help
    -i, --input <FILE>    Input file (stdin if not given)
    -o, --output <FILE>   Output file (stdout if not given)
    -t, --text            Plain text output instead of JSON
    -c, --cols <N>        Terminal columns (default: 80)
    -r, --rows <N>        Terminal rows (default: 24)
"#;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, HELP);
            process::exit(2);
        }
    };
    if args.help {
        print!("{}", HELP);
        return Ok(());
    }

    let input = match &args.input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
    };

    let mut terminal = Terminal::with_size(args.rows, args.cols);
    terminal.feed(&input);
    let snapshot = terminal.snapshot();

    let mut rendered = if args.text {
        snapshot.text()
    } else {
        snapshot
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    };
    rendered.push('\n');

    match &args.output {
        Some(path) => File::create(path)?.write_all(rendered.as_bytes())?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}
