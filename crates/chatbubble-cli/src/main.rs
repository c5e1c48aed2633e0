use chatbubble::render::{
    AnimationFrame, BubbleEngine, HeadlessError, SubjectId, SubmittedBubble, simulate_sync,
};
use chatbubble::{BubbleConfig, BubbleSettings};
use serde::Serialize;
use std::io::Read;

/// Subject the CLI submits content for.
const CLI_SUBJECT: SubjectId = SubjectId(1);

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(chatbubble::Error),
    Render(chatbubble_render::Error),
    Json(serde_json::Error),
    Disabled,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Disabled => write!(f, "Bubbles are disabled by configuration"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chatbubble::Error> for CliError {
    fn from(value: chatbubble::Error) -> Self {
        Self::Config(value)
    }
}

impl From<chatbubble_render::Error> for CliError {
    fn from(value: chatbubble_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Config(err) => Self::Config(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Animate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    ticks: Option<u32>,
}

#[derive(Serialize)]
struct AnimateOut<'a> {
    bubble: &'a SubmittedBubble,
    frames: &'a [AnimationFrame],
    finished: bool,
}

fn usage() -> &'static str {
    "chatbubble-cli\n\
\n\
USAGE:\n\
  chatbubble-cli [layout] [--config <path>] [--pretty] [<path>|-]\n\
  chatbubble-cli animate [--config <path>] [--pretty] [--ticks <n>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the message is read from stdin.\n\
  - --config accepts YAML or JSON (by extension); keys live under `bubble.`.\n\
  - layout prints the submitted bubble (lines, frame, markup) as JSON.\n\
  - animate prints the bubble plus every tick frame until it finishes, or for <n> ticks.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "animate" => args.command = Command::Animate,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--ticks" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let n = n.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
                if n == 0 {
                    return Err(CliError::Usage(usage()));
                }
                args.ticks = Some(n);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    let mut buf = match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };
    // Files and pipes usually end with a newline that is not part of the message.
    let keep = buf.trim_end_matches(['\r', '\n']).len();
    buf.truncate(keep);
    Ok(buf)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_engine(config: Option<&str>) -> Result<BubbleEngine, CliError> {
    let settings = match config {
        None => BubbleSettings::default(),
        Some(path) => BubbleSettings::from_config(&BubbleConfig::from_path(path)?),
    };
    Ok(BubbleEngine::new(settings))
}

fn run(args: Args) -> Result<(), CliError> {
    let mut engine = load_engine(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Layout => {
            let Some(bubble) = engine.submit_content(CLI_SUBJECT, &text) else {
                return Err(CliError::Disabled);
            };
            write_json(&bubble, args.pretty)
        }
        Command::Animate => {
            let Some((bubble, frames)) =
                simulate_sync(&mut engine, CLI_SUBJECT, &text, args.ticks)?
            else {
                return Err(CliError::Disabled);
            };
            let out = AnimateOut {
                finished: frames.last().is_some_and(|f| f.finished),
                bubble: &bubble,
                frames: &frames,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Disabled) => {
            eprintln!("{}", CliError::Disabled);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
