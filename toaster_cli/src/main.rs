use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use toaster_core::*;

#[derive(Parser)]
#[command(name = "toaster")]
#[command(about = "Fuzzy-logic toaster controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the inferred toasting time and plan without toasting
    Compute {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Toast one slice, printing events as they arrive
    Toast {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Override the countdown tick length (milliseconds)
        #[arg(long)]
        tick_ms: Option<u64>,
    },

    /// Read start/reset/cancel/status/quit commands from stdin
    Interactive {
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Override the countdown tick length (milliseconds)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Desired browning level (0-10)
    #[arg(long, allow_negative_numbers = true)]
    browning: f64,

    /// Bread type (0=white, 5=whole grain, 10=rye)
    #[arg(long, allow_negative_numbers = true)]
    bread_type: f64,
}

fn main() -> Result<()> {
    // Initialize logging
    toaster_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Compute { inputs, json } => cmd_compute(&inputs, json, &config),
        Commands::Toast {
            inputs,
            json,
            tick_ms,
        } => {
            if let Some(tick_ms) = tick_ms {
                config.timing.tick_ms = tick_ms;
            }
            cmd_toast(&inputs, json, &config)
        }
        Commands::Interactive { json, tick_ms } => {
            if let Some(tick_ms) = tick_ms {
                config.timing.tick_ms = tick_ms;
            }
            cmd_interactive(json, &config)
        }
    }
}

fn cmd_compute(inputs: &InputArgs, json: bool, config: &Config) -> Result<()> {
    let inputs = ControlInputs::new(inputs.browning, inputs.bread_type)
        .validate(config.inputs.strict_range)?;
    let inference = RuleTable::DEFAULT.infer(inputs);
    let plan = ToastingPlan::from_duration(inputs.browning, inference.duration_seconds);

    if json {
        let report = serde_json::json!({
            "inputs": inputs,
            "inference": inference,
            "plan": plan,
        });
        println!("{}", report);
        return Ok(());
    }

    let b = inference.browning;
    let t = inference.bread_type;
    println!(
        "Browning {}: light {:.2}, medium {:.2}, dark {:.2}",
        inputs.browning, b.low, b.mid, b.high
    );
    println!(
        "Bread type {}: white {:.2}, whole grain {:.2}, rye {:.2}",
        inputs.bread_type, t.low, t.mid, t.high
    );
    println!("Toasting Time: {:.2} seconds", plan.duration_seconds());

    let stages: Vec<String> = plan.stages().iter().map(|s| format!("{:?}", s)).collect();
    println!(
        "Stages: {} ({:.2} s each)",
        stages.join(", "),
        plan.interval_seconds()
    );
    Ok(())
}

fn cmd_toast(inputs: &InputArgs, json: bool, config: &Config) -> Result<()> {
    let (toaster, events) = Toaster::new(config);
    toaster.start(inputs.browning, inputs.bread_type)?;

    let mut display = ToasterDisplay::default();
    loop {
        thread::sleep(config.timing.poll_interval());
        if drain_events(&events, &mut display, json)? {
            return Ok(());
        }
    }
}

/// Apply and print everything queued. Returns true once a session has ended.
fn drain_events(
    events: &Receiver<ToastEvent>,
    display: &mut ToasterDisplay,
    json: bool,
) -> Result<bool> {
    let mut finished = false;
    loop {
        match events.try_recv() {
            Ok(event) => {
                print_event(&event, json);
                let ending = !display.start_enabled && event == ToastEvent::ReadyForNextStart;
                display.apply(&event);
                finished |= ending;
            }
            Err(TryRecvError::Empty) => return Ok(finished),
            Err(TryRecvError::Disconnected) => {
                return Err(Error::Other("event channel closed".into()))
            }
        }
    }
}

fn print_event(event: &ToastEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize event: {}", e),
        }
    } else {
        println!("{}", event);
    }
}

enum Command {
    Start(f64, f64),
    Reset,
    Cancel,
    Status,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut words = line.split_whitespace();
    let command = match words.next().map(|w| w.to_lowercase()).as_deref() {
        Some("start") => {
            let mut number = |name: &str| {
                words
                    .next()
                    .ok_or_else(|| format!("missing {}", name))?
                    .parse::<f64>()
                    .map_err(|_| "Please enter valid numeric values.".to_string())
            };
            let browning = number("browning")?;
            let bread_type = number("bread type")?;
            Command::Start(browning, bread_type)
        }
        Some("reset") => Command::Reset,
        Some("cancel") => Command::Cancel,
        Some("status") => Command::Status,
        Some("quit") | Some("exit") => Command::Quit,
        Some(other) => return Err(format!("Unknown command: {}", other)),
        None => return Err("empty command".into()),
    };
    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    Ok(command)
}

fn cmd_interactive(json: bool, config: &Config) -> Result<()> {
    let (toaster, events) = Toaster::new(config);
    let mut display = ToasterDisplay::default();

    // stdin is read on its own thread so the event loop keeps polling
    let (lines_tx, lines) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines().map_while(|l| l.ok()) {
                if lines_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let mut input_closed = false;
    loop {
        loop {
            match lines.try_recv() {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match parse_command(&line) {
                    Ok(Command::Quit) => {
                        toaster.cancel();
                        return Ok(());
                    }
                    Ok(command) => run_command(&toaster, command, json),
                    Err(message) => eprintln!("Error: {}", message),
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    input_closed = true;
                    break;
                }
            }
        }

        drain_events(&events, &mut display, json)?;

        // Out of input: let a running session finish, then exit
        if input_closed && toaster.status() != SessionStatus::Running {
            drain_events(&events, &mut display, json)?;
            return Ok(());
        }

        thread::sleep(config.timing.poll_interval());
    }
}

fn run_command(toaster: &Toaster, command: Command, json: bool) {
    let result = match command {
        Command::Start(browning, bread_type) => toaster.start(browning, bread_type),
        Command::Reset => toaster.reset(),
        Command::Cancel => {
            if !toaster.cancel() {
                eprintln!("Nothing to cancel.");
            }
            Ok(())
        }
        Command::Status => {
            print_status(&toaster.snapshot(), json);
            Ok(())
        }
        Command::Quit => Ok(()),
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_warning() => eprintln!("Warning: {}", e),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn print_status(snapshot: &SessionSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize status: {}", e),
        }
        return;
    }

    println!("Status: {:?}", snapshot.status);
    if let Some(plan) = &snapshot.plan {
        println!(
            "  Stage {} of {}, {:.2} of {:.2} seconds elapsed",
            snapshot.current_stage_index + 1,
            plan.stages().len(),
            snapshot.elapsed_seconds,
            plan.duration_seconds()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        match parse_command("start 5 7.5") {
            Ok(Command::Start(b, t)) => {
                assert_eq!(b, 5.0);
                assert_eq!(t, 7.5);
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = parse_command("start five 5").err().unwrap();
        assert_eq!(err, "Please enter valid numeric values.");
        assert!(parse_command("start 5").is_err());
        assert!(parse_command("toast").is_err());
    }

    #[test]
    fn test_parse_rejects_trailing_words() {
        let err = parse_command("start 5 5 junk").err().unwrap();
        assert_eq!(err, "Unexpected argument: junk");
        assert!(parse_command("reset now").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert!(matches!(parse_command("RESET"), Ok(Command::Reset)));
        assert!(matches!(parse_command("cancel"), Ok(Command::Cancel)));
        assert!(matches!(parse_command(" status "), Ok(Command::Status)));
        assert!(matches!(parse_command("exit"), Ok(Command::Quit)));
    }
}
