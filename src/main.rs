use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use graphcalc::export::{render_view_to_png, MAX_IMAGE_DIMENSION};
use graphcalc::graph::{Command, GraphView};
use graphcalc::lang::builtins;
use graphcalc::persistence::config::{load_config, Config};

const USAGE: &str = "usage: graphcalc [-o out.png] [--dark] [--no-minor] [--size WxH] \
[--zoom-in|--zoom-out|--pan-up|--pan-down|--pan-left|--pan-right|--reset]... EXPR...\n       \
graphcalc --list-functions";

#[derive(Debug)]
struct Args {
    output: PathBuf,
    size: Option<(u32, u32)>,
    dark: bool,
    no_minor: bool,
    commands: Vec<Command>,
    expressions: Vec<String>,
    list_functions: bool,
}

fn parse_size(value: &str) -> Result<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("--size expects WxH, got {:?}", value))?;
    let width: u32 = w.trim().parse().with_context(|| format!("bad width {:?}", w))?;
    let height: u32 = h.trim().parse().with_context(|| format!("bad height {:?}", h))?;
    if width == 0 || height == 0 {
        bail!("--size must be nonzero, got {}x{}", width, height);
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        bail!(
            "--size is limited to {}x{}, got {}x{}",
            MAX_IMAGE_DIMENSION,
            MAX_IMAGE_DIMENSION,
            width,
            height
        );
    }
    Ok((width, height))
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut output = PathBuf::from("graph.png");
    let mut size = None;
    let mut dark = false;
    let mut no_minor = false;
    let mut commands = Vec::new();
    let mut expressions = Vec::new();
    let mut list_functions = false;

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                output = PathBuf::from(it.next().context("-o requires a path")?);
            }
            "--size" => {
                size = Some(parse_size(&it.next().context("--size requires WxH")?)?);
            }
            "--dark" => dark = true,
            "--no-minor" => no_minor = true,
            "--zoom-in" => commands.push(Command::ZoomIn),
            "--zoom-out" => commands.push(Command::ZoomOut),
            "--pan-up" => commands.push(Command::PanUp),
            "--pan-down" => commands.push(Command::PanDown),
            "--pan-left" => commands.push(Command::PanLeft),
            "--pan-right" => commands.push(Command::PanRight),
            "--reset" => commands.push(Command::Reset),
            "--list-functions" => list_functions = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            "--" => {
                expressions.extend(it);
                break;
            }
            // Negative literals such as "-x" are expressions, not flags
            flag if flag.starts_with("--") => {
                return Err(anyhow!("unknown option {}\n{}", flag, USAGE));
            }
            _ => expressions.push(arg),
        }
    }

    Ok(Args {
        output,
        size,
        dark,
        no_minor,
        commands,
        expressions,
        list_functions,
    })
}

/// Display flags override the config file rather than toggling it.
fn apply_display_flags(config: &mut Config, args: &Args) {
    if args.dark {
        config.dark_mode = true;
    }
    if args.no_minor {
        config.show_minor_grid = false;
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.list_functions {
        for name in builtins::known_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = load_config();
    apply_display_flags(&mut config, &args);
    let (width, height) = args.size.unwrap_or((config.width, config.height));

    let mut view = GraphView::from_config(&config);
    let mut expressions = args.expressions.into_iter();
    if let Some(first) = expressions.next() {
        view.dispatch(Command::SetExpression(first));
    }
    for expr in expressions {
        view.dispatch(Command::AddExpression(expr));
    }
    for command in args.commands {
        view.dispatch(command);
    }

    for expr in view.state().expressions() {
        if let Err(err) = graphcalc::lang::compile(expr) {
            eprintln!("warning: {:?}: {}", expr, err);
        }
    }

    let graph = render_view_to_png(&mut view, width, height)
        .map_err(|e| anyhow!("render failed: {}", e))?;
    std::fs::write(&args.output, &graph.png_bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!(
        "wrote {}x{} graph of {} expression(s) to {}",
        graph.width,
        graph.height,
        view.state().expressions().len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_display_flags_are_absolute() {
        let parsed = args(&["--dark", "--no-minor", "sin(x)"]).unwrap();
        let mut config = Config {
            dark_mode: true,
            show_minor_grid: false,
            ..Config::default()
        };
        apply_display_flags(&mut config, &parsed);
        assert!(config.dark_mode);
        assert!(!config.show_minor_grid);

        let mut config = Config::default();
        apply_display_flags(&mut config, &parsed);
        assert!(config.dark_mode);
        assert!(!config.show_minor_grid);

        let plain = args(&["x"]).unwrap();
        let mut config = Config {
            dark_mode: true,
            ..Config::default()
        };
        apply_display_flags(&mut config, &plain);
        assert!(config.dark_mode);
        assert!(config.show_minor_grid);
    }

    #[test]
    fn test_size_is_bounded() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("4294967295x4294967295").is_err());
        assert!(parse_size(&format!("{}x10", MAX_IMAGE_DIMENSION + 1)).is_err());
    }

    #[test]
    fn test_expressions_and_commands() {
        let parsed = args(&["-o", "out.png", "--zoom-in", "x**2", "-x", "--", "--x"]).unwrap();
        assert_eq!(parsed.output, PathBuf::from("out.png"));
        assert_eq!(parsed.commands, vec![Command::ZoomIn]);
        assert_eq!(parsed.expressions, vec!["x**2", "-x", "--x"]);
        assert!(args(&["--bogus"]).is_err());
    }
}
