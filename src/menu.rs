//! Terminal menu loop

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};

use crate::error::AppError;

#[derive(Parser)]
#[command(about = "screen overlay menu", disable_help_flag = true)]
struct MenuLine {
    #[command(subcommand)]
    command: Option<MenuCommand>,
}

#[derive(Subcommand)]
enum MenuCommand {
    /// Open the color picker
    #[command(alias = "p")]
    Pick,
    /// Close the overlay and exit
    #[command(alias = "q")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Pick,
    Quit,
    Nothing,
}

pub fn parse_line(line: &str) -> Result<MenuAction, String> {
    let mut args = shlex::split(&line.to_lowercase()).ok_or("error: Invalid quoting")?;
    args.insert(0, "screen-overlay".to_string());
    let parsed = MenuLine::try_parse_from(args).map_err(|e| e.to_string())?;

    Ok(match parsed.command {
        Some(MenuCommand::Pick) => MenuAction::Pick,
        Some(MenuCommand::Quit) => MenuAction::Quit,
        None => MenuAction::Nothing,
    })
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

/// Read commands until quit or end of input, calling `on_pick` for each pick
pub fn run_menu<R, W, F>(mut input: R, out: &mut W, mut on_pick: F) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
    F: FnMut() -> Result<(), AppError>,
{
    writeln!(out, "SCREEN OVERLAY")?;
    writeln!(out, "  p  pick a color")?;
    writeln!(out, "  q  quit")?;

    let mut line = String::new();
    loop {
        prompt(out)?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            tracing::debug!("Menu input closed");
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed) {
            Ok(MenuAction::Pick) => on_pick()?,
            Ok(MenuAction::Quit) => {
                writeln!(out, "quitting...")?;
                return Ok(());
            }
            Ok(MenuAction::Nothing) => {}
            Err(err) => {
                write!(out, "{err}")?;
                out.flush()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands_and_aliases() {
        assert_eq!(parse_line("p"), Ok(MenuAction::Pick));
        assert_eq!(parse_line("pick"), Ok(MenuAction::Pick));
        assert_eq!(parse_line("Q"), Ok(MenuAction::Quit));
        assert_eq!(parse_line("quit"), Ok(MenuAction::Quit));
        assert!(parse_line("paint").is_err());
        assert!(parse_line("\"p").is_err());
    }

    #[test]
    fn test_menu_picks_until_quit() {
        let input = Cursor::new("p\n\nbogus\npick\nq\np\n");
        let mut out = Vec::new();
        let mut picks = 0;
        run_menu(input, &mut out, || {
            picks += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(picks, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("SCREEN OVERLAY"));
        assert!(text.contains("quitting..."));
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut out = Vec::new();
        let mut picks = 0;
        run_menu(Cursor::new("p\n"), &mut out, || {
            picks += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(picks, 1);
    }

    #[test]
    fn test_pick_failure_ends_menu() {
        let mut out = Vec::new();
        let result = run_menu(Cursor::new("p\np\n"), &mut out, || {
            Err(AppError::PickerVanished)
        });
        assert!(matches!(result, Err(AppError::PickerVanished)));
    }
}
