//! Event Coding CLI - Terminal-based transcript event coding tool

mod config;
mod io;
mod ui;

use std::fs::OpenOptions;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info};

use eventcode_core::{App, Category, Focus, Mode};

use crate::config::Config;

/// Log file inside ~/.eventcode
const LOG_FILE: &str = "eventcode.log";

fn main() -> Result<()> {
    // Get optional transcript path from args
    let args: Vec<String> = std::env::args().collect();
    let file_path = args.get(1);

    let app_dir = io::app_dir()?;
    init_logging(&app_dir)?;
    let config = Config::load(&app_dir)?;
    let export_dir = config.export_dir(&app_dir);
    info!(export_dir = %export_dir.display(), "starting eventcode");

    // Create app
    let mut app = App::new();

    // Load file if provided
    if let Some(path) = file_path {
        match io::load_file(path) {
            Ok(text) => {
                app.load_text(&text);
                app.set_status(&format!("Loaded {}", path));
            }
            Err(e) => {
                error!(path = %path, error = %e, "failed to load transcript");
                app.set_status(&format!("Error: {}", e));
            }
        }
    } else {
        app.set_status("Press 'i' and paste a transcript, or pass a file path as argument.");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app, &export_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        error!(error = %e, "eventcode exited with an error");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Send tracing output to ~/.eventcode/eventcode.log so it never draws
/// over the terminal UI. Filter with RUST_LOG; defaults to info.
fn init_logging(app_dir: &Path) -> Result<()> {
    let log_path = app_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, export_dir: &Path) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // Clear status on any key
                app.clear_status();

                match app.mode {
                    Mode::Normal => handle_normal_mode(app, key.code, key.modifiers, export_dir),
                    Mode::Insert => handle_insert_mode(app, key.code, key.modifiers),
                    Mode::Visual => handle_visual_mode(app, key.code),
                    Mode::CategoryPicker => handle_category_picker(app, key.code),
                    Mode::Input => handle_input_mode(app, key.code),
                    Mode::Help => {
                        app.mode = Mode::Normal;
                    }
                    Mode::Message => app.dismiss_notice(),
                }
            }
            Event::Paste(text) => {
                if app.mode == Mode::Insert {
                    app.insert_str(&text);
                } else if app.mode == Mode::Input {
                    app.input_buffer.push_str(text.trim());
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers, export_dir: &Path) {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        // Undo/redo
        KeyCode::Char('z') if ctrl => app.undo(),
        KeyCode::Char('r') if ctrl => app.redo(),
        KeyCode::Char('u') => app.undo(),

        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            if app.focus == Focus::Editor {
                app.move_down();
            } else {
                app.next_entry();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.focus == Focus::Editor {
                app.move_up();
            } else {
                app.prev_entry();
            }
        }

        // Tag navigation
        KeyCode::Char(']') => app.next_entry(),
        KeyCode::Char('[') => app.prev_entry(),

        // Editing and selection
        KeyCode::Char('i') => app.enter_insert_mode(),
        KeyCode::Char('v') => app.enter_visual_mode(),

        // Focus toggle
        KeyCode::Tab => app.toggle_focus(),

        // Save
        KeyCode::Char('s') => {
            let suggested = suggested_save_path(export_dir);
            app.start_save(&suggested.to_string_lossy());
        }

        // The sidebar only answers to j/k and arrows
        code if app.focus == Focus::Editor => move_cursor(app, code),
        _ => {}
    }
}

/// Cursor motions shared by normal and visual mode
fn move_cursor(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('w') => app.move_word_forward(),
        KeyCode::Char('e') => app.move_word_end(),
        KeyCode::Char('b') => app.move_word_back(),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),
        KeyCode::Home => app.move_to_start(),
        KeyCode::End => app.move_to_end(),
        _ => {}
    }
}

fn handle_insert_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => app.newline(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Tab => app.insert_char('\t'),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Home => app.move_to_start(),
        KeyCode::End => app.move_to_end(),
        KeyCode::Char('z') if modifiers.contains(KeyModifiers::CONTROL) => app.undo(),
        KeyCode::Char('r') | KeyCode::Char('y') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.redo()
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
        _ => {}
    }
}

fn handle_visual_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.exit_visual_mode(),
        KeyCode::Char('a') | KeyCode::Enter => app.open_category_picker(),
        KeyCode::Char('x') | KeyCode::Char('c') => app.clear_category(),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(category) = category_for_key(c) {
                app.assign_category(category);
            }
        }
        code => move_cursor(app, code),
    }
}

fn handle_category_picker(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_picker(),
        KeyCode::Char('j') | KeyCode::Down => app.picker_next(),
        KeyCode::Char('k') | KeyCode::Up => app.picker_prev(),
        KeyCode::Enter => app.confirm_picker(),
        // Quick select
        KeyCode::Char(c) => {
            if let Some(category) = category_for_key(c) {
                app.cancel_picker();
                app.assign_category(category);
            }
        }
        _ => {}
    }
}

fn handle_input_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.save_to(None),
        KeyCode::Enter => {
            let destination = io::resolve_destination(&app.input_buffer);
            app.save_to(destination.as_deref());
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
        }
        _ => {}
    }
}

/// Category bound to a digit key: 1-9 then 0 for the tenth
fn category_for_key(c: char) -> Option<Category> {
    let digit = c.to_digit(10)? as usize;
    let index = if digit == 0 { 9 } else { digit - 1 };
    Category::all().get(index).copied()
}

/// Timestamped path in the export directory, created on demand
fn suggested_save_path(export_dir: &Path) -> PathBuf {
    if let Err(e) = io::ensure_dir(export_dir) {
        error!(error = %e, "cannot create export directory");
    }
    io::default_export_path(export_dir, chrono::Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys_follow_category_order() {
        assert_eq!(category_for_key('1'), Some(Category::Event));
        assert_eq!(category_for_key('2'), Some(Category::Place));
        assert_eq!(category_for_key('9'), Some(Category::EmotionThought));
        assert_eq!(category_for_key('0'), Some(Category::Repetitions));
        assert_eq!(category_for_key('x'), None);
    }

    #[test]
    fn test_visual_keys_tag_and_clear() {
        let mut app = App::new();
        app.load_text("we left the house");
        app.move_word_forward();
        app.enter_visual_mode();
        handle_visual_mode(&mut app, KeyCode::Char('e'));
        handle_visual_mode(&mut app, KeyCode::Char('1'));
        assert_eq!(app.session.registry().get("left"), Some(Category::Event));

        handle_visual_mode(&mut app, KeyCode::Char('x'));
        assert!(app.session.registry().is_empty());
        assert_eq!(app.mode, Mode::Visual);
    }

    #[test]
    fn test_escape_in_save_prompt_cancels() {
        let mut app = App::new();
        app.load_text("{kept}");
        app.start_save("somewhere.csv");
        handle_input_mode(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.session.text(), "{kept}");
    }

    #[test]
    fn test_sidebar_focus_ignores_editor_motions() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new();
        app.load_text("we left the house");
        app.toggle_focus();

        for key in ['l', 'w', 'e', 'G'] {
            handle_normal_mode(&mut app, KeyCode::Char(key), KeyModifiers::NONE, dir.path());
        }
        handle_normal_mode(&mut app, KeyCode::End, KeyModifiers::NONE, dir.path());
        assert_eq!(app.cursor_pos(), (0, 0));

        app.toggle_focus();
        handle_normal_mode(&mut app, KeyCode::Char('w'), KeyModifiers::NONE, dir.path());
        assert_eq!(app.cursor_pos(), (0, 3));
    }

    #[test]
    fn test_undo_and_redo_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new();
        app.load_text("we left");
        app.move_to_end();
        app.enter_insert_mode();
        handle_insert_mode(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        handle_insert_mode(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(app.session.text(), "we left");

        handle_insert_mode(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        handle_normal_mode(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL, dir.path());
        assert_eq!(app.session.text(), "we lef");

        handle_normal_mode(&mut app, KeyCode::Char('u'), KeyModifiers::NONE, dir.path());
        assert_eq!(app.session.text(), "we left");
        assert_eq!(app.mode, Mode::Normal);
    }
}
