//! Terminal UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use eventcode_core::{App, Category, Focus, Mode, NoticeKind, Rgb};

// Catppuccin Mocha colors
const BASE: Color = Color::Rgb(30, 30, 46);
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const GREEN: Color = Color::Rgb(166, 227, 161);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Draw popups/overlays
    match app.mode {
        Mode::CategoryPicker => draw_category_picker(frame, app),
        Mode::Input => draw_input_dialog(frame, app),
        Mode::Help => draw_help(frame),
        Mode::Message => draw_notice(frame, app),
        _ => {}
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let tagged = app.session.registry().len();
    let words = app.session.text().split_whitespace().count();

    let title_text = format!(
        " Transcript Event Coding - {} words, {} tagged",
        words, tagged
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Editor
            Constraint::Length(42), // Sidebar
        ])
        .split(area);

    draw_editor(frame, app, chunks[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Category::all().len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    draw_legend(frame, sidebar[0]);
    draw_tag_list(frame, app, sidebar[1]);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let editor_style = if app.focus == Focus::Editor {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let mode_indicator = match app.mode {
        Mode::Insert => " [INSERT]",
        Mode::Visual => " [VISUAL]",
        _ => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(editor_style)
        .title(format!("Transcript{}", mode_indicator));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (rows, cursor_row) = editor_rows(app, inner.width as usize);

    // Keep the cursor's wrapped row on screen
    let visible_height = inner.height as usize;
    let scroll_offset = if cursor_row >= visible_height {
        cursor_row - visible_height + 1
    } else {
        0
    };

    let paragraph = Paragraph::new(rows).scroll((scroll_offset as u16, 0));

    frame.render_widget(paragraph, inner);
}

/// Styled transcript rows hard-wrapped to `width` cells, plus the wrapped
/// row holding the cursor.
fn editor_rows(app: &App, width: usize) -> (Vec<Line<'static>>, usize) {
    let width = width.max(1);
    let selection = app.selection_range();
    let cursor_offset = app.cursor.offset();
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut cursor_row = 0;
    let mut line_start = 0;

    for line_text in app.content_lines() {
        let mut cells: Vec<Span<'static>> = Vec::new();

        for (col, ch) in line_text.char_indices() {
            let offset = line_start + col;
            let mut style = Style::default().fg(TEXT);

            if let Some(category) = app.overlay.category_at(offset) {
                style = style.fg(BASE).bg(category_color(category));
            }
            if selection.is_some_and(|sel| sel.contains(offset)) {
                style = style.fg(TEXT).bg(SURFACE1).add_modifier(Modifier::BOLD);
            }
            if offset == cursor_offset {
                style = style.add_modifier(Modifier::REVERSED);
                cursor_row = rows.len() + cells.len() / width;
            }

            cells.push(Span::styled(ch.to_string(), style));
        }

        // Cursor parked after the last character of the line
        let line_end = line_start + line_text.len();
        if cursor_offset == line_end {
            cursor_row = rows.len() + cells.len() / width;
            cells.push(Span::styled(
                " ",
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        }

        if cells.is_empty() {
            rows.push(Line::default());
        } else {
            rows.extend(cells.chunks(width).map(|row| Line::from(row.to_vec())));
        }
        line_start = line_end + 1; // +1 for newline
    }

    (rows, cursor_row)
}

fn draw_legend(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0))
        .title("Categories");

    let items: Vec<ListItem> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", quick_key(i)), Style::default().fg(SUBTEXT0)),
                Span::styled(
                    cat.as_str(),
                    Style::default().fg(BASE).bg(category_color(*cat)),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_tag_list(frame: &mut Frame, app: &App, area: Rect) {
    let sidebar_style = if app.focus == Focus::Sidebar {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let registry = app.session.registry();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(sidebar_style)
        .title(format!("Tagged ({})", registry.len()));

    let items: Vec<ListItem> = registry
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let selected = i == app.sidebar_selected;
            let marker = if selected { ">" } else { " " };

            let text_preview: String = entry
                .text
                .chars()
                .take(30)
                .collect::<String>()
                .replace('\n', " ");

            let style = if selected {
                Style::default().fg(TEXT).bg(SURFACE1)
            } else {
                Style::default().fg(TEXT)
            };

            ListItem::new(vec![
                Line::from(Span::styled(format!("{} \"{}\"", marker, text_preview), style)),
                Line::from(vec![
                    Span::raw("   "),
                    Span::styled(
                        entry.category.as_str(),
                        Style::default().fg(category_color(entry.category)),
                    ),
                ]),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::Visual => "VISUAL",
        Mode::CategoryPicker => "CATEGORY",
        Mode::Input => "SAVE",
        Mode::Help => "HELP",
        Mode::Message => "MESSAGE",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = match app.mode {
        Mode::Insert => "type or paste text | Esc done",
        Mode::Visual => "move to select | 1-9,0 tag | a pick | x clear | Esc done",
        _ => "i edit | v select | s save | ? help | q quit",
    };

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_category_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(46, Category::all().len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title("Select Category (j/k, Enter)");

    let items: Vec<ListItem> = Category::all()
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let selected = i == app.category_selected;
            let marker = if selected { ">" } else { " " };
            let style = if selected {
                Style::default().fg(BASE).bg(category_color(*cat))
            } else {
                Style::default().fg(category_color(*cat))
            };
            ListItem::new(format!("{} {} {}", quick_key(i), marker, cat.as_str())).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_input_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 3, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GREEN))
        .title("Save CSV as (Enter to save, Esc to cancel)");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = Paragraph::new(format!("{}_", app.input_buffer)).style(Style::default().fg(TEXT));
    frame.render_widget(input, inner);
}

fn draw_notice(frame: &mut Frame, app: &App) {
    let Some(notice) = &app.notice else {
        return;
    };

    let area = centered_rect(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let color = match notice.kind {
        NoticeKind::Info => GREEN,
        NoticeKind::Error => RED,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(notice.title.as_str());

    let body = vec![
        Line::from(notice.body.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(SUBTEXT0),
        )),
    ];

    let paragraph = Paragraph::new(body)
        .block(block)
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(64, 24, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(MAUVE).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Editing", heading)),
        Line::from("  i        Edit / paste transcript text (Esc to stop)"),
        Line::from("  u/Ctrl-z Undo edit          Ctrl-r  Redo edit"),
        Line::from("  Use {curly brackets} to mark temporally nested events"),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  h/j/k/l  Move cursor        w/e/b  Word motions"),
        Line::from("  g/G      Go to top/bottom   ]/[    Next/prev tag"),
        Line::from("  Tab      Toggle transcript/tag list"),
        Line::from(""),
        Line::from(Span::styled("Coding", heading)),
        Line::from("  v        Start selecting (cursor end is exclusive)"),
        Line::from("  1-9, 0   Assign category to selection"),
        Line::from("  a/Enter  Pick category from a list"),
        Line::from("  x/c      Clear category (select the exact tagged text)"),
        Line::from("  Categories are mutually exclusive; re-tag to change"),
        Line::from(""),
        Line::from(Span::styled("File", heading)),
        Line::from("  s        Save tags to CSV and start a new transcript"),
        Line::from("  q        Quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

/// Digit key bound to the category at `index`
fn quick_key(index: usize) -> char {
    char::from_digit(((index + 1) % 10) as u32, 10).unwrap_or(' ')
}

fn category_color(category: Category) -> Color {
    match Rgb::from_hex(category.color()) {
        Some(Rgb(r, g, b)) => Color::Rgb(r, g, b),
        None => Color::White,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
