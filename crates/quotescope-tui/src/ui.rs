// UI rendering logic
use quotescope_api::{FontSize, Quote};
use quotescope_core::pagination::visible_pages;
use quotescope_core::theme::ThemeColors;
use quotescope_core::PageSlot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Screen, SliderTrack};

const KNOB: &str = "●";

fn rgb(color: quotescope_core::theme::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let colors = app.theme.colors();

    // Paint the theme background under everything
    frame.render_widget(
        Block::default().style(Style::default().bg(rgb(colors.background)).fg(rgb(colors.foreground))),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with filters
            Constraint::Length(3), // Search input
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, &colors, chunks[0]);
    render_search_input(frame, app, &colors, chunks[1]);

    match app.screen {
        Screen::Quote if app.is_searching() => {
            app.slider = None;
            render_search_results(frame, app, &colors, chunks[2]);
        }
        Screen::Quote => render_quote_screen(frame, app, &colors, chunks[2]),
        Screen::List => {
            app.slider = None;
            render_list_screen(frame, app, &colors, chunks[2]);
        }
    }

    render_status_bar(frame, app, &colors, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let type_name = app.catalog.type_name(app.filters.type_id).unwrap_or("All");
    let topic_name = app.catalog.topic_name(app.filters.topic_id).unwrap_or("All");
    let screen = match app.screen {
        Screen::Quote => "QUOTE",
        Screen::List => "LIST",
    };

    let line = Line::from(vec![
        Span::styled(
            " Quotescope ",
            Style::default().fg(rgb(colors.primary)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}] ", screen), Style::default().fg(rgb(colors.secondary))),
        Span::styled("Type: ", Style::default().fg(rgb(colors.muted))),
        Span::styled(type_name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("  Topic: ", Style::default().fg(rgb(colors.muted))),
        Span::styled(topic_name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  Theme: {}", app.theme), Style::default().fg(rgb(colors.muted))),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(colors.border))),
    );
    frame.render_widget(header, area);
}

fn render_search_input(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let border = match app.input_mode {
        InputMode::Searching => rgb(colors.border_focused),
        InputMode::Normal => rgb(colors.border),
    };

    let placeholder = app.search_input.is_empty() && app.input_mode == InputMode::Normal;
    let text = if placeholder {
        Span::styled("Press / to search quotes", Style::default().fg(rgb(colors.muted)))
    } else {
        Span::raw(app.search_input.as_str())
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching {
        frame.set_cursor_position((area.x + 1 + app.search_input.chars().count() as u16, area.y + 1));
    }
}

fn render_quote_screen(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Quote text
            Constraint::Length(4), // Slider
        ])
        .split(area);

    render_quote(frame, app, colors, chunks[0]);
    render_slider(frame, app, colors, chunks[1]);
}

fn quote_style(quote: &Quote, colors: &ThemeColors) -> Style {
    let base = Style::default().fg(rgb(colors.foreground));
    match quote.font_size() {
        FontSize::Max | FontSize::Upper => base.add_modifier(Modifier::BOLD),
        FontSize::Middle => base,
        FontSize::Under | FontSize::Min => base.add_modifier(Modifier::DIM),
    }
}

fn render_quote(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(colors.border)));

    let lines = match (&app.view.quote, app.view.loading) {
        (_, true) if app.view.quote.is_none() => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(rgb(colors.muted)),
        ))],
        (Some(quote), _) => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(quote.quote.clone(), quote_style(quote, colors))),
                Line::from(""),
            ];
            if !quote.author.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("- {}", quote.author),
                    Style::default().fg(rgb(colors.primary)).add_modifier(Modifier::ITALIC),
                )));
            }
            if !quote.book.is_empty() {
                lines.push(Line::from(Span::styled(
                    quote.book.clone(),
                    Style::default().fg(rgb(colors.muted)),
                )));
            }
            lines
        }
        (None, _) => vec![Line::from(Span::styled(
            "No quotes for these filters",
            Style::default().fg(rgb(colors.muted)),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_slider(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.view.dragging {
            rgb(colors.border_focused)
        } else {
            rgb(colors.border)
        }))
        .title(match app.view.position {
            Some(position) => format!(" {} / {} ", position, app.view.total),
            None => " - / - ".to_string(),
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width < 5 || inner.height == 0 {
        app.slider = None;
        return;
    }

    // "< " track " >"
    let track_area = Rect::new(inner.x + 2, inner.y, inner.width.saturating_sub(4), 1);
    let track = SliderTrack::from_rect(track_area);
    app.slider = Some(track);

    let knob = track.column_at(app.view.progress) - track.x;
    let mut spans = vec![Span::styled("< ", Style::default().fg(rgb(colors.muted)))];
    for column in 0..track.width {
        let span = if app.view.total > 0 && column == knob {
            Span::styled(KNOB, Style::default().fg(rgb(colors.slider_fill)).add_modifier(Modifier::BOLD))
        } else if column < knob && !app.view.disabled {
            Span::styled("━", Style::default().fg(rgb(colors.slider_fill)))
        } else {
            Span::styled("─", Style::default().fg(rgb(colors.slider_track)))
        };
        spans.push(span);
    }
    spans.push(Span::styled(" >", Style::default().fg(rgb(colors.muted))));

    let mut lines = vec![Line::from(spans)];

    // Tick marks under small collections
    if inner.height > 1 && !app.view.ticks.is_empty() {
        let mut row = vec![' '; track.width as usize];
        for &(_, progress) in &app.view.ticks {
            let column = track.column_at(progress) - track.x;
            if let Some(cell) = row.get_mut(column as usize) {
                *cell = '|';
            }
        }
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(row.into_iter().collect::<String>(), Style::default().fg(rgb(colors.muted))),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn quote_item<'a>(quote: &'a Quote, colors: &ThemeColors) -> ListItem<'a> {
    let mut header = vec![Span::styled(
        format!("#{} ", quote.id),
        Style::default().fg(rgb(colors.secondary)).add_modifier(Modifier::BOLD),
    )];
    if !quote.author.is_empty() {
        header.push(Span::styled(quote.author.as_str(), Style::default().fg(rgb(colors.primary))));
    }

    ListItem::new(vec![
        Line::from(header),
        Line::from(Span::styled(quote.quote.as_str(), Style::default().fg(rgb(colors.foreground)))),
        Line::from(""),
    ])
}

fn render_quote_list(
    frame: &mut Frame,
    app: &mut App,
    colors: &ThemeColors,
    area: Rect,
    title: String,
    quotes: Vec<Quote>,
) {
    let items: Vec<ListItem> = quotes.iter().map(|q| quote_item(q, colors)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(rgb(colors.border))),
        )
        .highlight_style(Style::default().bg(rgb(colors.selected_bg)));
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_error(frame: &mut Frame, message: &str, colors: &ThemeColors, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(rgb(colors.error)).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_search_results(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    if let Some(error) = &app.search.error {
        render_error(frame, error, colors, area);
        return;
    }

    let title = format!(" Results for \"{}\" ({}) ", app.active_search, app.search.quotes.len());
    let quotes = app.search.quotes.clone();
    render_quote_list(frame, app, colors, area, title, quotes);
}

fn render_list_screen(frame: &mut Frame, app: &mut App, colors: &ThemeColors, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    if let Some(error) = app.list.error() {
        let error = error.to_string();
        render_error(frame, &error, colors, chunks[0]);
    } else if app.list.is_loading() {
        frame.render_widget(
            Paragraph::new("Loading...").block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );
    } else {
        let title = format!(" Page {} of {} ", app.list.page(), app.list.total_pages());
        let quotes = app.list.quotes().to_vec();
        render_quote_list(frame, app, colors, chunks[0], title, quotes);
    }

    render_page_bar(frame, app, colors, chunks[1]);
}

fn render_page_bar(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let pages = app.list.page_infos();
    let current = app.list.page();

    let mut spans = vec![Span::styled("[p] < ", Style::default().fg(rgb(colors.muted)))];
    for slot in visible_pages(&pages, current, false) {
        let span = match slot {
            PageSlot::Page(info) if info.page == current => Span::styled(
                format!(" {} ", info.label),
                Style::default()
                    .fg(rgb(colors.background))
                    .bg(rgb(colors.primary))
                    .add_modifier(Modifier::BOLD),
            ),
            PageSlot::Page(info) => Span::styled(format!(" {} ", info.label), Style::default().fg(rgb(colors.foreground))),
            PageSlot::EllipsisStart | PageSlot::EllipsisEnd => {
                Span::styled(" ... ", Style::default().fg(rgb(colors.muted)))
            }
        };
        spans.push(span);
    }
    spans.push(Span::styled(" > [n]", Style::default().fg(rgb(colors.muted))));

    let bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(rgb(colors.border))),
        )
        .alignment(Alignment::Center);
    frame.render_widget(bar, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, colors: &ThemeColors, area: Rect) {
    let text = if let Some(error) = &app.error_message {
        Line::from(Span::styled(format!(" {} ", error), Style::default().fg(rgb(colors.error))))
    } else {
        let help = match (app.input_mode, app.screen) {
            (InputMode::Searching, _) => " Enter: done | Esc: clear search ",
            (InputMode::Normal, Screen::Quote) => {
                " ←/→: step | drag slider | t: type | o: topic | c: clear | r: random | Tab: list | d: theme | /: search | q: quit "
            }
            (InputMode::Normal, Screen::List) => {
                " n/p: page | ↑/↓: scroll | t: type | o: topic | c: clear | Tab: quote | d: theme | /: search | q: quit "
            }
        };
        Line::from(Span::styled(help, Style::default().fg(rgb(colors.muted))))
    };

    frame.render_widget(Paragraph::new(text), area);
}
