//! Rendering

use questlog_library::{GameStatus, Slot, StatusFilter};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
};

use crate::app::{App, DetailPane, Featured, NoticeLevel, Page};

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn status_color(status: GameStatus) -> Color {
    match status {
        GameStatus::Playing => Color::Green,
        GameStatus::Completed => Color::Cyan,
        GameStatus::Wishlist => Color::Yellow,
        GameStatus::Abandoned => Color::Red,
    }
}

/// Draw the whole screen
pub fn draw_ui<S: Slot>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Page
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);

    match app.page {
        Page::Dashboard => draw_dashboard(frame, chunks[1], app),
        Page::Search => draw_search(frame, chunks[1], app),
        Page::Detail => draw_detail(frame, chunks[1], app),
        Page::Library => draw_library(frame, chunks[1], app),
        Page::Stats => draw_stats(frame, chunks[1], app),
    }

    draw_footer(frame, chunks[2], app);
}

/// Draw page tabs
fn draw_header<S: Slot>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let titles: Vec<&str> = Page::TABS.iter().map(Page::title).collect();
    let selected = Page::TABS.iter().position(|p| *p == app.page);

    let mut tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("questlog"))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    if let Some(i) = selected {
        tabs = tabs.select(i);
    }

    frame.render_widget(tabs, area);
}

fn draw_dashboard<S: Slot>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let counts = app.store.counts();
    let summary = vec![
        Line::from(Span::styled("Your library", bold())),
        Line::from(format!(
            "{} games  |  {} playing  |  {} completed  |  {} on the wishlist",
            counts.all, counts.playing, counts.completed, counts.wishlist
        )),
    ];
    frame.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let block = Block::default().borders(Borders::ALL).title("Featured");
    match &app.featured {
        Featured::Loading => {
            frame.render_widget(Paragraph::new("Loading featured games...").block(block), chunks[1]);
        }
        Featured::Failed => {
            frame.render_widget(
                Paragraph::new("Featured games are unavailable. Press [R] to retry.").block(block),
                chunks[1],
            );
        }
        Featured::Loaded(games) if games.is_empty() => {
            frame.render_widget(Paragraph::new("Nothing featured right now.").block(block), chunks[1]);
        }
        Featured::Loaded(games) => {
            let items: Vec<ListItem> = games
                .iter()
                .map(|game| {
                    let rating = game
                        .rating
                        .map(|r| format!("  ★ {:.1}", r))
                        .unwrap_or_default();
                    let year = game
                        .release_year()
                        .map(|y| format!(" ({})", y))
                        .unwrap_or_default();
                    ListItem::new(format!("{}{}{}", game.name, year, rating))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(highlight())
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[1], &mut app.featured_list);
        }
    }
}

fn draw_search<S: Slot>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input_style = if app.search.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if app.search.editing { "_" } else { "" };
    let input = Paragraph::new(format!("{}{}", app.search.input, cursor))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title("Search games"));
    frame.render_widget(input, chunks[0]);

    let block = Block::default().borders(Borders::ALL).title("Results");
    let loading = app.search_loading();
    match &app.search.results {
        _ if loading => {
            frame.render_widget(Paragraph::new("Searching...").block(block), chunks[1]);
        }
        None => {
            frame.render_widget(
                Paragraph::new("Type at least 3 characters and press [Enter]").block(block),
                chunks[1],
            );
        }
        Some(results) => {
            let items: Vec<ListItem> = results
                .iter()
                .map(|game| {
                    let tracked = app.store.contains(&game.id.as_str().into());
                    let marker = if tracked { "✓ " } else { "  " };
                    let year = game
                        .release_year()
                        .map(|y| format!(" ({})", y))
                        .unwrap_or_default();
                    ListItem::new(format!("{}{}{}", marker, game.name, year))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(highlight())
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[1], &mut app.search.list);
        }
    }
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![Span::styled(label, bold()), Span::raw(value)])
}

/// Draw game info page
fn draw_detail<S: Slot>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let content = match &app.detail {
        None => Text::raw("No game selected"),
        Some(DetailPane::Loading(summary)) => Text::from(vec![
            Line::from(Span::styled(summary.name.clone(), bold())),
            Line::from(""),
            Line::from("Loading details..."),
        ]),
        Some(DetailPane::Loaded(details)) => {
            let mut lines = vec![Line::from(Span::styled(details.name.clone(), bold()))];

            if let Some(released) = details.released {
                lines.push(field("Released: ", released.format("%Y-%m-%d").to_string()));
            }
            if let Some(rating) = details.rating {
                lines.push(field("Rating: ", format!("{:.1}/5", rating)));
            }
            if !details.genres.is_empty() {
                lines.push(field("Genres: ", details.genres.join(", ")));
            }
            if !details.platforms.is_empty() {
                lines.push(field("Platforms: ", details.platforms.join(", ")));
            }
            if let Some(game) = app.store.get(&details.id.as_str().into()) {
                lines.push(Line::from(vec![
                    Span::styled("In library: ", bold()),
                    Span::styled(
                        game.status.label(),
                        Style::default().fg(status_color(game.status)),
                    ),
                ]));
            }
            if let Some(desc) = &details.description {
                lines.push(Line::from(""));
                lines.push(Line::from(desc.as_str()));
            }

            Text::from(lines)
        }
    };

    let title = app.detail.as_ref().map_or("Game Info", DetailPane::name);
    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_library<S: Slot>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let counts = app.store.counts();
    let titles: Vec<String> = StatusFilter::ALL
        .iter()
        .map(|f| format!("{} ({})", f.label(), counts.get(*f)))
        .collect();
    let selected = StatusFilter::ALL
        .iter()
        .position(|f| *f == app.filter)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("Filter"))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let games = app.visible_games();
    let block = Block::default().borders(Borders::ALL).title("Games");
    if games.is_empty() {
        let text = if app.store.is_empty() {
            "Your library is empty. Search for games to add them."
        } else {
            "No games with this status."
        };
        frame.render_widget(Paragraph::new(text).block(block), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = games
        .iter()
        .map(|game| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<10}", game.status.label()),
                    Style::default().fg(status_color(game.status)),
                ),
                Span::raw(game.name.clone()),
                Span::styled(
                    format!("  added {}", game.added_date.format("%Y-%m-%d")),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if !game.genres.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", game.genres.join(", ")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut app.library_list);
}

fn draw_stats<S: Slot>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let counts = app.store.counts();
    let block = Block::default().borders(Borders::ALL).title("Statistics");

    if counts.all == 0 {
        frame.render_widget(Paragraph::new("No data to chart yet.").block(block), area);
        return;
    }

    let data: Vec<(&str, u64)> = GameStatus::ALL
        .iter()
        .map(|status| {
            let count = counts.get(StatusFilter::Status(*status));
            (status.label(), count as u64)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(&data[..])
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

/// Draw help and status line
fn draw_footer<S: Slot>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let help_text = match app.page {
        Page::Dashboard => "[↑↓] Navigate  [Enter] Info  [R] Reload  [/] Search  [Tab] Pages  [Q] Quit",
        Page::Search if app.search.editing => "[Enter] Search  [Esc] Stop typing  [↓] Results",
        Page::Search => "[↑↓] Navigate  [Enter] Info  [I] Type  [Tab] Pages  [Q] Quit",
        Page::Detail => "[1] Playing  [2] Completed  [3] Wishlist  [4] Abandoned  [B] Back",
        Page::Library => "[↑↓] Navigate  [←→] Filter  [1-4] Set status  [S] Next status  [D] Remove",
        Page::Stats => "[Tab] Pages  [Q] Quit",
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    let (text, color) = match &app.notice {
        Some(notice) => (
            notice.text.as_str(),
            match notice.level {
                NoticeLevel::Info => Color::Yellow,
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
            },
        ),
        None => ("", Color::Yellow),
    };
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}
