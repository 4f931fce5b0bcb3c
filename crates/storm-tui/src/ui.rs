//! UI rendering for the stormwatch TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::present::AlertTile;

/// Rows taken by one alert tile, borders included.
pub const TILE_HEIGHT: u16 = 7;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let areas = ScreenAreas::split(frame.area(), app);

    draw_header(frame, app, areas.header);
    draw_stats(frame, app, areas.stats);
    draw_tiles(frame, app, areas.tiles);
    if let Some(pager) = areas.pager {
        draw_pager(frame, app, pager);
    }
    draw_footer(frame, app, areas.footer);
}

/// Where the tile grid lands for a terminal of size `area`.
pub fn tile_grid_area(area: Rect, app: &App) -> Rect {
    ScreenAreas::split(area, app).tiles
}

/// How many tiles the grid shows at once for a terminal of size `area`.
/// Office pages are fitted to this so no alert on a page is cut off.
pub fn grid_capacity(area: Rect, app: &App) -> usize {
    let (rows, columns) = grid_shape(tile_grid_area(area, app));
    rows * columns
}

/// Tiles per row: one on narrow terminals, up to three on wide ones.
pub const fn grid_columns(width: u16) -> usize {
    if width >= 150 {
        3
    } else if width >= 100 {
        2
    } else {
        1
    }
}

/// Rows and columns of tiles that fit in the grid area. Always at least one
/// of each.
fn grid_shape(grid: Rect) -> (usize, usize) {
    let rows = usize::from((grid.height / TILE_HEIGHT).max(1));
    (rows, grid_columns(grid.width))
}

struct ScreenAreas {
    header: Rect,
    stats: Rect,
    tiles: Rect,
    pager: Option<Rect>,
    footer: Rect,
}

impl ScreenAreas {
    fn split(area: Rect, app: &App) -> Self {
        // The office view always reserves the pager row so the grid does not
        // change size when the page count does.
        let paged = app.filter().is_paged();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                        // Header
                Constraint::Length(3),                        // Stats
                Constraint::Min(0),                           // Tiles
                Constraint::Length(if paged { 1 } else { 0 }), // Pager
                Constraint::Length(3),                        // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            stats: chunks[1],
            tiles: chunks[2],
            pager: app.shows_page_controls().then_some(chunks[3]),
            footer: chunks[4],
        }
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.filter().office_name() {
        Some(office) => format!(" ⛈ {office} Alerts "),
        None => " ⛈ U.S. Weather Alert Dashboard ".to_string(),
    };

    let clock = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            app.clock.display_time(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(clock, area);
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let refreshed = Paragraph::new(Line::from(vec![
        Span::styled(" Last Refreshed: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.last_updated().unwrap_or("Loading...").to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(refreshed, chunks[0]);

    let count = Paragraph::new(Span::styled(
        format!("Active Alerts: {}", app.filtered_len()),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    frame.render_widget(count, chunks[1]);
}

fn draw_tiles(frame: &mut Frame, app: &App, area: Rect) {
    if app.filtered_len() == 0 {
        let empty = Paragraph::new("No active alerts")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let centered = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(empty, centered);
        return;
    }

    let (rows, columns) = grid_shape(area);
    let zone = app.zone();
    let tiles: Vec<AlertTile> = app
        .on_screen()
        .take(rows * columns)
        .map(|alert| AlertTile::from_record(alert, zone))
        .collect();

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TILE_HEIGHT); rows])
        .split(area);

    for (row_tiles, row_area) in tiles.chunks(columns).zip(row_areas.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);
        for (tile, cell) in row_tiles.iter().zip(cells.iter()) {
            draw_tile(frame, tile, *cell);
        }
    }
}

fn draw_tile(frame: &mut Frame, tile: &AlertTile, area: Rect) {
    let accent = tile.style.accent();
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled(tile.headline.clone(), Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled("Issued by: ", label),
            Span::raw(tile.sender.clone()),
        ]),
        Line::from(vec![Span::styled("Areas: ", label), Span::raw(tile.areas.clone())]),
        Line::from(vec![
            Span::styled("Effective: ", label),
            Span::raw(tile.effective.clone()),
        ]),
        Line::from(vec![
            Span::styled("Expires: ", label),
            Span::raw(tile.expires.clone()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(tile.style.border_style())
            .title(format!(" {} ", tile.title))
            .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, area);
}

fn draw_pager(frame: &mut Frame, app: &App, area: Rect) {
    let len = app.filtered_len();
    let window = app.pager().window();
    let status = if app.pager().is_auto_scrolling() {
        Span::styled("● auto", Style::default().fg(Color::Green))
    } else {
        Span::styled("‖ paused", Style::default().fg(Color::Yellow))
    };

    let line = Line::from(vec![
        Span::styled("◀ [←] Prev", Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled(
            format!("Page {} of {}", window.page_number(len), window.page_count(len)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Next [→] ▶", Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        status,
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = if app.filter().is_paged() {
        "  [←→] Page  [click] Pause  [r] Refresh  [q] Quit  "
    } else {
        "  [↑↓] Scroll  [r] Refresh  [q] Quit  "
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {} alerts in feed", app.alerts().len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  │"),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
