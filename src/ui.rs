use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use portfolio_matrix::{Category, LabelAnchor, LayoutConfig, PortfolioStore};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Rectangle},
        Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Matrix,
    Ledger,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Matrix => Page::Ledger,
            Page::Ledger => Page::Matrix,
        }
    }

    pub fn previous(&self) -> Self {
        // Two pages, so forward and back coincide
        self.next()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Matrix => "Matrix",
            Page::Ledger => "Ledger",
        }
    }
}

/// Presentation state. Selection, highlight, and label visibility live
/// here, never in the store.
pub struct App {
    pub store: PortfolioStore,
    pub layout: LayoutConfig,
    pub state: TableState,
    pub selected_id: Option<String>,
    pub show_labels: bool,
    pub current_page: Page,
}

impl App {
    pub fn new(store: PortfolioStore) -> Self {
        let mut state = TableState::default();
        if !store.is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            layout: LayoutConfig::default(),
            state,
            selected_id: None,
            show_labels: true,
            current_page: Page::Matrix,
        }
    }

    /// Toggle selection the way the plane does: picking the selected
    /// point again deselects it.
    pub fn select_point(&mut self, id: &str) {
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        } else {
            self.selected_id = Some(id.to_string());
        }
    }

    /// Background interaction: clear whatever is selected.
    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    pub fn toggle_labels(&mut self) {
        self.show_labels = !self.show_labels;
    }

    pub fn select_highlighted(&mut self) {
        if let Some(i) = self.state.selected() {
            if let Some(calc) = self.store.calculated().get(i) {
                let id = calc.account.id.clone();
                self.select_point(&id);
            }
        }
    }

    pub fn next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }
}

fn category_color(category: Category) -> Color {
    match category {
        Category::GrowScale => Color::Green,
        Category::Incubate => Color::Blue,
        Category::Protect => Color::Red,
        Category::MaintainExit => Color::DarkGray,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Esc => app.clear_selection(),
                KeyCode::Enter => app.select_highlighted(),
                KeyCode::Char('l') => app.toggle_labels(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.store.is_empty() {
                        app.state.select(Some(app.store.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Matrix => render_matrix(f, chunks[1], app),
        Page::Ledger => render_ledger(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = vec![Page::Matrix, Page::Ledger];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Accounts: {}", app.store.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total ARR: €{:.0}", app.store.total_arr()),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Labels: {}", if app.show_labels { "On" } else { "Off" }),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_matrix(f: &mut Frame, area: Rect, app: &App) {
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70), // Plane
            Constraint::Percentage(30), // Detail / overview panel
        ])
        .split(area);

    render_plane(f, content_chunks[0], app);

    if app.selected_id.is_some() {
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_overview_panel(f, content_chunks[1], app);
    }
}

/// Paint the portfolio on the plane in pixel coordinates. The canvas
/// y-axis grows upward, so pixel y is mirrored against the plane size.
fn render_plane(f: &mut Frame, area: Rect, app: &App) {
    let cfg = app.layout;
    let size = cfg.size;
    let min = cfg.min_bound();
    let max = cfg.max_bound();
    let mid = (min + max) / 2.0;

    // Owned snapshots so the paint closure can print 'static text
    let accounts: Vec<(String, String, f64, f64, Category)> = app
        .store
        .calculated()
        .iter()
        .map(|c| {
            (
                c.account.id.clone(),
                c.account.name.clone(),
                c.volume_score,
                c.potential_score,
                c.category,
            )
        })
        .collect();
    let selected_id = app.selected_id.clone();
    let show_labels = app.show_labels;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Volume → | Potential ↑ "),
        )
        .x_bounds([0.0, size])
        .y_bounds([0.0, size])
        .paint(move |ctx| {
            // Drawable region frame
            ctx.draw(&Rectangle {
                x: min,
                y: min,
                width: max - min,
                height: max - min,
                color: Color::DarkGray,
            });

            // Quadrant separation lines
            ctx.draw(&CanvasLine {
                x1: mid,
                y1: min,
                x2: mid,
                y2: max,
                color: Color::DarkGray,
            });
            ctx.draw(&CanvasLine {
                x1: min,
                y1: mid,
                x2: max,
                y2: mid,
                color: Color::DarkGray,
            });

            // Quadrant captions at the quarter points
            let quarter = (max - min) / 4.0;
            let dim = Style::default().fg(Color::DarkGray);
            ctx.print(
                mid + quarter / 2.0,
                max - quarter,
                Line::from(Span::styled("GROW & SCALE", dim)),
            );
            ctx.print(
                min + quarter / 2.0,
                max - quarter,
                Line::from(Span::styled("INCUBATE", dim)),
            );
            ctx.print(
                mid + quarter / 2.0,
                min + quarter,
                Line::from(Span::styled("PROTECT", dim)),
            );
            ctx.print(
                min + quarter / 2.0,
                min + quarter,
                Line::from(Span::styled("MAINTAIN / EXIT", dim)),
            );

            for (id, name, volume, potential, category) in &accounts {
                let point = cfg.point(*volume, *potential);
                let is_selected = selected_id.as_deref() == Some(id.as_str());

                if show_labels {
                    let label = cfg.label_placement(point);
                    // Approximate the box edge the anchor hangs from
                    let text_x = match label.anchor {
                        LabelAnchor::Center => label.left - cfg.label_half_width / 2.0,
                        LabelAnchor::Start => label.left,
                        LabelAnchor::End => label.left - cfg.label_half_width,
                    };
                    ctx.print(
                        text_x,
                        size - label.top,
                        Line::from(Span::styled(
                            name.clone(),
                            Style::default().fg(Color::Gray),
                        )),
                    );
                }

                let marker = if is_selected { "◉" } else { "●" };
                let mut style = Style::default().fg(category_color(*category));
                if is_selected {
                    style = style.add_modifier(Modifier::BOLD);
                }
                ctx.print(point.x, size - point.y, Line::from(Span::styled(marker, style)));
            }
        });

    f.render_widget(canvas, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Account Detail ")
        .border_style(Style::default().fg(Color::Yellow));

    let Some(calc) = app
        .selected_id
        .as_deref()
        .and_then(|id| app.store.find_calculated(id))
    else {
        f.render_widget(
            Paragraph::new("Selection no longer exists").block(block),
            area,
        );
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            calc.account.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            calc.category.as_str(),
            Style::default()
                .fg(category_color(calc.category))
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("ARR          ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("€{:.0}", calc.account.arr)),
        ]),
        Line::from(vec![
            Span::styled("Engagement   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.0} hrs", calc.engagement)),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Volume       ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1}/100", calc.volume_score)),
        ]),
        Line::from(vec![
            Span::styled("Potential    ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1}/100", calc.potential_score)),
        ]),
        Line::from(vec![
            Span::styled("  engagement ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1}/30", calc.engagement_score)),
        ]),
        Line::from(vec![
            Span::styled("  expansion  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{:.1}/40", calc.expansion_score)),
        ]),
        Line::from(vec![
            Span::styled("  stakeholder", Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {:.1}/30", calc.stakeholder_score)),
        ]),
    ];

    if !calc.account.notes.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Notes",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::raw(calc.account.notes.clone())));
    }

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn render_overview_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Portfolio Overview",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Accounts   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}", app.store.len())),
        ]),
        Line::from(vec![
            Span::styled("Total ARR  ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("€{:.0}", app.store.total_arr())),
        ]),
        Line::raw(""),
    ];

    for category in Category::all() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<16}", category.as_str()),
                Style::default().fg(category_color(category)),
            ),
            Span::raw(format!("{}", app.store.category_count(category))),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Enter selects the highlighted account",
        Style::default().fg(Color::DarkGray),
    )));

    let overview = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Overview ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(overview, area);
}

fn render_ledger(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "ARR", "Volume", "Potential", "Category"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
    let header = Row::new(header_cells).height(1);

    let rows = app.store.calculated().iter().map(|calc| {
        let selected = app.selected_id.as_deref() == Some(calc.account.id.as_str());
        let name_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(calc.account.name.clone()).style(name_style),
            Cell::from(format!("€{:.0}", calc.account.arr)),
            Cell::from(format!("{:.1}", calc.volume_score)),
            Cell::from(format!("{:.1}", calc.potential_score)),
            Cell::from(calc.category.as_str())
                .style(Style::default().fg(category_color(calc.category))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(34),
            Constraint::Percentage(16),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Ledger "))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let help = match app.current_page {
        Page::Matrix => "↑/↓ highlight | Enter select/deselect | Esc clear | l labels | Tab page | q quit",
        Page::Ledger => "↑/↓ navigate | Enter select/deselect | Tab page | q quit",
    };

    let status = Paragraph::new(Line::from(Span::styled(
        help,
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}
