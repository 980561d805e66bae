use crate::app_state::{App, FocusArea, InputMode, ViewMode};
use crate::catalog::filter::ALL_FAMILIES;
use crate::catalog::model::{format_usd, split_notes};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title bar
            Constraint::Min(0),    // content
            Constraint::Min(8),    // command + log panel
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    let middle_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(chunks[1]);

    render_left_menu(f, middle_chunks[0], app);
    render_main_view(f, middle_chunks[1], app);
    render_bottom_bar(f, chunks[2], app);
}

fn status_marker(status: &str) -> (&'static str, Color) {
    match status {
        "Active" => ("●", Color::Green),
        "Test" => ("◐", Color::Yellow),
        "Archived" => ("○", Color::Gray),
        _ => ("?", Color::Gray),
    }
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));

    let mut spans = vec![
        Span::styled(
            " Fragrance Catalog ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Terminal TUI"),
    ];
    if app.loading {
        spans.push(Span::styled(
            "  [loading…]",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(title)
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_left_menu(f: &mut Frame, area: Rect, app: &App) {
    let menu_items: Vec<ListItem> = vec!["Catalog", "Detail", "Families"]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let is_selected = i == app.menu_selected_index;
            let is_active = matches!(
                (i, &app.view_mode),
                (0, ViewMode::Catalog) | (1, ViewMode::Detail) | (2, ViewMode::Families)
            );

            let style = if is_selected {
                if app.focus_area == FocusArea::Menu {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD)
                }
            } else if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };

            let prefix = if is_active { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, text)).style(style)
        })
        .collect();

    let title = if app.focus_area == FocusArea::Menu {
        "Menu (Enter/c)"
    } else {
        "Menu (←)"
    };

    let menu =
        List::new(menu_items).block(Block::default().borders(Borders::ALL).title(title).style(
            if app.focus_area == FocusArea::Menu {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            },
        ));

    f.render_widget(menu, area);
}

fn render_main_view(f: &mut Frame, area: Rect, app: &mut App) {
    match app.view_mode {
        ViewMode::Catalog => render_catalog(f, area, app),
        ViewMode::Detail => render_detail(f, area, app),
        ViewMode::Families => render_families(f, area, app),
    }
}

fn render_catalog(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .scent_list
        .iter()
        .enumerate()
        .map(|(i, scent)| {
            let (symbol, color) = status_marker(&scent.status);

            let is_selected = i == app.selected_index;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let top_preview = split_notes(&scent.top_notes).join(", ");
            let content = Line::from(vec![
                Span::styled(format!("{} ", symbol), Style::default().fg(color)),
                Span::styled(format!("{:<12}", scent.family), Style::default().fg(Color::Magenta)),
                Span::styled(format!("{:<22}", scent.name), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(top_preview, Style::default().fg(Color::Gray)),
            ]);

            ListItem::new(content).style(style)
        })
        .collect();

    let family = app.criteria.family.as_deref().unwrap_or(ALL_FAMILIES);
    let status = app.criteria.status.as_deref().unwrap_or("Any");
    let query_info = if app.criteria.query.is_empty() {
        String::new()
    } else {
        format!(" Search: \"{}\"", app.criteria.query)
    };
    let title = if app.focus_area == FocusArea::MainView {
        format!(
            "Catalog [Family: {} | Status: {} | In: {}]{} (f status, s scope, / command, r refresh)",
            family,
            status,
            app.criteria.scope.label(),
            query_info
        )
    } else {
        format!(
            "Catalog [Family: {} | Status: {} | In: {}]{}",
            family,
            status,
            app.criteria.scope.label(),
            query_info
        )
    };

    let block = Block::default().borders(Borders::ALL).title(title).style(
        if app.focus_area == FocusArea::MainView {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        },
    );

    // An error is its own state; an empty filtered list is not.
    if let Some(err) = &app.error {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  ✗ {}", err),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("  Press r to retry."),
        ])
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    if app.scent_list.is_empty() && !app.loading {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from("  No scents found for the current filters."),
        ])
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    app.scent_list_state.select(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut app.scent_list_state);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let content = if let Some(scent) = app.selected_scent() {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Name: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(&scent.name, Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled("[ID ", Style::default().fg(Color::Gray)),
                Span::styled(&scent.id, Style::default().fg(Color::Gray)),
                Span::styled("]", Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::styled("Family: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(&scent.family, Style::default().fg(Color::Magenta)),
                Span::raw("  "),
                Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&scent.status),
            ]),
        ];

        if !scent.short_description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(scent.short_description.clone()));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            "--- Notes ---",
            Style::default().fg(Color::Yellow),
        )]));
        for (label, value) in [
            ("Top:   ", &scent.top_notes),
            ("Heart: ", &scent.heart_notes),
            ("Base:  ", &scent.base_notes),
        ] {
            lines.push(Line::from(vec![
                Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(split_notes(value).join(", ")),
            ]));
        }

        if !scent.key_ingredients.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(
                    "Key ingredients: ",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(split_notes(&scent.key_ingredients).join(", ")),
            ]));
        }
        if !scent.origin_country.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Origin: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&scent.origin_country),
            ]));
        }
        if !scent.notes.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Notes: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&scent.notes),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            "--- Pricing ---",
            Style::default().fg(Color::Yellow),
        )]));
        lines.push(Line::from(format!(
            "500ml: {}  ·  150ml: {}  ·  60ml: {}",
            format_usd(&scent.price_500ml),
            format_usd(&scent.price_150ml),
            format_usd(&scent.price_60ml),
        )));

        lines
    } else {
        vec![Line::from("Nothing selected - pick a scent in the catalog.")]
    };

    let title = if app.focus_area == FocusArea::MainView {
        "Detail (↑↓ scroll, x back, ← menu)"
    } else {
        "Detail"
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title).style(
            if app.focus_area == FocusArea::MainView {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            },
        ))
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_families(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(vec![Span::styled(
            "--- Families in the current dataset ---",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    for family in app.families.iter().filter(|f| f.as_str() != ALL_FAMILIES) {
        let count = app
            .scents_all
            .iter()
            .filter(|s| &s.family == family)
            .count();
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<20}", family),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(format!("{:>4}", count), Style::default().fg(Color::Green)),
        ]));
    }
    if app.scents_all.is_empty() {
        lines.push(Line::from("No data yet - press r to fetch the catalog"));
    }

    let title = if app.focus_area == FocusArea::MainView {
        "Families (← menu)"
    } else {
        "Families"
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default().borders(Borders::ALL).title(title).style(
            if app.focus_area == FocusArea::MainView {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            },
        ),
    );
    f.render_widget(paragraph, area);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "Command: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));

        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }

        vec![
            Line::from(spans),
            Line::from("Enter run  Esc cancel  Tab complete  ←→ cursor  ↑↓ history"),
        ]
    } else {
        vec![
            Line::from(vec![
                Span::styled("Command: ", Style::default().fg(Color::Yellow)),
                Span::raw("(press / for command mode)"),
            ]),
            Line::from("/filter <text>  /family <name>  /status <name>  /scope top|heart|base  r refresh  q quit"),
        ]
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "Command input mode"
            } else {
                "Command input"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    // Log panel - most recent messages first, capped at 20.
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({} entries)", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}
