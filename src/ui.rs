use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect, Size},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app_core::form::{AddMovieForm, FormField, TextInput};
use crate::app_core::render::{self, Action, MovieBox, Node};
use crate::app_core::state::{AppState, BoxHit, ButtonHit};
use crate::model::{ListKind, TOP_FIVE_CAPACITY};

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    app.clear_hit_regions();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sections
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    render_section(f, app, ListKind::Watchlist, main_chunks[0]);
    render_section(f, app, ListKind::TopFive, main_chunks[1]);
    render_status_bar(f, app, chunks[1]);

    if app.form.is_some() {
        render_add_form(f, app);
    } else if app.show_help {
        render_help_overlay(f, app);
    }

    if app.notice_visible() {
        render_notice(f, app);
    }
    if app.alert_pending() {
        render_alert(f, app);
    }
}

/// A node laid out in the scroll view's content coordinates. Nodes past the
/// last addressable row get a height of zero and are not drawn.
struct Placed {
    node: Node,
    y: u16,
    height: u16,
    /// Wrapped overview (movie boxes) or text (paragraphs).
    lines: Vec<String>,
}

const BUTTON_GAP: u16 = 1;

fn button_label(action: &Action) -> String {
    format!("[ {} ]", action.label())
}

fn line_count(lines: &[String]) -> u16 {
    u16::try_from(lines.len()).unwrap_or(u16::MAX)
}

fn layout_nodes(nodes: &[Node], width: u16) -> (Vec<Placed>, u16) {
    let mut y = 0u16;
    let mut placed = Vec::with_capacity(nodes.len());
    for node in nodes {
        let (height, lines) = match node {
            // The Top 5 heading is mounted with empty text.
            Node::Heading { text, .. } if text.is_empty() => (0, Vec::new()),
            Node::Heading { text, .. } => (1, vec![text.clone()]),
            Node::Paragraph(text) => {
                let lines = wrap_text(text, width);
                (line_count(&lines), lines)
            }
            Node::MovieBox(movie_box) => {
                let lines = wrap_text(&movie_box.overview, width.saturating_sub(2));
                let poster = u16::from(movie_box.poster.is_some());
                (line_count(&lines).saturating_add(poster + 3), lines)
            }
        };
        let height = height.min(u16::MAX - y);
        placed.push(Placed {
            node: node.clone(),
            y,
            height,
            lines,
        });
        y = y.saturating_add(height);
    }
    (placed, y)
}

/// Renders one list pane: the section's nodes inside a scroll view.
fn render_section(f: &mut Frame, app: &mut AppState, list: ListKind, area: Rect) {
    let is_focused = app.focused == list;
    let count = app.box_count(list);
    let title = match list {
        ListKind::Watchlist => format!(" {} ({count}) ", list.label()),
        ListKind::TopFive => format!(" {} ({count}/{TOP_FIVE_CAPACITY}) ", list.label()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.text)
        .title(title)
        .title_style(app.theme.title)
        .title_alignment(Alignment::Left)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ select • ←/→ button • Enter press ").right_aligned()
        } else {
            Line::from("").right_aligned()
        });

    let inner = block.inner(area);
    f.render_widget(block, area);
    app.pane_areas.push((area, list));

    // One column is left for the scrollbar.
    let content_width = inner.width.saturating_sub(1);
    if content_width < 4 || inner.height == 0 {
        return;
    }

    let nodes = app
        .shelf
        .target()
        .children(render::container_for(list))
        .to_vec();
    let (placed, content_height) = layout_nodes(&nodes, content_width);

    let selected = app.section(list).selected;
    let selected_button = app.section(list).button;
    let follow = app.section(list).follow_selection;

    // Keep the offset inside the content so hit regions match what is drawn.
    let max_offset = content_height.saturating_sub(inner.height);
    let mut offset = app.section(list).scroll.offset();
    if follow
        && let Some(index) = selected
        && let Some(item) = placed
            .iter()
            .filter(|p| matches!(p.node, Node::MovieBox(_)))
            .nth(index)
    {
        if item.y < offset.y {
            offset.y = item.y;
        } else if item.y.saturating_add(item.height) > offset.y.saturating_add(inner.height) {
            offset.y = item.y.saturating_add(item.height).saturating_sub(inner.height);
        }
    }
    offset.y = offset.y.min(max_offset);
    offset.x = 0;
    {
        let section = app.section_mut(list);
        section.scroll.set_offset(offset);
        section.follow_selection = false;
    }

    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height.max(1)))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
    let scroll_area = scroll_view.area();
    scroll_view.buf_mut().set_style(scroll_area, app.theme.text);

    let mut box_index = 0usize;
    for item in &placed {
        if item.height == 0 {
            if matches!(item.node, Node::MovieBox(_)) {
                box_index += 1;
            }
            continue;
        }
        let rect = Rect::new(0, item.y, content_width, item.height);
        match &item.node {
            Node::Heading { .. } => {
                scroll_view.render_widget(
                    Paragraph::new(item.lines.join("\n")).style(app.theme.title),
                    rect,
                );
            }
            Node::Paragraph(_) => {
                scroll_view.render_widget(
                    Paragraph::new(item.lines.join("\n")).style(app.theme.muted),
                    rect,
                );
            }
            Node::MovieBox(movie_box) => {
                let is_selected = is_focused && selected == Some(box_index);
                let active_button = is_selected.then_some(selected_button);
                scroll_view.render_widget(
                    movie_box_widget(app, movie_box, &item.lines, is_selected, active_button),
                    rect,
                );
                record_box_hits(app, list, box_index, movie_box, item, inner, offset);
                box_index += 1;
            }
        }
    }

    f.render_stateful_widget(scroll_view, inner, &mut app.section_mut(list).scroll);
}

fn movie_box_widget<'a>(
    app: &AppState,
    movie_box: &'a MovieBox,
    overview: &'a [String],
    is_selected: bool,
    active_button: Option<usize>,
) -> Paragraph<'a> {
    let mut lines: Vec<Line> = overview
        .iter()
        .map(|line| Line::styled(line.as_str(), app.theme.text))
        .collect();
    if let Some(poster) = &movie_box.poster {
        lines.push(Line::from(vec![
            Span::styled("Poster: ", app.theme.muted),
            Span::styled(poster.src.as_str(), app.theme.muted),
        ]));
    }

    let mut buttons = Vec::new();
    for (idx, action) in movie_box.buttons.iter().enumerate() {
        if idx > 0 {
            buttons.push(Span::raw(" ".repeat(BUTTON_GAP as usize)));
        }
        let style = if active_button == Some(idx) {
            app.theme.button_selected
        } else {
            app.theme.button
        };
        buttons.push(Span::styled(button_label(action), style));
    }
    lines.push(Line::from(buttons));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if is_selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(if is_selected {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(Span::styled(movie_box.title.as_str(), app.theme.movie_title));

    Paragraph::new(Text::from(lines))
        .block(block)
        .style(app.theme.text)
}

/// Translates a box and its buttons from content to screen coordinates,
/// keeping only the parts visible in `viewport`.
fn record_box_hits(
    app: &mut AppState,
    list: ListKind,
    box_index: usize,
    movie_box: &MovieBox,
    item: &Placed,
    viewport: Rect,
    offset: Position,
) {
    let to_screen = |content_y: u16| -> Option<u16> {
        let visible = content_y.checked_sub(offset.y)?;
        (visible < viewport.height).then_some(viewport.y.saturating_add(visible))
    };

    let item_bottom = item.y.saturating_add(item.height);
    let top = item.y.max(offset.y);
    let bottom = item_bottom.min(offset.y.saturating_add(viewport.height));
    if top < bottom
        && let Some(screen_top) = to_screen(top)
    {
        app.box_hits.push(BoxHit {
            area: Rect::new(
                viewport.x,
                screen_top,
                viewport.width.saturating_sub(1),
                bottom - top,
            ),
            list,
            box_index,
        });
    }

    // Buttons sit on the last line inside the border.
    let Some(row) = to_screen(item_bottom.saturating_sub(2)) else {
        return;
    };
    let right_edge = viewport.x + viewport.width.saturating_sub(2);
    let mut x = viewport.x + 1;
    for (button_index, action) in movie_box.buttons.iter().enumerate() {
        let width = button_label(action).width() as u16;
        if x >= right_edge {
            break;
        }
        app.button_hits.push(ButtonHit {
            area: Rect::new(x, row, width.min(right_edge - x), 1),
            list,
            box_index,
            button_index,
        });
        x = x.saturating_add(width.saturating_add(BUTTON_GAP));
    }
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("a ", key_style),
        Span::raw("add  "),
        Span::styled("Tab ", key_style),
        Span::raw("pane  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let status = match &app.status_error {
        Some(err) => Line::from(Span::styled(err.as_str(), app.theme.error)),
        None => Line::from(format!(
            "Watchlist: {} | Top 5: {}/{}",
            app.box_count(ListKind::Watchlist),
            app.box_count(ListKind::TopFive),
            TOP_FIVE_CAPACITY
        )),
    };
    f.render_widget(
        Paragraph::new(status)
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Line::from(format!("reelshelf {}", app.app_version)))
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// The short-lived notice overlay. Clicks inside `notice_content_area` keep it.
fn render_notice(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let message = app.shelf.notifier().message().to_string();
    let width = (message.width() as u16 + 6)
        .max(20)
        .min(area.width.saturating_sub(4));
    let lines = wrap_text(&message, width.saturating_sub(4));
    let popup = centered_rect(area, width, lines.len() as u16 + 2);
    if popup.width == 0 || popup.height == 0 {
        return;
    }

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(app.theme.border_selected)
        .style(app.theme.notice);
    f.render_widget(
        Paragraph::new(lines.join("\n"))
            .block(block)
            .style(app.theme.notice)
            .alignment(Alignment::Center),
        popup,
    );
    app.notice_content_area = Some(popup);
}

/// Blocking alert with a single OK button.
fn render_alert(f: &mut Frame, app: &mut AppState) {
    let Some(message) = app.shelf.alert().map(str::to_string) else {
        return;
    };
    let area = f.area();
    let width = area.width.min(56).saturating_sub(4);
    let lines = wrap_text(&message, width.saturating_sub(4));
    let popup = centered_rect(area, width, lines.len() as u16 + 5);
    if popup.width < 8 || popup.height < 5 {
        return;
    }

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(app.theme.alert_border)
        .style(app.theme.text)
        .title(" Alert ")
        .title_style(app.theme.alert_border);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // OK button
        ])
        .horizontal_margin(1)
        .split(inner);

    f.render_widget(
        Paragraph::new(lines.join("\n")).style(app.theme.text),
        chunks[0],
    );

    let ok = "[ OK ]";
    let ok_width = ok.width() as u16;
    let ok_rect = Rect::new(
        chunks[2].x + chunks[2].width.saturating_sub(ok_width) / 2,
        chunks[2].y,
        ok_width.min(chunks[2].width),
        1,
    );
    f.render_widget(
        Paragraph::new(Span::styled(ok, app.theme.button_selected)),
        ok_rect,
    );
    app.alert_ok_area = Some(ok_rect);
}

fn render_add_form(f: &mut Frame, app: &mut AppState) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let area = f.area();
    let popup = centered_rect(area, area.width.min(64).saturating_sub(4), 14);
    if popup.width < 10 || popup.height < 14 {
        return;
    }

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Add to Watchlist ")
        .title_style(app.theme.title)
        .title_bottom(Line::from(" Tab next • Enter add • Esc cancel ").right_aligned());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1), // Validation message
            Constraint::Min(0),
        ])
        .horizontal_margin(1)
        .split(inner);

    let mut cursor = None;
    for (field, chunk) in FormField::ALL.into_iter().zip(chunks.iter()) {
        if let Some(position) = render_form_input(f, app, form, field, *chunk) {
            cursor = Some(position);
        }
    }

    if let Some(err) = &form.error {
        f.render_widget(
            Paragraph::new(Span::styled(err.as_str(), app.theme.error)),
            chunks[3],
        );
    }

    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}

/// Draws one labelled input. Returns the cursor position when it is focused.
fn render_form_input(
    f: &mut Frame,
    app: &AppState,
    form: &AddMovieForm,
    field: FormField,
    area: Rect,
) -> Option<Position> {
    let is_focused = form.focused == field;
    let input: &TextInput = form.input(field);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(format!(" {} ", field.label()))
        .title_style(app.theme.title);
    let inner = block.inner(area);
    let horizontal_scroll = input_horizontal_scroll(&input.text, input.cursor, inner.width);

    let content = if input.text.is_empty() && field == FormField::PosterPath && !is_focused {
        Text::from(Line::from(Span::styled(
            "/poster.jpg",
            app.theme.text.add_modifier(Modifier::DIM | Modifier::ITALIC),
        )))
    } else {
        Text::from(input.text.as_str())
    };
    f.render_widget(
        Paragraph::new(content)
            .block(block)
            .style(app.theme.text)
            .scroll((0, horizontal_scroll)),
        area,
    );

    if !is_focused || inner.width == 0 || inner.height == 0 {
        return None;
    }
    let cursor_offset = input_cursor_offset(&input.text, input.cursor);
    let visible = cursor_offset.saturating_sub(horizontal_scroll);
    Some(Position::new(
        inner.x + visible.min(inner.width.saturating_sub(1)),
        inner.y,
    ))
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(60).saturating_sub(4);
    let popup_height = 20.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = centered_rect(area, popup_width, popup_height);

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <16}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Lists",
        vec![
            ("Tab | 1 | 2", "switch pane"),
            ("Up | Down", "select movie"),
            ("Left | Right", "select button"),
            ("Enter | Space", "press button"),
            ("Mouse Click", "press button"),
            ("a", "add to watchlist"),
            ("q", "quit"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Add form",
        vec![
            ("Tab | Shift+Tab", "next | previous field"),
            ("Ctrl+U", "clear field"),
            ("Ctrl+W", "delete word"),
            ("Esc", "cancel"),
        ],
    ));

    f.render_widget(
        Paragraph::new(lines),
        inner_area.inner(ratatui::layout::Margin::new(1, 1)),
    );
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    if width == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }
        lines.push(current);
    }
    lines
}

/// Calculates the terminal cell width offset for a given character index.
/// Uses `unicode-width` to correctly handle multibyte and multi-cell characters.
pub fn input_cursor_offset(text: &str, cursor: usize) -> u16 {
    text.chars()
        .take(cursor)
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum::<u16>()
}

/// Horizontal viewport offset that keeps the cursor visible in an input.
pub fn input_horizontal_scroll(text: &str, cursor: usize, visible_width: u16) -> u16 {
    if visible_width == 0 {
        return 0;
    }
    input_cursor_offset(text, cursor).saturating_sub(visible_width.saturating_sub(1))
}
