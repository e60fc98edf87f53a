use crate::styles;
use anyhow::Result;
use foodtrucks_core::{FoodTruckRecord, NearbyTruck, TacoTruckSummary, TruckDetails, ViewState};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use textwrap::wrap;

pub const INPUT_TITLE: &str = " ZIP code (Enter: Find Nearby Food Trucks) ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    ZipInput,
    Selector,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::ZipInput => Focus::Selector,
            Focus::Selector => Focus::ZipInput,
        }
    }
}

/// Everything one frame needs, copied out of the actor so drawing never
/// borrows it.
pub struct ViewSnap {
    pub input: String,
    pub input_cursor: usize,
    pub focus: Focus,
    pub loading: bool,
    pub spinner: &'static str,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub tacos: Vec<String>,
    pub highlighted: Option<usize>,
    pub details: Option<TruckDetails>,
    pub nearby: Vec<(String, String)>,
    pub nearby_food: Vec<String>,
    pub nearby_scroll: usize,
    pub available: Vec<(String, String)>,
}

impl ViewSnap {
    pub fn capture(state: &ViewState, ui: &UiSnap<'_>) -> Self {
        Self {
            input: ui.input.to_string(),
            input_cursor: ui.input_cursor,
            focus: ui.focus,
            loading: state.is_loading(),
            spinner: ui.spinner,
            error: state.error().map(str::to_string),
            notice: ui.notice.map(str::to_string),
            tacos: state.taco_trucks().iter().map(taco_label).collect(),
            highlighted: ui.highlighted,
            details: state.details(),
            nearby: state.nearby().iter().map(nearby_label).collect(),
            nearby_food: state
                .nearby()
                .iter()
                .map(|n| n.record.food_items().to_string())
                .collect(),
            nearby_scroll: ui.nearby_scroll,
            available: state
                .available()
                .iter()
                .map(|r| (available_label(r), r.food_items().to_string()))
                .collect(),
        }
    }
}

/// Actor-side UI state that is not part of `ViewState`.
pub struct UiSnap<'a> {
    pub input: &'a str,
    pub input_cursor: usize,
    pub focus: Focus,
    pub spinner: &'static str,
    pub notice: Option<&'a str>,
    pub highlighted: Option<usize>,
    pub nearby_scroll: usize,
}

pub fn taco_label(t: &TacoTruckSummary) -> String {
    format!("{} ({})", t.name, t.permit)
}

pub fn nearby_label(n: &NearbyTruck) -> (String, String) {
    let place = match n.record.location() {
        "" => n.record.address.clone().unwrap_or_default(),
        loc => loc.to_string(),
    };
    let name = if place.is_empty() {
        n.record.name().to_string()
    } else {
        format!("{} - {place}", n.record.name())
    };
    (name, format!("{:.2} km", n.distance_km))
}

pub fn available_label(r: &FoodTruckRecord) -> String {
    match (r.name(), r.location()) {
        ("", "") => format!("(unnamed) {}", r.permit_id()),
        (name, "") => name.to_string(),
        ("", loc) => format!("(unnamed) - {loc}"),
        (name, loc) => format!("{name} - {loc}"),
    }
}

pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| render(frame, snap))?;
    Ok(())
}

fn render(frame: &mut Frame, snap: &ViewSnap) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" SF Food Trucks ", styles::header()),
        Span::styled("Tab: switch focus  /help: commands", styles::dim()),
    ]));
    frame.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(7)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_selector(frame, left[0], snap);
    if let Some(details) = &snap.details {
        render_details(frame, left[1], details);
    }
    if !snap.nearby.is_empty() {
        render_nearby(frame, right[0], snap);
    }
    if !snap.available.is_empty() {
        let items: Vec<ListItem> = snap
            .available
            .iter()
            .map(|(label, food)| item_with_food(Span::styled(label.clone(), styles::value()), food))
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Available Food Trucks "),
        );
        frame.render_widget(list, right[1]);
    }

    render_status(frame, rows[2], snap);
    render_input(frame, rows[3], snap);
}

fn render_selector(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let focused = snap.focus == Focus::Selector;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(focused))
        .title(" Taco Trucks (Enter: Show Details) ");

    if snap.tacos.is_empty() {
        let hint = if snap.loading { "" } else { "No taco trucks loaded." };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, styles::dim())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = snap
        .tacos
        .iter()
        .map(|t| ListItem::new(t.clone()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            styles::highlight()
        } else {
            Style::default()
        })
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(snap.highlighted);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_details(frame: &mut Frame, area: Rect, details: &TruckDetails) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    for (label, text) in [
        ("Name", details.name.as_str()),
        ("Location", details.location.as_str()),
        ("Food Type", details.food_type.as_str()),
    ] {
        let full = format!("{label}: {text}");
        for (i, seg) in wrap(&full, width.max(1)).into_iter().enumerate() {
            if i == 0 {
                let (head, tail) = seg.split_at(seg.len().min(label.len() + 1));
                lines.push(Line::from(vec![
                    Span::styled(head.to_string(), styles::label()),
                    Span::styled(tail.to_string(), styles::value()),
                ]));
            } else {
                lines.push(Line::from(Span::styled(seg.into_owned(), styles::value())));
            }
        }
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Selected Taco Truck "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

fn render_nearby(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let visible_h = area.height.saturating_sub(2) as usize;
    let start = snap.nearby_scroll.min(snap.nearby.len().saturating_sub(visible_h));
    let items: Vec<ListItem> = snap.nearby[start..]
        .iter()
        .zip(&snap.nearby_food[start..])
        .map(|((name, dist), food)| {
            let head = Line::from(vec![
                Span::styled(format!("{dist:>9} "), styles::distance()),
                Span::styled(name.clone(), styles::value()),
            ]);
            item_with_food(head, food)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Nearby Food Trucks ({}) ", snap.nearby.len())),
    );
    frame.render_widget(list, area);
}

/// A list entry with the food items, when known, on a dim second line.
fn item_with_food<'a>(head: impl Into<Line<'a>>, food: &str) -> ListItem<'a> {
    let mut lines = vec![head.into()];
    if !food.is_empty() {
        lines.push(Line::from(Span::styled(format!("  {food}"), styles::dim())));
    }
    ListItem::new(lines)
}

fn render_status(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(snap.spinner, styles::busy()),
        Span::raw(" "),
        if snap.loading {
            Span::styled("Loading...", styles::busy())
        } else {
            Span::styled("Idle", styles::idle())
        },
    ];
    if let Some(err) = &snap.error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("Error: {err}"), styles::error()));
    }
    if let Some(notice) = &snap.notice {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(notice.clone(), styles::dim()));
    }
    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}

fn render_input(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let focused = snap.focus == Focus::ZipInput;
    let input_box = Paragraph::new(snap.input.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border(focused))
            .title(INPUT_TITLE),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(input_box, area);

    if focused {
        frame.set_cursor_position(Position {
            x: area.x + 1 + visual_caret_col(&snap.input, snap.input_cursor),
            y: area.y + 1,
        });
    }
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor]) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodtrucks_core::NearbyFailure;
    use ratatui::backend::TestBackend;

    fn record(permit: &str, name: &str, location: &str, items: &str) -> FoodTruckRecord {
        FoodTruckRecord {
            applicant: Some(name.into()),
            permit: Some(permit.into()),
            locationdescription: Some(location.into()),
            fooditems: Some(items.into()),
            ..Default::default()
        }
    }

    fn ui(focus: Focus) -> UiSnap<'static> {
        UiSnap {
            input: "94103",
            input_cursor: 5,
            focus,
            spinner: " ",
            notice: None,
            highlighted: Some(0),
            nearby_scroll: 0,
        }
    }

    fn screen(snap: &ViewSnap) -> String {
        let mut term = Terminal::new(TestBackend::new(120, 30)).unwrap();
        draw(&mut term, snap).unwrap();
        term.backend().to_string()
    }

    #[test]
    fn loaded_state_shows_lists_and_details() {
        let mut state = ViewState::new();
        state.begin_load();
        state.finish_load(
            Ok(vec![
                record("T1", "Tacos Uno", "Mission St", "Tacos: horchata"),
                record("C1", "Coffee Cart", "Market St", "Coffee"),
            ]),
            10,
        );
        assert!(state.select_taco_truck("T1"));

        let out = screen(&ViewSnap::capture(&state, &ui(Focus::Selector)));
        assert!(out.contains("Tacos Uno (T1)"));
        assert!(out.contains("Name: Tacos Uno"));
        assert!(out.contains("Food Type: Tacos: horchata"));
        assert!(out.contains("Coffee Cart - Market St"));
        assert!(out.contains("Idle"));
        assert!(out.contains("ZIP code (Enter: Find Nearby Food Trucks)"));
        assert!(!out.contains("Nearby Food Trucks ("));
    }

    #[test]
    fn loading_and_error_are_shown_on_the_status_line() {
        let mut state = ViewState::new();
        state.begin_nearby();
        let out = screen(&ViewSnap::capture(&state, &ui(Focus::ZipInput)));
        assert!(out.contains("Loading..."));

        state.finish_nearby(Err(NearbyFailure::Geocode));
        let out = screen(&ViewSnap::capture(&state, &ui(Focus::ZipInput)));
        assert!(out.contains("Error: Failed to get location coordinates."));
        assert!(out.contains("Idle"));
    }

    #[test]
    fn labels_fall_back_when_fields_are_missing() {
        let bare = FoodTruckRecord {
            permit: Some("P9".into()),
            ..Default::default()
        };
        assert_eq!(available_label(&bare), "(unnamed) P9");

        let near = NearbyTruck {
            record: FoodTruckRecord {
                applicant: Some("Roaming".into()),
                address: Some("1 Main St".into()),
                ..Default::default()
            },
            distance_km: 0.456,
        };
        assert_eq!(
            nearby_label(&near),
            ("Roaming - 1 Main St".to_string(), "0.46 km".to_string())
        );
    }

    #[test]
    fn caret_counts_display_width() {
        assert_eq!(visual_caret_col("abc", 2), 2);
        assert_eq!(visual_caret_col("日本", "日本".len()), 4);
    }
}
