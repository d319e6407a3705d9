use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::mode::TuiState;
use crate::shared::DisplayState;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &mut TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // pattern header
            Constraint::Min(10),    // curve pane
            Constraint::Length(4),  // timeline bar + step cursor
            Constraint::Length(4),  // sampler + stats readouts
            Constraint::Length(1),  // status line
        ])
        .split(area);

    draw_header(frame, sections[0], state);
    draw_curve(frame, sections[1], state, ts);
    draw_timeline(frame, sections[2], state);
    draw_readouts(frame, sections[3], state);
    draw_status(frame, sections[4], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let name_style = if state.renaming {
        Style::default().fg(Color::Black).bg(Color::LightMagenta)
    } else {
        Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
    };
    let mut title = vec![
        Span::raw("pattern "),
        Span::styled(state.name.clone(), name_style),
    ];
    if state.renaming {
        title.push(Span::styled("▏", Style::default().fg(Color::LightMagenta)));
    }
    if let Some(id) = &state.pattern_id {
        title.push(Span::styled(
            format!("  [{id}]"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let context = Line::from(Span::styled(
        format!("device {}  ·  {}", state.device_id, state.server_url),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(vec![Line::from(title), context]), area);
}

fn draw_curve(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &mut TuiState) {
    let title = match state.shape {
        Some(shape) => format!(" curve · template {} ", shape.name()),
        None => String::from(" curve · draw with mouse, 1-8 templates "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = block.inner(area);
    ts.curve_area = Some(inner);

    // step markers at each bucket's target x, at the height the emitted
    // intensity corresponds to
    let n = state.steps.len();
    let marks: Vec<(f64, f64)> = state
        .steps
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            s.intensity.map(|v| {
                (
                    i as f64 / n as f64 * state.surface.width,
                    v as f64 / 100.0 * state.surface.height,
                )
            })
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, state.surface.width.max(1.0)])
        .y_bounds([0.0, state.surface.height.max(1.0)])
        .paint(|ctx| {
            for pair in state.points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].x,
                    y1: state.surface.height - pair[0].y,
                    x2: pair[1].x,
                    y2: state.surface.height - pair[1].y,
                    color: Color::LightMagenta,
                });
            }
            if !marks.is_empty() {
                ctx.draw(&Points {
                    coords: &marks,
                    color: Color::Yellow,
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_timeline(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" timeline ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.segments.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            "no pattern — draw a curve or stamp a template",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(placeholder, inner);
        return;
    }

    // proportional bar: each segment gets its share of the inner width
    let width = inner.width as f64;
    let mut spans = Vec::with_capacity(state.segments.len());
    for seg in &state.segments {
        let start = (seg.start_percent / 100.0 * width).round() as usize;
        let end = ((seg.start_percent + seg.width_percent) / 100.0 * width).round() as usize;
        let cells = end.saturating_sub(start);
        if cells == 0 {
            continue;
        }
        let color = if state.selected_step == Some(seg.index) {
            Color::Yellow
        } else if seg.index % 2 == 0 {
            Color::Magenta
        } else {
            Color::LightMagenta
        };
        spans.push(Span::styled(
            "█".repeat(cells),
            Style::default().fg(color),
        ));
    }

    let selected = state
        .selected_step
        .and_then(|i| state.steps.get(i).map(|s| (i, s)));
    let cursor = match selected {
        Some((i, step)) => {
            let intensity = step
                .intensity
                .map_or(String::from("-"), |v| v.to_string());
            format!(
                "step {}/{} · {} {} · {} ms",
                i + 1,
                state.steps.len(),
                step.action.label(),
                intensity,
                step.duration_ms,
            )
        }
        None => String::from("←/→ select a step · D remove · i duplicate · </> intensity"),
    };

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(cursor, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_readouts(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let sampler_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" sampler ");
    let sampler_inner = sampler_block.inner(halves[0]);
    frame.render_widget(sampler_block, halves[0]);
    let sampler_lines = vec![
        Line::from(format!(
            "res {} · action {}",
            state.resolution,
            state.action.label()
        )),
        Line::from(format!(
            "[{}] {} {} · {} {}",
            page_label(state),
            state.knob_a_label,
            state.knob_a_value,
            state.knob_b_label,
            state.knob_b_value,
        )),
    ];
    frame.render_widget(Paragraph::new(sampler_lines), sampler_inner);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" stats ");
    let stats_inner = stats_block.inner(halves[1]);
    frame.render_widget(stats_block, halves[1]);
    let stats = &state.stats;
    let stats_lines = vec![
        Line::from(format!(
            "steps {} · total {} ms",
            stats.step_count, stats.total_duration_ms
        )),
        Line::from(format!(
            "avg {:.1} · peak {}",
            stats.avg_intensity, stats.peak_intensity
        )),
    ];
    frame.render_widget(Paragraph::new(stats_lines), stats_inner);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let (text, color) = if !state.status.is_empty() {
        (state.status.clone(), Color::Yellow)
    } else if state.save_in_flight {
        (String::from("saving..."), Color::Yellow)
    } else {
        (
            String::from("s save · x execute · X delete · n new · u undo · r rename · esc quit"),
            Color::DarkGray,
        )
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(color))),
        area,
    );
}

fn page_label(state: &DisplayState) -> &'static str {
    match state.param_page {
        crate::shared::ParamPage::Band => "band",
        crate::shared::ParamPage::Timing => "timing",
    }
}
