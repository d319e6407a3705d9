use crate::curve::{CurveCapture, SamplerConfig, SurfaceSize, TemplateShape, sample_curve};
use crate::pipeline::pattern::{Pattern, PatternStep, compute_stats};
use crate::pipeline::persistence::EditorConfig;
use crate::pipeline::timeline;
use crate::remote_api::{RemoteAction, RemoteCommand, RemoteReply};
use crate::shared::{DisplayState, InputEvent, ParamPage, UNDO_FRACTION};

const STATUS_SECS: f64 = 4.0;
const MAX_NAME_LEN: usize = 64;
const MAX_RESOLUTION: usize = 100;

/// One open editor. Everything that belongs to the pattern being authored
/// lives in here, and the whole value is replaced on "new pattern" so no
/// state can leak from one editing session into the next.
pub struct CurveEditingSession {
    pub capture: CurveCapture,
    pub sampler: SamplerConfig,
    pub pattern: Pattern,
    /// Template last stamped, if the curve came from one.
    pub shape: Option<TemplateShape>,
    /// Timeline cursor for manual step edits.
    pub selected_step: Option<usize>,
    pub renaming: bool,
}

impl CurveEditingSession {
    fn new(surface: SurfaceSize, sampler: SamplerConfig) -> Self {
        Self {
            capture: CurveCapture::new(surface),
            sampler,
            pattern: Pattern {
                name: String::from("untitled"),
                ..Pattern::default()
            },
            shape: None,
            selected_step: None,
            renaming: false,
        }
    }
}

/// The mediation layer: resolves semantic input events into engine calls
/// and remote commands, and snapshots a DisplayState for the TUI.
pub struct Middle {
    pub session: CurveEditingSession,
    config: EditorConfig,
    param_page: ParamPage,
    status: String,
    status_age: f64,
    save_in_flight: bool,
}

impl Middle {
    pub fn with_config(config: EditorConfig, surface: SurfaceSize) -> Self {
        let session = CurveEditingSession::new(surface, config.sampler);
        Self {
            session,
            config,
            param_page: ParamPage::Band,
            status: String::new(),
            status_age: 0.0,
            save_in_flight: false,
        }
    }

    /// Config as it should be persisted on quit: whatever the operator
    /// last dialed in wins.
    pub fn config(&self) -> EditorConfig {
        let mut config = self.config.clone();
        config.sampler = self.session.sampler;
        config
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<RemoteCommand> {
        match event {
            InputEvent::DrawStart(p) => {
                self.session.capture.begin(p);
                self.session.shape = None;
                self.resample_preview();
            }
            InputEvent::DrawMove(p) => {
                self.session.capture.extend(p);
                self.resample_preview();
            }
            InputEvent::DrawEnd => self.session.capture.end(),
            InputEvent::SurfaceResized(surface) => {
                self.session.capture.set_surface(surface);
                self.resample_preview();
            }

            InputEvent::ApplyTemplate(shape) => {
                let surface = self.session.capture.surface();
                self.session.capture.set_points(shape.generate(surface));
                self.session.shape = Some(shape);
                self.resample_preview();
                self.set_status(format!("template: {}", shape.name()));
            }

            InputEvent::NextParamPage => self.param_page = self.param_page.next(),
            InputEvent::KnobA(delta) => {
                match self.param_page {
                    ParamPage::Band => {
                        let s = &mut self.session.sampler;
                        s.min_intensity =
                            add_clamped(s.min_intensity as i64, delta as i64, 1, s.max_intensity as i64) as u8;
                    }
                    ParamPage::Timing => {
                        let s = &mut self.session.sampler;
                        s.step_duration_ms =
                            add_clamped(s.step_duration_ms as i64, delta as i64 * 50, 50, 10_000) as u32;
                    }
                }
                self.resample_preview();
            }
            InputEvent::KnobB(delta) => {
                match self.param_page {
                    ParamPage::Band => {
                        let s = &mut self.session.sampler;
                        s.max_intensity =
                            add_clamped(s.max_intensity as i64, delta as i64, s.min_intensity as i64, 100) as u8;
                    }
                    ParamPage::Timing => {
                        let s = &mut self.session.sampler;
                        s.step_delay_ms =
                            add_clamped(s.step_delay_ms as i64, delta as i64 * 50, 0, 10_000) as u32;
                    }
                }
                self.resample_preview();
            }
            InputEvent::AdjustResolution(delta) => {
                let s = &mut self.session.sampler;
                s.resolution =
                    add_clamped(s.resolution as i64, delta as i64, 2, MAX_RESOLUTION as i64) as usize;
                self.resample_preview();
            }
            InputEvent::CycleAction => {
                self.session.sampler.action = self.session.sampler.action.next();
                self.resample_preview();
            }

            InputEvent::SelectPrevStep => self.move_cursor(-1),
            InputEvent::SelectNextStep => self.move_cursor(1),
            InputEvent::RemoveSelectedStep => {
                if let Some(i) = self.session.selected_step {
                    self.session.pattern.remove_step(i);
                    self.clamp_cursor();
                }
            }
            InputEvent::DuplicateSelectedStep => {
                if let Some(i) = self.session.selected_step
                    && let Some(step) = self.session.pattern.steps.get(i).copied()
                {
                    self.session.pattern.insert_step_after(i, step);
                }
            }
            InputEvent::AdjustSelectedIntensity(delta) => {
                if let Some(i) = self.session.selected_step
                    && let Some(step) = self.session.pattern.steps.get(i).copied()
                    && let Some(v) = step.intensity
                {
                    let updated = PatternStep {
                        intensity: Some(add_clamped(v as i64, delta as i64, 1, 100) as u8),
                        ..step
                    };
                    self.session.pattern.update_step(i, updated);
                }
            }

            InputEvent::NewSession => {
                let surface = self.session.capture.surface();
                self.session = CurveEditingSession::new(surface, self.session.sampler);
                self.set_status("new pattern".into());
            }
            InputEvent::UndoRecent => {
                self.session.capture.truncate_recent(UNDO_FRACTION);
                self.resample_preview();
            }

            InputEvent::ToggleRename => self.session.renaming = !self.session.renaming,
            InputEvent::NameChar(c) => {
                if self.session.renaming && self.session.pattern.name.len() < MAX_NAME_LEN {
                    self.session.pattern.name.push(c);
                }
            }
            InputEvent::NameBackspace => {
                if self.session.renaming {
                    self.session.pattern.name.pop();
                }
            }

            InputEvent::Save => return self.request_save(),
            InputEvent::Execute => return self.request_execute(),
            InputEvent::Delete => return self.request_delete(),

            // main handles quit itself
            InputEvent::Quit => {}
        }
        Vec::new()
    }

    /// A reply came back from the worker; fold it into the session.
    pub fn on_remote_reply(&mut self, reply: RemoteReply) {
        match reply {
            RemoteReply::Saved { id } => {
                self.save_in_flight = false;
                self.set_status(format!("saved as {id}"));
                self.session.pattern.id = Some(id);
            }
            RemoteReply::Deleted { id } => {
                if self.session.pattern.id.as_deref() == Some(id.as_str()) {
                    self.session.pattern.id = None;
                }
                self.set_status("pattern deleted".into());
            }
            RemoteReply::Executed { pattern_id } => {
                self.set_status(format!("executing {pattern_id} on {}", self.config.device_id));
            }
            RemoteReply::Failed { action, message } => {
                if action == RemoteAction::Save {
                    self.save_in_flight = false;
                }
                self.set_status(format!("{} failed: {message}", action.label()));
            }
        }
    }

    /// Ages out the status line. No other time-based behavior lives here.
    pub fn tick(&mut self, elapsed: f64) {
        if self.status.is_empty() {
            return;
        }
        self.status_age += elapsed;
        if self.status_age > STATUS_SECS {
            self.status.clear();
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let session = &self.session;
        let (knob_a_label, knob_b_label) = self.param_page.knob_labels();
        let (knob_a_value, knob_b_value) = match self.param_page {
            ParamPage::Band => (
                session.sampler.min_intensity as u32,
                session.sampler.max_intensity as u32,
            ),
            ParamPage::Timing => (session.sampler.step_duration_ms, session.sampler.step_delay_ms),
        };
        DisplayState {
            points: session.capture.points().to_vec(),
            drawing: session.capture.is_drawing(),
            surface: session.capture.surface(),
            shape: session.shape,
            steps: session.pattern.steps.clone(),
            segments: timeline::project(&session.pattern.steps),
            stats: compute_stats(&session.pattern.steps),
            selected_step: session.selected_step,
            resolution: session.sampler.resolution,
            action: session.sampler.action,
            param_page: self.param_page,
            knob_a_label,
            knob_b_label,
            knob_a_value,
            knob_b_value,
            name: session.pattern.name.clone(),
            renaming: session.renaming,
            pattern_id: session.pattern.id.clone(),
            device_id: self.config.device_id.clone(),
            server_url: self.config.server_url.clone(),
            status: self.status.clone(),
            save_in_flight: self.save_in_flight,
        }
    }

    // Full resample on every change, same as the preview always worked.
    // A curve that isn't ready yet (under 2 points) just leaves the current
    // step list alone.
    fn resample_preview(&mut self) {
        let session = &mut self.session;
        match sample_curve(
            session.capture.points(),
            session.capture.surface(),
            &session.sampler,
        ) {
            Ok(steps) if !steps.is_empty() => {
                session.pattern.replace_steps(steps);
                self.clamp_cursor();
            }
            Ok(_) | Err(_) => {}
        }
    }

    fn request_save(&mut self) -> Vec<RemoteCommand> {
        if self.save_in_flight {
            self.set_status("save already in flight".into());
            return Vec::new();
        }
        if let Err(e) = self.session.pattern.validate_for_save() {
            self.set_status(e.to_string());
            return Vec::new();
        }
        self.save_in_flight = true;
        self.set_status(format!("saving \"{}\"...", self.session.pattern.name));
        vec![RemoteCommand::SavePattern(self.session.pattern.clone())]
    }

    fn request_execute(&mut self) -> Vec<RemoteCommand> {
        if self.save_in_flight {
            self.set_status("wait for the save to finish".into());
            return Vec::new();
        }
        match self.session.pattern.id.clone() {
            Some(id) => {
                self.set_status(format!("executing on {}...", self.config.device_id));
                vec![RemoteCommand::ExecutePattern {
                    pattern_id: id.clone(),
                    device_id: self.config.device_id.clone(),
                }]
            }
            None => {
                self.set_status("save the pattern before executing".into());
                Vec::new()
            }
        }
    }

    fn request_delete(&mut self) -> Vec<RemoteCommand> {
        match self.session.pattern.id.clone() {
            Some(id) => {
                self.set_status("deleting...".into());
                vec![RemoteCommand::DeletePattern { id: id.clone() }]
            }
            None => {
                self.set_status("nothing saved to delete".into());
                Vec::new()
            }
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.session.pattern.steps.len();
        if len == 0 {
            self.session.selected_step = None;
            return;
        }
        let current = self.session.selected_step.map_or(0, |i| i as i64 + delta);
        self.session.selected_step = Some(current.clamp(0, len as i64 - 1) as usize);
    }

    fn clamp_cursor(&mut self) {
        let len = self.session.pattern.steps.len();
        self.session.selected_step = match self.session.selected_step {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    fn set_status(&mut self, status: String) {
        tracing::debug!(%status, "status");
        self.status = status;
        self.status_age = 0.0;
    }
}

fn add_clamped(value: i64, delta: i64, min: i64, max: i64) -> i64 {
    (value + delta).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurvePoint;

    fn middle() -> Middle {
        Middle::with_config(EditorConfig::default(), SurfaceSize::new(100.0, 100.0))
    }

    fn draw_ramp(m: &mut Middle) {
        m.handle_input(InputEvent::DrawStart(CurvePoint::new(0.0, 100.0)));
        for i in 1..=10 {
            let x = i as f64 * 10.0;
            m.handle_input(InputEvent::DrawMove(CurvePoint::new(x, 100.0 - x)));
        }
        m.handle_input(InputEvent::DrawEnd);
    }

    #[test]
    fn drawing_fills_the_preview_at_the_configured_resolution() {
        let mut m = middle();
        draw_ramp(&mut m);
        let ds = m.display_state();
        assert_eq!(ds.steps.len(), m.session.sampler.resolution);
        assert!(!ds.drawing);
        assert_eq!(ds.segments.len(), ds.steps.len());
        assert_eq!(ds.stats.step_count, ds.steps.len());
    }

    #[test]
    fn template_fills_the_preview_too() {
        let mut m = middle();
        m.handle_input(InputEvent::ApplyTemplate(TemplateShape::Triangle));
        assert_eq!(m.session.pattern.steps.len(), m.session.sampler.resolution);
        assert_eq!(m.session.shape, Some(TemplateShape::Triangle));
    }

    #[test]
    fn starting_a_draw_discards_the_template_curve() {
        let mut m = middle();
        m.handle_input(InputEvent::ApplyTemplate(TemplateShape::Sine));
        m.handle_input(InputEvent::DrawStart(CurvePoint::new(0.0, 0.0)));
        assert_eq!(m.session.shape, None);
        assert_eq!(m.session.capture.points().len(), 1);
    }

    #[test]
    fn save_refuses_without_steps() {
        let mut m = middle();
        m.session.pattern.name = String::from("X");
        let cmds = m.handle_input(InputEvent::Save);
        assert!(cmds.is_empty());
        assert!(!m.display_state().status.is_empty());
    }

    #[test]
    fn save_refuses_a_blank_name() {
        let mut m = middle();
        draw_ramp(&mut m);
        m.session.pattern.name = String::from("  ");
        let cmds = m.handle_input(InputEvent::Save);
        assert!(cmds.is_empty());
    }

    #[test]
    fn save_emits_one_command_and_blocks_reentry() {
        let mut m = middle();
        draw_ramp(&mut m);
        let cmds = m.handle_input(InputEvent::Save);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], RemoteCommand::SavePattern(_)));

        // a second save while the first is in flight is refused
        let cmds = m.handle_input(InputEvent::Save);
        assert!(cmds.is_empty());
        assert_eq!(m.display_state().status, "save already in flight");

        // the reply unblocks and records the server id
        m.on_remote_reply(RemoteReply::Saved {
            id: String::from("p42"),
        });
        assert_eq!(m.session.pattern.id.as_deref(), Some("p42"));
        let cmds = m.handle_input(InputEvent::Save);
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn failed_save_unblocks_too() {
        let mut m = middle();
        draw_ramp(&mut m);
        m.handle_input(InputEvent::Save);
        m.on_remote_reply(RemoteReply::Failed {
            action: RemoteAction::Save,
            message: String::from("boom"),
        });
        assert!(!m.display_state().save_in_flight);
        assert!(m.display_state().status.contains("boom"));
    }

    #[test]
    fn execute_needs_a_saved_pattern() {
        let mut m = middle();
        draw_ramp(&mut m);
        let cmds = m.handle_input(InputEvent::Execute);
        assert!(cmds.is_empty());

        m.session.pattern.id = Some(String::from("p7"));
        let cmds = m.handle_input(InputEvent::Execute);
        assert!(matches!(
            &cmds[0],
            RemoteCommand::ExecutePattern { pattern_id, device_id }
                if pattern_id == "p7" && device_id == "default"
        ));
    }

    #[test]
    fn band_knobs_stay_ordered_and_in_range() {
        let mut m = middle();
        for _ in 0..200 {
            m.handle_input(InputEvent::KnobA(1));
        }
        // min can climb at most up to max
        assert_eq!(m.session.sampler.min_intensity, m.session.sampler.max_intensity);
        for _ in 0..200 {
            m.handle_input(InputEvent::KnobB(-1));
        }
        assert!(m.session.sampler.max_intensity >= m.session.sampler.min_intensity);
        assert!(m.session.sampler.min_intensity >= 1);
    }

    #[test]
    fn resolution_never_drops_below_two() {
        let mut m = middle();
        for _ in 0..50 {
            m.handle_input(InputEvent::AdjustResolution(-1));
        }
        assert_eq!(m.session.sampler.resolution, 2);
    }

    #[test]
    fn resolution_change_resamples_the_preview() {
        let mut m = middle();
        draw_ramp(&mut m);
        m.handle_input(InputEvent::AdjustResolution(5));
        assert_eq!(m.session.pattern.steps.len(), m.session.sampler.resolution);
    }

    #[test]
    fn step_cursor_edits_go_through_the_model() {
        let mut m = middle();
        draw_ramp(&mut m);
        let n = m.session.pattern.steps.len();

        m.handle_input(InputEvent::SelectNextStep);
        m.handle_input(InputEvent::SelectNextStep);
        assert_eq!(m.session.selected_step, Some(1));

        m.handle_input(InputEvent::DuplicateSelectedStep);
        assert_eq!(m.session.pattern.steps.len(), n + 1);

        m.handle_input(InputEvent::RemoveSelectedStep);
        assert_eq!(m.session.pattern.steps.len(), n);

        let before = m.session.pattern.steps[1].intensity.unwrap();
        m.handle_input(InputEvent::AdjustSelectedIntensity(5));
        let after = m.session.pattern.steps[1].intensity.unwrap();
        assert_eq!(after, (before + 5).min(100));
    }

    #[test]
    fn new_session_drops_everything_but_the_knobs() {
        let mut m = middle();
        draw_ramp(&mut m);
        m.session.pattern.id = Some(String::from("p1"));
        m.handle_input(InputEvent::AdjustResolution(3));
        let resolution = m.session.sampler.resolution;

        m.handle_input(InputEvent::NewSession);
        assert!(m.session.pattern.id.is_none());
        assert!(m.session.pattern.steps.is_empty());
        assert!(m.session.capture.points().is_empty());
        assert_eq!(m.session.sampler.resolution, resolution);
    }

    #[test]
    fn rename_mode_edits_the_pattern_name() {
        let mut m = middle();
        m.handle_input(InputEvent::ToggleRename);
        m.handle_input(InputEvent::NameBackspace); // "untitled" -> "untitle"
        for c in "d two".chars() {
            m.handle_input(InputEvent::NameChar(c));
        }
        m.handle_input(InputEvent::ToggleRename);
        assert_eq!(m.session.pattern.name, "untitled two");

        // outside rename mode keys don't touch the name
        m.handle_input(InputEvent::NameChar('!'));
        assert_eq!(m.session.pattern.name, "untitled two");
    }

    #[test]
    fn status_expires_after_a_while() {
        let mut m = middle();
        m.handle_input(InputEvent::Delete); // sets "nothing saved to delete"
        assert!(!m.display_state().status.is_empty());
        m.tick(STATUS_SECS + 1.0);
        assert!(m.display_state().status.is_empty());
    }
}
