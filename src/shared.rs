// The input plan:
//
// Drawing surface (mouse on the curve pane):
//   left press         //  DrawStart(point in surface coords)
//   drag               //  DrawMove(point)
//   release            //  DrawEnd
//
// Template keys (stamp a shape instead of drawing):
//   1-8                //  ApplyTemplate(one of the eight shapes)
//
// Sampler knobs:
//   p                  //  NextParamPage (band <-> timing)
//   [ / ]              //  KnobA(-1 / +1): min intensity, or step duration
//   - / =              //  KnobB(-1 / +1): max intensity, or step delay
//   , / .              //  AdjustResolution(-1 / +1)
//   a                  //  CycleAction (shock -> vibrate -> sound -> pause)
//
// Manual step editing (timeline cursor):
//   Left / Right       //  SelectPrevStep / SelectNextStep
//   D                  //  RemoveSelectedStep
//   i                  //  DuplicateSelectedStep
//   < / >              //  AdjustSelectedIntensity(-5 / +5)
//
// Session and remote:
//   n                  //  NewSession          u   //  UndoRecent
//   r                  //  ToggleRename (then type; Enter or Esc to finish)
//   s                  //  Save                x   //  Execute
//   X                  //  Delete              Esc //  Quit
//
// The rendering idea, same as ever: the middle layer owns every bit of
// state, the TUI polls `middle.display_state()` each frame and just draws
// what it's told.

use crate::curve::{CurvePoint, SurfaceSize, TemplateShape};
use crate::pipeline::pattern::{ActionType, PatternStats, PatternStep};
use crate::pipeline::timeline::TimelineSegment;

/// How much of the gesture an undo chops off the end.
pub const UNDO_FRACTION: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // drawing surface, already translated into surface coordinates
    DrawStart(CurvePoint),
    DrawMove(CurvePoint),
    DrawEnd,
    SurfaceResized(SurfaceSize),

    // analytic template instead of free-hand input
    ApplyTemplate(TemplateShape),

    // sampler configuration
    NextParamPage,
    KnobA(i32),
    KnobB(i32),
    AdjustResolution(i32),
    CycleAction,

    // manual step editing
    SelectPrevStep,
    SelectNextStep,
    RemoveSelectedStep,
    DuplicateSelectedStep,
    AdjustSelectedIntensity(i32),

    // session
    NewSession,
    UndoRecent,

    // rename mode
    ToggleRename,
    NameChar(char),
    NameBackspace,

    // remote actions
    Save,
    Execute,
    Delete,

    // quit button (esc)
    Quit,
}

/// Which pair of values the knob keys currently adjust.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamPage {
    Band,
    Timing,
}

impl ParamPage {
    pub fn next(self) -> Self {
        match self {
            ParamPage::Band => ParamPage::Timing,
            ParamPage::Timing => ParamPage::Band,
        }
    }

    pub fn knob_labels(self) -> (&'static str, &'static str) {
        match self {
            ParamPage::Band => ("MIN", "MAX"),
            ParamPage::Timing => ("DUR", "DELAY"),
        }
    }
}

/// Snapshot of everything the TUI renders in one frame.
#[derive(Clone, Debug)]
pub struct DisplayState {
    // curve pane
    pub points: Vec<CurvePoint>,
    pub drawing: bool,
    pub surface: SurfaceSize,
    pub shape: Option<TemplateShape>,

    // preview pane
    pub steps: Vec<PatternStep>,
    pub segments: Vec<TimelineSegment>,
    pub stats: PatternStats,
    pub selected_step: Option<usize>,

    // sampler pane
    pub resolution: usize,
    pub action: ActionType,
    pub param_page: ParamPage,
    pub knob_a_label: &'static str,
    pub knob_b_label: &'static str,
    pub knob_a_value: u32,
    pub knob_b_value: u32,

    // pattern header
    pub name: String,
    pub renaming: bool,
    pub pattern_id: Option<String>,

    // footer
    pub device_id: String,
    pub server_url: String,
    pub status: String,
    pub save_in_flight: bool,
}
