use ratatui::layout::Rect;

// state local to tui: the rename-mode mirror that decides where keystrokes
// go, plus what the renderer learned about the layout last frame so mouse
// coordinates can be translated into surface coordinates
#[derive(Clone, Copy, Debug, Default)]
pub struct TuiState {
    // synced from DisplayState each frame
    pub renaming: bool,
    // inner rect of the curve pane, recorded by view::render
    pub curve_area: Option<Rect>,
    // left button went down inside the curve pane and hasn't come up yet
    pub mouse_down: bool,
}
