use crate::{
    core::{bounds::Bounds, geo::Point, viewport::Viewport},
    input::events::{InputEvent, KeyCode, MouseButton},
};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Pan state machine: `Idle → Dragging → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `anchor` is the pointer position minus the translation at drag start
    Dragging { anchor: Point },
}

/// Commands another component can send to the viewer through a [`ViewportHandle`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
    ResetZoom,
    ZoomIn,
    ZoomOut,
    SetHandTool(bool),
}

/// Cloneable sender for viewer commands
#[derive(Debug, Clone)]
pub struct ViewportHandle {
    sender: Sender<ViewportCommand>,
}

impl ViewportHandle {
    /// Queue a command; returns false if the viewer has been dropped
    pub fn send(&self, command: ViewportCommand) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn reset_zoom(&self) -> bool {
        self.send(ViewportCommand::ResetZoom)
    }

    pub fn zoom_in(&self) -> bool {
        self.send(ViewportCommand::ZoomIn)
    }

    pub fn zoom_out(&self) -> bool {
        self.send(ViewportCommand::ZoomOut)
    }

    pub fn set_hand_tool(&self, active: bool) -> bool {
        self.send(ViewportCommand::SetHandTool(active))
    }
}

/// Outcome of an input event that the owner of the viewer must act on
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// A click resolved to this image position (percent)
    PlaceMarker { x: f64, y: f64 },
    /// The transform left or returned to identity
    ZoomPanChanged { zoomed_or_panned: bool },
    HandToolChanged(bool),
    /// The floating toolbar should be shown or hidden
    ToolbarVisibility(bool),
}

/// Cursor the viewer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCursor {
    Default,
    Crosshair,
    Grab,
    Grabbing,
}

/// Turns raw input into viewport changes and [`ViewerAction`]s
#[derive(Debug)]
pub struct InputHandler {
    pub enabled: bool,
    pub zoom_on_wheel: bool,
    hand_tool: bool,
    drag: DragState,
    pointer_inside: bool,
    /// Screen regions drawn over the image (toolbar, answer button) that swallow clicks
    overlays: Vec<Bounds>,
    last_zoomed_or_panned: bool,
    sender: Sender<ViewportCommand>,
    commands: Receiver<ViewportCommand>,
}

impl InputHandler {
    pub fn new() -> Self {
        let (sender, commands) = unbounded();
        Self {
            enabled: true,
            zoom_on_wheel: true,
            hand_tool: false,
            drag: DragState::Idle,
            pointer_inside: false,
            overlays: Vec::new(),
            last_zoomed_or_panned: false,
            sender,
            commands,
        }
    }

    /// A handle for sending commands to this handler from elsewhere
    pub fn handle(&self) -> ViewportHandle {
        ViewportHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn hand_tool(&self) -> bool {
        self.hand_tool
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Replace the regions that swallow clicks
    pub fn set_overlay_regions(&mut self, regions: Vec<Bounds>) {
        self.overlays = regions;
    }

    fn over_overlay(&self, position: &Point) -> bool {
        self.overlays.iter().any(|region| region.contains(position))
    }

    /// Switch the hand tool; returns whether it changed
    pub fn set_hand_tool(&mut self, active: bool) -> bool {
        if self.hand_tool == active {
            return false;
        }
        self.hand_tool = active;
        if !active {
            self.drag = DragState::Idle;
        }
        true
    }

    pub fn cursor(&self, equipment_selected: bool) -> ViewerCursor {
        if self.is_dragging() {
            ViewerCursor::Grabbing
        } else if self.hand_tool {
            ViewerCursor::Grab
        } else if equipment_selected {
            ViewerCursor::Crosshair
        } else {
            ViewerCursor::Default
        }
    }

    /// Handle one input event against `viewport`
    pub fn handle_event(&mut self, event: InputEvent, viewport: &mut Viewport) -> Vec<ViewerAction> {
        if !self.enabled {
            return vec![];
        }

        if !event.is_pointer_motion() {
            log::trace!("input {:?} at {:?}", event, event.position());
        }

        let mut actions = vec![];

        match event {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => {
                if !self.hand_tool && !self.is_dragging() && !self.over_overlay(&position) {
                    if let Some(percent) = viewport.screen_to_image_percent(position) {
                        actions.push(ViewerAction::PlaceMarker {
                            x: percent.x,
                            y: percent.y,
                        });
                    }
                }
            }
            InputEvent::Click { .. } => {}
            InputEvent::PointerDown { position } => {
                if self.hand_tool && viewport.has_image() && !self.over_overlay(&position) {
                    self.drag = DragState::Dragging {
                        anchor: position.subtract(&viewport.translation()),
                    };
                }
            }
            InputEvent::PointerMove { position } => {
                if let DragState::Dragging { anchor } = self.drag {
                    viewport.set_translation(position.subtract(&anchor));
                }
            }
            InputEvent::PointerUp { .. } => {
                self.drag = DragState::Idle;
            }
            InputEvent::PointerEnter => {
                if !self.pointer_inside {
                    self.pointer_inside = true;
                    actions.push(ViewerAction::ToolbarVisibility(true));
                }
            }
            InputEvent::PointerLeave => {
                self.drag = DragState::Idle;
                if self.pointer_inside {
                    self.pointer_inside = false;
                    actions.push(ViewerAction::ToolbarVisibility(false));
                }
            }
            InputEvent::Scroll { delta, position } => {
                if self.zoom_on_wheel && delta != 0.0 {
                    viewport.zoom_at(delta, position);
                }
            }
            InputEvent::Resize { origin, size } => {
                if viewport.set_container(origin, size) {
                    self.drag = DragState::Idle;
                }
            }
            InputEvent::KeyPress { key } => match key {
                KeyCode::Plus => {
                    viewport.zoom_in();
                }
                KeyCode::Minus => {
                    viewport.zoom_out();
                }
                KeyCode::Home => {
                    self.reset(viewport);
                }
                KeyCode::Escape => {
                    self.drag = DragState::Idle;
                }
                KeyCode::Other(_) => {}
            },
        }

        self.notify_transform(viewport, &mut actions);
        actions
    }

    /// Apply every queued [`ViewportCommand`]
    pub fn process_commands(&mut self, viewport: &mut Viewport) -> Vec<ViewerAction> {
        let mut actions = vec![];

        while let Ok(command) = self.commands.try_recv() {
            log::debug!("viewport command {:?}", command);
            match command {
                ViewportCommand::ResetZoom => self.reset(viewport),
                ViewportCommand::ZoomIn => {
                    viewport.zoom_in();
                }
                ViewportCommand::ZoomOut => {
                    viewport.zoom_out();
                }
                ViewportCommand::SetHandTool(active) => {
                    if self.set_hand_tool(active) {
                        actions.push(ViewerAction::HandToolChanged(active));
                    }
                }
            }
        }

        self.notify_transform(viewport, &mut actions);
        actions
    }

    fn reset(&mut self, viewport: &mut Viewport) {
        viewport.reset();
        self.drag = DragState::Idle;
    }

    /// Emit a change notification when the view crosses identity
    fn notify_transform(&mut self, viewport: &Viewport, actions: &mut Vec<ViewerAction>) {
        let zoomed_or_panned = viewport.is_zoomed_or_panned();
        if zoomed_or_panned != self.last_zoomed_or_panned {
            self.last_zoomed_or_panned = zoomed_or_panned;
            actions.push(ViewerAction::ZoomPanChanged { zoomed_or_panned });
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
