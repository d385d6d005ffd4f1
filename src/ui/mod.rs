pub mod elements;
pub mod icons;
pub mod sidebar;
pub mod style;
pub mod widget;

pub use elements::{FloatingToolbar, Position, ToolbarButton};

pub use icons::{paint_icon, paint_placeholder};

pub use sidebar::{Sidebar, SidebarAction};

pub use style::{GlyphStyle, PlaceholderStyle, ToolbarStyle, ViewerStyle};

pub use widget::{ImageTextures, ImageViewer};

/// Shorthand for adding the quiz widgets to a `Ui`
pub trait UiQuizExt {
    fn image_viewer(
        &mut self,
        session: &mut crate::session::QuizSession,
        textures: &mut ImageTextures,
    ) -> egui::Response;
}

impl UiQuizExt for egui::Ui {
    fn image_viewer(
        &mut self,
        session: &mut crate::session::QuizSession,
        textures: &mut ImageTextures,
    ) -> egui::Response {
        self.add(ImageViewer::new(session, textures))
    }
}
