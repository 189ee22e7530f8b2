//! Window integration: redraw requests and the title's unsaved marker.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, RequestRedraw};

use crate::history::RedrawTrigger;
use crate::layer::AnnotationLayer;

pub const APP_TITLE: &str = "Mapscribe";

/// Asks the window to repaint, even when the app runs in reactive mode.
#[derive(SystemParam)]
pub struct RedrawRequests<'w> {
    writer: MessageWriter<'w, RequestRedraw>,
}

impl RedrawTrigger for RedrawRequests<'_> {
    fn request_redraw(&mut self) {
        self.writer.write(RequestRedraw);
    }
}

fn window_title(dirty: bool) -> String {
    if dirty {
        format!("* {APP_TITLE}")
    } else {
        APP_TITLE.to_string()
    }
}

/// Mirror the layer's dirty flag in the window title
pub fn update_window_title(
    layer: Res<AnnotationLayer>,
    mut window_query: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !layer.is_changed() {
        return;
    }

    let Ok(mut window) = window_query.single_mut() else {
        return;
    };

    let title = window_title(layer.is_dirty());
    if window.title != title {
        window.title = title;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title_marks_unsaved_changes() {
        assert_eq!(window_title(false), "Mapscribe");
        assert_eq!(window_title(true), "* Mapscribe");
    }
}
