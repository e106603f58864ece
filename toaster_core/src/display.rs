//! Presentation model fed by scheduler events.
//!
//! Holds what a front end shows: the slice image, a progress line, a
//! temperature line and whether the start control is enabled. Front ends
//! drain the event channel on a timer and apply each event here.

use crate::{StageId, ToastEvent};

#[derive(Clone, Debug, PartialEq)]
pub struct ToasterDisplay {
    pub image: &'static str,
    pub progress: String,
    pub temperature: String,
    pub start_enabled: bool,
}

impl Default for ToasterDisplay {
    fn default() -> Self {
        Self {
            image: StageId::Raw.image_ref(),
            progress: String::new(),
            temperature: ToastEvent::Temperature(0).to_string(),
            start_enabled: true,
        }
    }
}

impl ToasterDisplay {
    pub fn apply(&mut self, event: &ToastEvent) {
        match event {
            ToastEvent::Started { .. } => {
                self.start_enabled = false;
                self.progress = event.to_string();
            }
            ToastEvent::StageChanged(stage) => self.image = stage.image_ref(),
            ToastEvent::Temperature(_) => self.temperature = event.to_string(),
            ToastEvent::RemainingTime(_) | ToastEvent::Completed | ToastEvent::Cancelled => {
                self.progress = event.to_string();
            }
            // At the end of a session the completion message stays up;
            // outside a session this comes from a reset.
            ToastEvent::ReadyForNextStart => {
                if self.start_enabled {
                    self.progress = event.to_string();
                }
                self.start_enabled = true;
            }
        }
    }
}
