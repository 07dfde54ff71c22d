//! Presentation services that live next to the window manager.
//!
//! These are contracts only; toolkits supply the implementations. Each call
//! takes the window the dialog should be anchored to, usually the one reported
//! by an [`ActiveWindowTracker`](crate::ActiveWindowTracker).

use crate::presentation::WindowId;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
  Information,
  Warning,
  Error,
  Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub kind: MessageKind,
  pub caption: String,
  pub text: String,
}

impl Message {
  pub fn new(kind: MessageKind, caption: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      kind,
      caption: caption.into(),
      text: text.into(),
    }
  }
}

/// Displays message boxes.
pub trait MessageService: Send + Sync {
  /// Shows `message` and returns `true` if the user confirmed it.
  fn show_message(&self, owner: Option<WindowId>, message: &Message) -> bool;
}

/// File open/save pickers.
pub trait FilePickerService: Send + Sync {
  fn pick_files_to_open(&self, owner: Option<WindowId>, title: &str, allow_multiple: bool) -> Vec<PathBuf>;

  fn pick_file_to_save(&self, owner: Option<WindowId>, title: &str, suggested_name: Option<&str>) -> Option<PathBuf>;
}

/// Directory pickers.
pub trait DirectoryPickerService: Send + Sync {
  fn pick_directory(&self, owner: Option<WindowId>, title: &str) -> Option<PathBuf>;
}
