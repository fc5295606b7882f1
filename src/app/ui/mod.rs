mod data;
mod details;
mod editor;
mod panels;
mod settings;

pub(super) use data::DataPaths;
pub(super) use editor::EditorState;
