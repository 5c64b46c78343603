//! Load state shared by the access layers.

/// `Loading` until the first fetch settles, then `Loaded` or `Failed`.
/// There are no retries; a new fetch starts over at `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}
