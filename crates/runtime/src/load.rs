/// Outcome of a one-shot asset load, as seen by the rendering layer.
///
/// Transitions only out of `Loading`; once settled the state is final.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Empty,
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    /// Classifies a finished load. `is_empty` decides between `Ready` and `Empty`.
    pub fn from_result<E: std::fmt::Display>(
        result: Result<T, E>,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Self {
        match result {
            Ok(value) if is_empty(&value) => LoadState::Empty,
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }

    /// Moves out of `Loading`. Returns `false` (and drops `next`) if the
    /// state was already settled.
    pub fn settle(&mut self, next: LoadState<T>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = next;
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Stable lowercase name, used across the JS boundary.
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Empty => "empty",
            LoadState::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoadState;

    #[test]
    fn classifies_results() {
        let ok: LoadState<Vec<u8>> =
            LoadState::from_result(Ok::<_, String>(vec![1]), Vec::is_empty);
        assert_eq!(ok, LoadState::Ready(vec![1]));

        let empty: LoadState<Vec<u8>> =
            LoadState::from_result(Ok::<_, String>(vec![]), Vec::is_empty);
        assert_eq!(empty, LoadState::Empty);

        let failed: LoadState<Vec<u8>> =
            LoadState::from_result(Err::<Vec<u8>, _>("boom"), Vec::is_empty);
        assert_eq!(failed, LoadState::Failed("boom".to_string()));
        assert_eq!(failed.label(), "failed");
    }

    #[test]
    fn settles_only_once() {
        let mut state: LoadState<u32> = LoadState::default();
        assert!(state.is_loading());
        assert!(state.settle(LoadState::Ready(7)));
        assert!(!state.settle(LoadState::Failed("late".into())));
        assert_eq!(state.ready(), Some(&7));
    }
}
