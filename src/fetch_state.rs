/// Status of one remote resource owned by a screen.
///
/// `Loading` and `Failed` never carry data, so a screen cannot render stale
/// content next to a spinner or an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            FetchState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Apply a finished request: `Ok` → `Loaded`, `Err` → `Failed(message)`.
    pub fn settle<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(v) => FetchState::Loaded(v),
            Err(e) => FetchState::Failed(e.to_string()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_maps_results() {
        let mut st: FetchState<u32> = FetchState::Loading;
        st.settle::<String>(Ok(3));
        assert_eq!(st.data(), Some(&3));

        st = FetchState::Loading;
        assert!(st.data().is_none());
        st.settle::<&str>(Err("boom"));
        assert_eq!(st.error(), Some("boom"));
        assert!(!st.is_loading());
    }
}
