//! Client-side routing with a back stack.

use fitsyn_types::Route;

const MAX_HISTORY: usize = 64;

#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Router {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Push `route`. Returns `false` when already there.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        tracing::info!(from = %self.current, to = %route, "Navigate");
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        true
    }

    pub fn navigate_path(&mut self, path: &str) -> bool {
        self.navigate(Route::resolve(path))
    }

    /// Swap the current entry without growing history (redirects).
    pub fn replace(&mut self, route: Route) {
        tracing::debug!(from = %self.current, to = %route, "Redirect");
        self.current = route;
    }

    /// Pop the back stack; with nothing to go back to, go home.
    pub fn back(&mut self) {
        self.current = self.history.pop().unwrap_or(Route::Home);
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}
